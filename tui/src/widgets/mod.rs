pub mod modal;
pub mod slide_view;
pub mod status_bar;
