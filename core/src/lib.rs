//! Core library: style acquisition, generation, navigation and export.

pub mod error;
pub mod export;
pub mod generation;
pub mod logging;
pub mod navigation;
pub mod session;
pub mod style_asset;

pub use error::{ErrorReporter, ErrorSeverity, GenerationError, MediaError, Result, SlideError};
pub use export::{build_presentation, export_presentation, ExportOptions};
pub use generation::{
    generate_presentation, model_from_config, GeminiAdapter, PresentationModel, StubModel,
};
pub use navigation::SlideNavigator;
pub use session::{AlreadyLoading, ComposerForm, Session, SessionState};
pub use style_asset::{
    acquire_style_asset, capture_first_frame, encode_frame_jpeg, is_video, read_topics_file,
    FfmpegFrameSource, FrameSource, RawFrame, VideoInfo,
};
