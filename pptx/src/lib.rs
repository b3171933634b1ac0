//! Minimal PresentationML writer: text boxes, speaker notes and a shared
//! master background, packaged as a `.pptx` archive.

pub mod error;
mod parts;
pub mod presentation;
pub mod slide;
mod xml;

pub use error::{PptxError, Result};
pub use presentation::{Presentation, WIDE_HEIGHT, WIDE_WIDTH};
pub use slide::{Align, Coord, Paragraph, Slide, TextBox, TextStyle, EMU_PER_INCH};
