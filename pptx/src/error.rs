use thiserror::Error;

#[derive(Debug, Error)]
pub enum PptxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML generation failed: {0}")]
    Xml(#[from] std::fmt::Error),

    #[error("Invalid color value: {0:?}")]
    InvalidColor(String),
}

pub type Result<T> = std::result::Result<T, PptxError>;
