use slide_common::RequestError;
use std::fmt;
use thiserror::Error;

/// Core error types for the slide generator
#[derive(Error, Debug)]
pub enum SlideError {
    /// A picked file whose type the operation cannot use
    #[error("Unsupported file type: {name} ({mime})")]
    UnsupportedInput { name: String, mime: String },

    /// Video decoding or frame capture errors
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Errors from the presentation model
    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// PowerPoint serialization or write errors
    #[error("Export failed: {reason}")]
    Export { reason: String },

    /// Configuration errors
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<slide_pptx::PptxError> for SlideError {
    fn from(err: slide_pptx::PptxError) -> Self {
        SlideError::Export {
            reason: err.to_string(),
        }
    }
}

/// Frame extraction errors
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("ffmpeg not found (set SLIDE_FFMPEG_PATH or install ffmpeg)")]
    FfmpegNotFound,

    #[error("Failed to probe video {path}: {reason}")]
    Probe { path: String, reason: String },

    #[error("Cannot seek to {timestamp}s: {reason}")]
    Seek { timestamp: f64, reason: String },

    #[error("Frame capture failed: {reason}")]
    Capture { reason: String },

    #[error("Captured frame is {actual_width}x{actual_height} ({len} bytes), expected {width}x{height}")]
    FrameMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
        len: usize,
    },

    #[error("JPEG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Presentation model errors
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] RequestError),

    #[error("Model request failed: {reason}")]
    Transport { reason: String },

    #[error("Model response was malformed: {reason}")]
    MalformedResponse { reason: String },

    #[error("Model returned no slides")]
    EmptyResult,
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SlideError>;

/// Error reporting utilities
pub struct ErrorReporter;

impl ErrorReporter {
    /// Format error for user display
    pub fn format_user_error(error: &SlideError) -> String {
        match error {
            SlideError::UnsupportedInput { .. } => {
                "نوع الملف غير مدعوم. يرجى رفع ملف صورة أو فيديو.".to_string()
            }
            SlideError::Media(MediaError::FfmpegNotFound) => {
                "تعذر العثور على ffmpeg. يرجى تثبيته أو ضبط SLIDE_FFMPEG_PATH.".to_string()
            }
            SlideError::Media(_) => "حدث خطأ أثناء معالجة الفيديو.".to_string(),
            SlideError::Generation(gen_err) => Self::format_generation_error(gen_err),
            SlideError::Export { .. } => {
                "فشل حفظ ملف PowerPoint. يرجى التحقق من الإعدادات والمحاولة مرة أخرى.".to_string()
            }
            SlideError::Config { reason } => format!("خطأ في الإعدادات: {reason}"),
            SlideError::Io(io_err) => format!("فشلت عملية الملف: {io_err}"),
            SlideError::Json(json_err) => format!("خطأ في تنسيق البيانات: {json_err}"),
        }
    }

    /// Message shown in the stage's error banner.
    pub fn format_generation_error(error: &GenerationError) -> String {
        match error {
            GenerationError::InvalidRequest(RequestError::MissingTitle) => {
                "يرجى إدخال عنوان المشروع.".to_string()
            }
            GenerationError::InvalidRequest(RequestError::MissingTopics) => {
                "يرجى إدخال المواضيع الرئيسية.".to_string()
            }
            GenerationError::EmptyResult | GenerationError::MalformedResponse { .. } => {
                "لم يتمكن الذكاء الاصطناعي من إنشاء الشرائح. يرجى المحاولة مرة أخرى بنص مختلف."
                    .to_string()
            }
            GenerationError::Transport { .. } => {
                "حدث خطأ أثناء إنشاء العرض التقديمي. يرجى مراجعة السجل لمزيد من التفاصيل."
                    .to_string()
            }
        }
    }

    /// Get error severity level
    pub fn get_severity(error: &SlideError) -> ErrorSeverity {
        match error {
            SlideError::UnsupportedInput { .. } => ErrorSeverity::Warning,
            SlideError::Generation(GenerationError::InvalidRequest(_)) => ErrorSeverity::Warning,
            SlideError::Generation(GenerationError::EmptyResult) => ErrorSeverity::Warning,
            SlideError::Media(MediaError::FfmpegNotFound) => ErrorSeverity::Critical,
            SlideError::Config { .. } => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARNING"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_malformed_share_user_message() {
        let empty = ErrorReporter::format_generation_error(&GenerationError::EmptyResult);
        let malformed = ErrorReporter::format_generation_error(&GenerationError::MalformedResponse {
            reason: "expected value at line 1".into(),
        });
        assert_eq!(empty, malformed);
        assert!(!malformed.contains("line 1"));

        let transport = ErrorReporter::format_generation_error(&GenerationError::Transport {
            reason: "dns".into(),
        });
        assert_ne!(transport, empty);
    }

    #[test]
    fn test_severity() {
        let unsupported = SlideError::UnsupportedInput {
            name: "a.pdf".into(),
            mime: "application/pdf".into(),
        };
        assert_eq!(
            ErrorReporter::get_severity(&unsupported),
            ErrorSeverity::Warning
        );
        assert_eq!(
            ErrorReporter::get_severity(&SlideError::Media(MediaError::FfmpegNotFound)),
            ErrorSeverity::Critical
        );
        assert_eq!(
            ErrorReporter::get_severity(&SlideError::Export {
                reason: "disk full".into()
            }),
            ErrorSeverity::Error
        );
    }

    #[test]
    fn test_pptx_error_maps_to_export() {
        let err: SlideError = slide_pptx::PptxError::InvalidColor("navy".into()).into();
        assert!(matches!(err, SlideError::Export { ref reason } if reason.contains("navy")));
    }
}
