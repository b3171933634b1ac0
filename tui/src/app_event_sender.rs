use slide_common::{PresentationData, StyleAsset};
use slide_core::GenerationError;
use std::path::PathBuf;
use tokio::sync::mpsc::UnboundedSender;

/// Completions reported by background tasks to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    StyleLoaded {
        asset: StyleAsset,
        from_video: bool,
    },
    /// `unsupported` marks a rejected file type; anything else was a
    /// decode or I/O failure and invalidates the current style.
    StyleFailed {
        message: String,
        unsupported: bool,
    },
    TopicsLoaded {
        file_name: String,
        text: String,
    },
    TopicsFailed {
        message: String,
    },
    GenerationFinished(Result<PresentationData, GenerationError>),
    ExportFinished(Result<PathBuf, String>),
}

#[derive(Clone, Default)]
pub struct AppEventSender(Option<UnboundedSender<AppEvent>>);

impl AppEventSender {
    pub fn new(tx: UnboundedSender<AppEvent>) -> Self {
        Self(Some(tx))
    }
    pub fn send(&self, event: AppEvent) {
        if let Some(tx) = &self.0 {
            let _ = tx.send(event);
        }
    }
}
