pub mod app;
pub mod app_event_sender;
pub mod preview;
pub mod widgets;

use anyhow::Result;
use slide_common::{PresentationData, SlideConfig};
use slide_core::PresentationModel;
use std::path::Path;
use std::sync::Arc;

pub use app::{run_app, App};
pub use preview::SlidePreview;

/// Run the interactive composer.
pub async fn run_interactive(model: Arc<dyn PresentationModel>, config: SlideConfig) -> Result<()> {
    run_app(model, config).await
}

/// Open the viewer on a deck saved as JSON.
pub async fn run_preview<P: AsRef<Path>>(file_path: P) -> Result<()> {
    let content = tokio::fs::read_to_string(file_path).await?;
    let data: PresentationData = serde_json::from_str(&content)?;
    let mut preview = SlidePreview::new(data)?;
    preview.run().await
}
