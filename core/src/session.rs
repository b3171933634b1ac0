//! Presentation lifecycle and the composer form feeding it.

use crate::error::{ErrorReporter, GenerationError};
use crate::navigation::SlideNavigator;
use slide_common::{GenerationRequest, PresentationData, RequestError, SlideContent, StyleAsset};
use tracing::info;

/// Where the current generate → view cycle stands.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Loading,
    Ready {
        data: PresentationData,
        navigator: SlideNavigator,
    },
    Failed {
        reason: String,
    },
}

/// Raised when a second generation is started while one is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("a generation is already in progress")]
pub struct AlreadyLoading;

#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Loading)
    }

    pub fn can_submit(&self, title: &str, topics: &str) -> bool {
        !title.trim().is_empty() && !topics.trim().is_empty() && !self.is_loading()
    }

    /// Enter `Loading`, dropping any previous deck or error.
    pub fn begin(&mut self) -> Result<(), AlreadyLoading> {
        if self.is_loading() {
            return Err(AlreadyLoading);
        }
        self.state = SessionState::Loading;
        Ok(())
    }

    pub fn finish(&mut self, result: Result<PresentationData, GenerationError>) {
        self.state = match result {
            Ok(data) => match SlideNavigator::new(data.slide_count()) {
                Some(navigator) => {
                    info!(slides = data.slide_count(), "presentation ready");
                    SessionState::Ready { data, navigator }
                }
                None => SessionState::Failed {
                    reason: ErrorReporter::format_generation_error(&GenerationError::EmptyResult),
                },
            },
            Err(err) => SessionState::Failed {
                reason: ErrorReporter::format_generation_error(&err),
            },
        };
    }

    pub fn data(&self) -> Option<&PresentationData> {
        match &self.state {
            SessionState::Ready { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn navigator(&self) -> Option<&SlideNavigator> {
        match &self.state {
            SessionState::Ready { navigator, .. } => Some(navigator),
            _ => None,
        }
    }

    pub fn navigator_mut(&mut self) -> Option<&mut SlideNavigator> {
        match &mut self.state {
            SessionState::Ready { navigator, .. } => Some(navigator),
            _ => None,
        }
    }

    pub fn current_slide(&self) -> Option<&SlideContent> {
        match &self.state {
            SessionState::Ready { data, navigator } => data.slides.get(navigator.index()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SessionState::Failed { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Form fields the user fills in before generating.
#[derive(Debug, Clone, Default)]
pub struct ComposerForm {
    pub title: String,
    pub topics: String,
    style: Option<StyleAsset>,
    style_label: Option<String>,
    topics_file: Option<String>,
}

impl ComposerForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(&self) -> Option<&StyleAsset> {
        self.style.as_ref()
    }

    pub fn style_label(&self) -> Option<&str> {
        self.style_label.as_deref()
    }

    pub fn topics_file(&self) -> Option<&str> {
        self.topics_file.as_deref()
    }

    /// Label shown while a video frame is being extracted.
    pub fn processing_label(name: &str) -> String {
        format!("جاري معالجة: {name}...")
    }

    /// Videos get a "style from" label; images show their file name.
    pub fn set_style(&mut self, asset: StyleAsset, from_video: bool) {
        let label = if from_video {
            format!("نمط من: {}", asset.name)
        } else {
            asset.name.clone()
        };
        self.style_label = Some(label);
        self.style = Some(asset);
    }

    pub fn remove_style(&mut self) {
        self.style = None;
        self.style_label = None;
    }

    /// Replace the topics with a file's content.
    pub fn load_topics(&mut self, file_name: impl Into<String>, text: String) {
        self.topics = text;
        self.topics_file = Some(file_name.into());
    }

    /// Forget the file and clear the topics loaded from it.
    pub fn remove_topics_file(&mut self) {
        if self.topics_file.take().is_some() {
            self.topics.clear();
        }
    }

    pub fn to_request(&self) -> Result<GenerationRequest, RequestError> {
        GenerationRequest::new(self.title.trim(), self.topics.trim(), self.style.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{PresentationModel, StubModel};

    async fn deck() -> PresentationData {
        let req = GenerationRequest::new("t", "a\nb", None).unwrap();
        StubModel.generate(&req).await.unwrap()
    }

    #[test]
    fn test_can_submit() {
        let mut session = Session::new();
        assert!(session.can_submit("عنوان", "مواضيع"));
        assert!(!session.can_submit("  ", "مواضيع"));
        assert!(!session.can_submit("عنوان", "\n"));
        session.begin().unwrap();
        assert!(!session.can_submit("عنوان", "مواضيع"));
        assert_eq!(session.begin(), Err(AlreadyLoading));
    }

    #[tokio::test]
    async fn test_finish_ready_starts_at_first_slide() {
        let mut session = Session::new();
        session.begin().unwrap();
        session.finish(Ok(deck().await));
        assert!(!session.is_loading());
        let nav = session.navigator().unwrap();
        assert_eq!(nav.index(), 0);
        assert_eq!(session.current_slide().unwrap().title, "t");
    }

    #[tokio::test]
    async fn test_zero_slides_never_ready() {
        let mut data = deck().await;
        data.slides.clear();
        let mut session = Session::new();
        session.begin().unwrap();
        session.finish(Ok(data));
        assert!(matches!(session.state(), SessionState::Failed { .. }));
        assert!(session.data().is_none());
    }

    #[tokio::test]
    async fn test_failure_clears_previous_deck() {
        let mut session = Session::new();
        session.begin().unwrap();
        session.finish(Ok(deck().await));
        session.navigator_mut().unwrap().next();

        session.begin().unwrap();
        assert!(session.data().is_none());
        session.finish(Err(GenerationError::Transport {
            reason: "connection reset".into(),
        }));
        assert!(!session.is_loading());
        assert!(session.data().is_none());
        let banner = session.error().unwrap();
        assert!(!banner.contains("connection reset"));
    }

    #[test]
    fn test_form_style_and_topics_file() {
        let mut form = ComposerForm::new();
        form.title = " نظام توصيات ".into();
        form.set_style(
            StyleAsset {
                name: "talk.mp4".into(),
                mime_type: "image/jpeg".into(),
                data: "AAAA".into(),
            },
            true,
        );
        assert_eq!(form.style_label(), Some("نمط من: talk.mp4"));

        form.load_topics("topics.md", "مقدمة\nالمنهجية".into());
        let req = form.to_request().unwrap();
        assert_eq!(req.title(), "نظام توصيات");
        assert!(req.style().is_some());

        form.remove_style();
        form.remove_topics_file();
        assert!(form.style().is_none());
        assert!(form.topics.is_empty());
        assert_eq!(form.to_request(), Err(RequestError::MissingTopics));
    }
}
