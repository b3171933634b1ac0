use crate::error::{GenerationError, SlideError};
use anyhow::Result;
use async_trait::async_trait;
use slide_common::{
    FontFamily, GenerationRequest, PresentationData, SlideConfig, SlideContent, Theme,
};
use slide_gemini::{GeminiClient, GeminiError};
use tracing::{error, info, warn};

#[async_trait]
pub trait PresentationModel: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<PresentationData>;

    fn name(&self) -> &str;
}

/// Adapter to wrap GeminiClient into PresentationModel
pub struct GeminiAdapter {
    inner: GeminiClient,
}

impl GeminiAdapter {
    pub fn new(api_key: String) -> Self {
        Self {
            inner: GeminiClient::new(api_key),
        }
    }

    pub fn new_with_model(api_key: String, model: String) -> Self {
        Self {
            inner: GeminiClient::new_with_model(api_key, model),
        }
    }

    pub fn from_config(config: &SlideConfig) -> Result<Self> {
        Ok(Self {
            inner: GeminiClient::from_config(config)?,
        })
    }
}

#[async_trait]
impl PresentationModel for GeminiAdapter {
    async fn generate(&self, request: &GenerationRequest) -> Result<PresentationData> {
        Ok(self.inner.generate_slides(request).await?)
    }

    fn name(&self) -> &str {
        &self.inner.model
    }
}

/// Offline model returning a fixed deck shaped like a graduation-project talk.
pub struct StubModel;

const STUB_SECTIONS: &[&str] = &[
    "المقدمة والمشكلة",
    "الأعمال السابقة",
    "الأهداف",
    "المنهجية والأدوات",
    "التصميم والتنفيذ",
    "النتائج والمخرجات",
    "المناقشة والتحليل",
    "الخاتمة والاستنتاجات",
    "العمل المستقبلي",
];

#[async_trait]
impl PresentationModel for StubModel {
    async fn generate(&self, request: &GenerationRequest) -> Result<PresentationData> {
        let topics: Vec<String> = request
            .topics()
            .lines()
            .map(|l| l.trim().trim_start_matches(['-', '*', '#']).trim())
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .take(5)
            .collect();

        let mut slides = vec![SlideContent {
            title: request.title().to_string(),
            content: vec!["اسم الطالب".to_string()],
            speaker_notes: format!("افتتاح العرض وتقديم مشروع \"{}\".", request.title()),
        }];
        for section in STUB_SECTIONS {
            slides.push(SlideContent {
                title: section.to_string(),
                content: topics.clone(),
                speaker_notes: format!("شرح {section} بالتفصيل."),
            });
        }
        slides.push(SlideContent {
            title: "الأسئلة".to_string(),
            content: Vec::new(),
            speaker_notes: "فتح باب النقاش.".to_string(),
        });
        slides.push(SlideContent {
            title: "شكراً لكم".to_string(),
            content: Vec::new(),
            speaker_notes: "ختام العرض.".to_string(),
        });

        Ok(PresentationData {
            slides,
            theme: Theme {
                primary_color: "#1E3A8A".to_string(),
                secondary_color: "#F8FAFC".to_string(),
                text_color: "#1F2937".to_string(),
                font_family: FontFamily::SansSerif,
            },
        })
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Gemini when a credential is configured, otherwise the offline stub.
pub fn model_from_config(
    config: &SlideConfig,
) -> crate::error::Result<Box<dyn PresentationModel>> {
    if config.has_api_key() {
        let adapter = GeminiAdapter::from_config(config).map_err(|e| SlideError::Config {
            reason: format!("cannot build Gemini client: {e:#}"),
        })?;
        Ok(Box::new(adapter))
    } else {
        warn!("no API key configured; using the offline stub model");
        Ok(Box::new(StubModel))
    }
}

/// Run one generation and classify its failure.
///
/// An empty slide list is reported as [`GenerationError::EmptyResult`], never
/// as a usable deck.
pub async fn generate_presentation(
    model: &dyn PresentationModel,
    request: &GenerationRequest,
) -> std::result::Result<PresentationData, GenerationError> {
    info!(
        model = model.name(),
        title = request.title(),
        with_style = request.style().is_some(),
        "generation started"
    );

    let data = model.generate(request).await.map_err(|err| {
        let classified = classify(&err);
        error!(error = %format!("{err:#}"), kind = ?classified, "generation failed");
        classified
    })?;

    if data.is_empty() {
        warn!("model returned zero slides");
        return Err(GenerationError::EmptyResult);
    }

    info!(slides = data.slide_count(), "generation finished");
    Ok(data)
}

fn classify(err: &anyhow::Error) -> GenerationError {
    let reason = format!("{err:#}");
    if let Some(gemini) = err.downcast_ref::<GeminiError>() {
        if gemini.is_transport() {
            return GenerationError::Transport { reason };
        }
        return GenerationError::MalformedResponse { reason };
    }
    if err.downcast_ref::<serde_json::Error>().is_some() {
        return GenerationError::MalformedResponse { reason };
    }
    GenerationError::Transport { reason }
}
