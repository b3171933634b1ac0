use crate::models::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, InlineData, Part,
};
use crate::prompt::{build_prompt, response_schema};
use slide_common::{GenerationRequest, PresentationData, SlideConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("gemini request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("gemini http {status}: {body}")]
    Status { status: u16, body: String },

    #[error("gemini response has no text: {0}")]
    EmptyResponse(String),

    #[error("gemini response is not valid presentation JSON: {0}")]
    Schema(#[from] serde_json::Error),
}

impl GeminiError {
    /// True when the failure happened before a usable response body arrived.
    pub fn is_transport(&self) -> bool {
        matches!(self, GeminiError::Http(_) | GeminiError::Status { .. })
    }
}

/// Client for Gemini `generateContent` with JSON-constrained output.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    pub model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self::new_with_model(api_key, DEFAULT_MODEL.to_string())
    }

    pub fn new_with_model(api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn from_config(config: &SlideConfig) -> Result<Self, GeminiError> {
        let api_key = config.api_key.clone().unwrap_or_default();
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            http: builder.build()?,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.clone(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Prompt text first, then the style image as inline data when it is an image.
    pub fn build_request(request: &GenerationRequest) -> GenerateContentRequest {
        let mut parts = vec![Part::Text {
            text: build_prompt(request),
        }];

        if let Some(style) = request.style().filter(|s| s.is_image()) {
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: style.mime_type.clone(),
                    data: style.data.clone(),
                },
            });
        }

        GenerateContentRequest {
            contents: vec![Content { role: None, parts }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
            },
        }
    }

    pub async fn generate_slides(
        &self,
        request: &GenerationRequest,
    ) -> Result<PresentationData, GeminiError> {
        let body = Self::build_request(request);
        tracing::debug!(
            model = %self.model,
            with_image = body.contents[0].parts.len() > 1,
            "sending generateContent request"
        );

        let resp = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        tracing::debug!(%status, "generateContent response status");

        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(GeminiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let raw = resp.text().await?;
        let payload: GenerateContentResponse = serde_json::from_str(&raw)?;
        parse_presentation(&payload)
    }
}

/// Decode the JSON document carried in the first candidate's text.
pub fn parse_presentation(
    response: &GenerateContentResponse,
) -> Result<PresentationData, GeminiError> {
    let text = response.text().ok_or_else(|| {
        let reason = response
            .candidates
            .first()
            .and_then(|c| c.finish_reason.clone())
            .or_else(|| response.prompt_feedback.as_ref().map(|f| f.to_string()))
            .unwrap_or_else(|| "no candidates".to_string());
        GeminiError::EmptyResponse(reason)
    })?;
    let data: PresentationData = serde_json::from_str(text.trim())?;
    Ok(data)
}
