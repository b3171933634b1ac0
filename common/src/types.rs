use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One slide as drafted by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideContent {
    pub title: String,
    /// Bullet points, in display order.
    pub content: Vec<String>,
    pub speaker_notes: String,
}

/// Abstract typeface choice returned by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontFamily {
    #[serde(rename = "serif")]
    Serif,
    #[serde(rename = "sans-serif")]
    SansSerif,
}

impl FontFamily {
    /// Concrete typeface used when rendering or exporting.
    pub fn typeface(self) -> &'static str {
        match self {
            FontFamily::Serif => "Georgia",
            FontFamily::SansSerif => "Arial",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FontFamily::Serif => "serif",
            FontFamily::SansSerif => "sans-serif",
        }
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    /// Title color.
    pub primary_color: String,
    /// Slide background color.
    pub secondary_color: String,
    pub text_color: String,
    pub font_family: FontFamily,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationData {
    pub slides: Vec<SlideContent>,
    pub theme: Theme,
}

impl PresentationData {
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

/// Style reference image forwarded to the model.
///
/// `data` is plain base64 without a `data:<mime>;base64,` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleAsset {
    pub name: String,
    pub mime_type: String,
    pub data: String,
}

impl StyleAsset {
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("project title is required")]
    MissingTitle,
    #[error("project topics are required")]
    MissingTopics,
}

/// Everything one generation call needs. Built once per submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    title: String,
    topics: String,
    style: Option<StyleAsset>,
}

impl GenerationRequest {
    pub fn new(
        title: impl Into<String>,
        topics: impl Into<String>,
        style: Option<StyleAsset>,
    ) -> Result<Self, RequestError> {
        let title = title.into();
        let topics = topics.into();
        if title.trim().is_empty() {
            return Err(RequestError::MissingTitle);
        }
        if topics.trim().is_empty() {
            return Err(RequestError::MissingTopics);
        }
        Ok(Self {
            title,
            topics,
            style,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn topics(&self) -> &str {
        &self.topics
    }

    pub fn style(&self) -> Option<&StyleAsset> {
        self.style.as_ref()
    }
}

/// A color normalized to uppercase `RRGGBB` without the leading `#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    /// Accepts `#RRGGBB`, `RRGGBB`, `#RGB` and `RGB`.
    pub fn parse(input: &str) -> Option<Self> {
        let hex = input.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some(Self {
                r: channel(&hex[0..2])?,
                g: channel(&hex[2..4])?,
                b: channel(&hex[4..6])?,
            }),
            3 => {
                let mut out = [0u8; 3];
                for (slot, c) in out.iter_mut().zip(hex.chars()) {
                    let v = c.to_digit(16)? as u8;
                    *slot = v * 16 + v;
                }
                Some(Self {
                    r: out[0],
                    g: out[1],
                    b: out[2],
                })
            }
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presentation_data_from_model_json() {
        let json = r##"{
            "slides": [
                {"title": "مقدمة", "content": ["أ", "ب"], "speakerNotes": "ملاحظات"}
            ],
            "theme": {
                "primaryColor": "#1E3A8A",
                "secondaryColor": "#F8FAFC",
                "textColor": "#0F172A",
                "fontFamily": "sans-serif"
            }
        }"##;
        let data: PresentationData = serde_json::from_str(json).unwrap();
        assert_eq!(data.slide_count(), 1);
        assert_eq!(data.slides[0].speaker_notes, "ملاحظات");
        assert_eq!(data.theme.font_family, FontFamily::SansSerif);
        assert_eq!(data.theme.font_family.typeface(), "Arial");
    }

    #[test]
    fn test_unknown_font_family_is_rejected() {
        let json = r##"{"primaryColor":"#000","secondaryColor":"#fff","textColor":"#111","fontFamily":"monospace"}"##;
        assert!(serde_json::from_str::<Theme>(json).is_err());
    }

    #[test]
    fn test_request_requires_title_and_topics() {
        assert_eq!(
            GenerationRequest::new("  ", "topics", None),
            Err(RequestError::MissingTitle)
        );
        assert_eq!(
            GenerationRequest::new("title", "\n", None),
            Err(RequestError::MissingTopics)
        );
        let req = GenerationRequest::new("نظام توصيات", "مقدمة\nالمنهجية", None).unwrap();
        assert_eq!(req.title(), "نظام توصيات");
        assert!(req.style().is_none());
    }

    #[test]
    fn test_request_error_messages() {
        assert_eq!(RequestError::MissingTitle.to_string(), "project title is required");
        assert_eq!(RequestError::MissingTopics.to_string(), "project topics are required");
    }

    #[test]
    fn test_hex_color_parse() {
        assert_eq!(HexColor::parse("#1e3a8a").unwrap().to_hex(), "1E3A8A");
        assert_eq!(HexColor::parse("FFFFFF").unwrap().to_hex(), "FFFFFF");
        assert_eq!(HexColor::parse("#abc").unwrap().to_hex(), "AABBCC");
        assert!(HexColor::parse("#12345").is_none());
        assert!(HexColor::parse("blue").is_none());
        assert!(HexColor::parse("").is_none());
    }
}
