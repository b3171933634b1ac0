use crate::error::{Result, SlideError};
use slide_common::{HexColor, PresentationData, SlideContent, DEFAULT_PPTX_FILENAME};
use slide_pptx::{Align, Coord, Paragraph, Presentation, TextBox, TextStyle};
use std::path::{Path, PathBuf};
use tracing::{error, info};

const TITLE_SIZE_PT: f64 = 32.0;
const BODY_SIZE_PT: f64 = 18.0;
const BODY_SPACE_AFTER_PT: f64 = 10.0;

/// Where and how to write the `.pptx` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub path: PathBuf,
    pub author: Option<String>,
}

impl ExportOptions {
    /// The default file name inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::to_path(dir.as_ref().join(DEFAULT_PPTX_FILENAME))
    }

    pub fn to_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            author: None,
        }
    }
}

struct Palette {
    title: String,
    background: String,
    text: String,
}

impl Palette {
    fn from_theme(data: &PresentationData) -> Result<Self> {
        let theme = &data.theme;
        Ok(Self {
            title: normalize("primaryColor", &theme.primary_color)?,
            background: normalize("secondaryColor", &theme.secondary_color)?,
            text: normalize("textColor", &theme.text_color)?,
        })
    }
}

fn normalize(field: &str, value: &str) -> Result<String> {
    HexColor::parse(value)
        .map(HexColor::to_hex)
        .ok_or_else(|| SlideError::Export {
            reason: format!("invalid {field} {value:?}"),
        })
}

/// Build the in-memory presentation for `data`.
pub fn build_presentation(data: &PresentationData) -> Result<Presentation> {
    let palette = Palette::from_theme(data)?;
    let typeface = data.theme.font_family.typeface();

    let mut pres = Presentation::new();
    pres.set_master_background(&palette.background)?;
    pres.set_font_face(typeface);
    if let Some(first) = data.slides.first() {
        pres.set_title(first.title.clone());
    }

    for content in &data.slides {
        add_slide(&mut pres, content, &palette, typeface);
    }
    Ok(pres)
}

fn add_slide(pres: &mut Presentation, content: &SlideContent, palette: &Palette, typeface: &str) {
    let slide = pres.add_slide();

    slide.add_text(TextBox {
        x: Coord::Inches(0.5),
        y: Coord::Inches(0.25),
        w: Coord::Percent(90.0),
        h: Coord::Inches(1.0),
        align: Align::Right,
        paragraphs: vec![Paragraph::new(
            content.title.clone(),
            TextStyle {
                font_size_pt: Some(TITLE_SIZE_PT),
                bold: true,
                color: Some(palette.title.clone()),
                font_face: Some(typeface.to_string()),
                ..Default::default()
            },
        )],
    });

    if !content.content.is_empty() {
        let body_style = TextStyle {
            font_size_pt: Some(BODY_SIZE_PT),
            color: Some(palette.text.clone()),
            font_face: Some(typeface.to_string()),
            bullet: true,
            space_after_pt: Some(BODY_SPACE_AFTER_PT),
            ..Default::default()
        };
        slide.add_text(TextBox {
            x: Coord::Inches(0.5),
            y: Coord::Inches(1.5),
            w: Coord::Percent(90.0),
            h: Coord::Percent(70.0),
            align: Align::Right,
            paragraphs: content
                .content
                .iter()
                .map(|point| Paragraph::new(point.clone(), body_style.clone()))
                .collect(),
        });
    }

    slide.set_notes(content.speaker_notes.clone());
}

/// Write `data` as a PowerPoint file and return where it landed.
pub fn export_presentation(data: &PresentationData, options: &ExportOptions) -> Result<PathBuf> {
    let result = write_presentation(data, options);
    match &result {
        Ok(path) => info!(path = %path.display(), slides = data.slide_count(), "exported presentation"),
        Err(err) => error!(error = %err, path = %options.path.display(), "export failed"),
    }
    result
}

fn write_presentation(data: &PresentationData, options: &ExportOptions) -> Result<PathBuf> {
    let mut pres = build_presentation(data)?;
    if let Some(author) = &options.author {
        pres.set_author(author.clone());
    }

    if let Some(parent) = options.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| SlideError::Export {
            reason: format!("cannot create {}: {e}", parent.display()),
        })?;
    }
    let bytes = pres.to_bytes()?;
    std::fs::write(&options.path, bytes).map_err(|e| SlideError::Export {
        reason: format!("cannot write {}: {e}", options.path.display()),
    })?;
    Ok(options.path.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use slide_common::{FontFamily, Theme};
    use std::io::Read;

    fn deck(slides: usize) -> PresentationData {
        PresentationData {
            slides: (1..=slides)
                .map(|i| SlideContent {
                    title: format!("شريحة {i}"),
                    content: if i == slides {
                        Vec::new()
                    } else {
                        vec![format!("نقطة {i}"), "أخرى".to_string()]
                    },
                    speaker_notes: format!("ملاحظات {i}"),
                })
                .collect(),
            theme: Theme {
                primary_color: "#1e3a8a".into(),
                secondary_color: "#FFF".into(),
                text_color: "333333".into(),
                font_family: FontFamily::Serif,
            },
        }
    }

    fn read_part(path: &Path, name: &str) -> Option<String> {
        let file = std::fs::File::open(path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let mut part = archive.by_name(name).ok()?;
        let mut out = String::new();
        part.read_to_string(&mut out).unwrap();
        Some(out)
    }

    #[test]
    fn test_eleven_slides_with_theme() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_presentation(&deck(11), &ExportOptions::in_dir(dir.path())).unwrap();
        assert!(path.ends_with(DEFAULT_PPTX_FILENAME));

        assert!(read_part(&path, "ppt/slides/slide11.xml").is_some());
        assert!(read_part(&path, "ppt/slides/slide12.xml").is_none());

        let master = read_part(&path, "ppt/slideMasters/slideMaster1.xml").unwrap();
        assert!(master.contains(r#"val="FFFFFF""#));

        let first = read_part(&path, "ppt/slides/slide1.xml").unwrap();
        assert!(first.contains("شريحة 1"));
        assert!(first.contains(r#"val="1E3A8A""#));
        assert!(first.contains(r#"val="333333""#));
        assert!(first.contains(r#"typeface="Georgia""#));
        assert!(first.contains(r#"sz="3200""#));
        assert!(first.contains(r#"sz="1800""#));

        let notes = read_part(&path, "ppt/notesSlides/notesSlide11.xml").unwrap();
        assert!(notes.contains("ملاحظات 11"));
    }

    #[test]
    fn test_slide_without_bullets_has_only_title() {
        let pres = build_presentation(&deck(2)).unwrap();
        assert_eq!(pres.slides()[0].text_boxes().len(), 2);
        assert_eq!(pres.slides()[1].text_boxes().len(), 1);
    }

    #[test]
    fn test_invalid_color_is_export_error() {
        let mut data = deck(1);
        data.theme.text_color = "dark grey".into();
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.pptx");
        let err = export_presentation(&data, &ExportOptions::to_path(&target)).unwrap_err();
        assert!(matches!(err, SlideError::Export { ref reason } if reason.contains("textColor")));
        assert!(!target.exists());
    }

    #[test]
    fn test_creates_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/deck.pptx");
        let path = export_presentation(&deck(3), &ExportOptions::to_path(&target)).unwrap();
        assert_eq!(path, target);
        assert!(target.exists());
    }
}
