//! Presentation package writer.

use crate::error::{PptxError, Result};
use crate::parts;
use crate::slide::Slide;
use crate::xml::srgb;
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use zip::write::{SimpleFileOptions, ZipWriter};

/// 16:9 slide width in EMU (10in).
pub const WIDE_WIDTH: i64 = 9_144_000;
/// 16:9 slide height in EMU (5.625in).
pub const WIDE_HEIGHT: i64 = 5_143_500;

/// An in-memory presentation that serializes to a `.pptx` package.
///
/// ```no_run
/// # use slide_pptx::Presentation;
/// let mut pres = Presentation::new();
/// pres.set_master_background("#F8FAFC")?;
/// pres.add_slide().set_notes("hello");
/// pres.write_to_file("deck.pptx")?;
/// # Ok::<(), slide_pptx::PptxError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Presentation {
    width: i64,
    height: i64,
    background: Option<String>,
    font_face: String,
    title: Option<String>,
    author: Option<String>,
    slides: Vec<Slide>,
}

impl Default for Presentation {
    fn default() -> Self {
        Self::new()
    }
}

impl Presentation {
    pub fn new() -> Self {
        Self {
            width: WIDE_WIDTH,
            height: WIDE_HEIGHT,
            background: None,
            font_face: "Arial".to_string(),
            title: None,
            author: None,
            slides: Vec::new(),
        }
    }

    pub fn with_size(mut self, width: i64, height: i64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Solid background applied through the slide master.
    pub fn set_master_background(&mut self, color: &str) -> Result<&mut Self> {
        let hex = srgb(color).ok_or_else(|| PptxError::InvalidColor(color.to_string()))?;
        self.background = Some(hex);
        Ok(self)
    }

    /// Theme font used by text without an explicit typeface.
    pub fn set_font_face(&mut self, face: impl Into<String>) -> &mut Self {
        self.font_face = face.into();
        self
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    pub fn set_author(&mut self, author: impl Into<String>) -> &mut Self {
        self.author = Some(author.into());
        self
    }

    pub fn add_slide(&mut self) -> &mut Slide {
        self.slides.push(Slide::new());
        let last = self.slides.len() - 1;
        &mut self.slides[last]
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn size(&self) -> (i64, i64) {
        (self.width, self.height)
    }

    /// Serialize the package into memory.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        self.write_parts(&mut zip)?;
        Ok(zip.finish()?.into_inner())
    }

    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn write_parts<W: Write + Seek>(&self, zip: &mut ZipWriter<W>) -> Result<()> {
        let notes: Vec<bool> = self.slides.iter().map(|s| s.notes().is_some()).collect();
        let notes_count = notes.iter().filter(|n| **n).count();

        add_part(zip, "[Content_Types].xml", &parts::content_types_xml(&notes)?)?;
        add_part(zip, "_rels/.rels", &parts::root_rels_xml()?)?;
        add_part(
            zip,
            "docProps/core.xml",
            &parts::core_props_xml(self.title.as_deref(), self.author.as_deref())?,
        )?;
        add_part(
            zip,
            "docProps/app.xml",
            &parts::app_props_xml(self.slides.len(), notes_count)?,
        )?;

        add_part(
            zip,
            "ppt/presentation.xml",
            &parts::presentation_xml(self.slides.len(), self.width, self.height)?,
        )?;
        add_part(
            zip,
            "ppt/_rels/presentation.xml.rels",
            &parts::presentation_rels_xml(self.slides.len())?,
        )?;

        add_part(
            zip,
            "ppt/slideMasters/slideMaster1.xml",
            &parts::slide_master_xml(self.background.as_deref())?,
        )?;
        add_part(
            zip,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &parts::slide_master_rels_xml()?,
        )?;
        add_part(
            zip,
            "ppt/slideLayouts/slideLayout1.xml",
            &parts::slide_layout_xml()?,
        )?;
        add_part(
            zip,
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &parts::slide_layout_rels_xml()?,
        )?;
        add_part(
            zip,
            "ppt/notesMasters/notesMaster1.xml",
            &parts::notes_master_xml()?,
        )?;
        add_part(
            zip,
            "ppt/notesMasters/_rels/notesMaster1.xml.rels",
            &parts::notes_master_rels_xml()?,
        )?;
        add_part(
            zip,
            "ppt/theme/theme1.xml",
            &parts::theme_xml("Slide Theme", &self.font_face)?,
        )?;
        add_part(
            zip,
            "ppt/theme/theme2.xml",
            &parts::theme_xml("Notes Theme", &self.font_face)?,
        )?;

        for (idx, slide) in self.slides.iter().enumerate() {
            let n = idx + 1;
            add_part(
                zip,
                &format!("ppt/slides/slide{n}.xml"),
                &slide.to_xml(self.width, self.height)?,
            )?;
            add_part(
                zip,
                &format!("ppt/slides/_rels/slide{n}.xml.rels"),
                &parts::slide_rels_xml(n, slide.notes().is_some())?,
            )?;
            if let Some(notes) = slide.notes_xml() {
                add_part(zip, &format!("ppt/notesSlides/notesSlide{n}.xml"), &notes?)?;
                add_part(
                    zip,
                    &format!("ppt/notesSlides/_rels/notesSlide{n}.xml.rels"),
                    &parts::notes_slide_rels_xml(n)?,
                )?;
            }
        }
        Ok(())
    }
}

fn add_part<W: Write + Seek>(zip: &mut ZipWriter<W>, path: &str, content: &str) -> Result<()> {
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    zip.start_file(path, options)?;
    zip.write_all(content.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slide::{Align, Coord, Paragraph, TextBox, TextStyle};
    use std::io::Read;
    use zip::ZipArchive;

    fn read_part(bytes: &[u8], name: &str) -> Option<String> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).ok()?;
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        Some(out)
    }

    fn body(text: &str) -> TextBox {
        TextBox {
            x: Coord::Inches(0.5),
            y: Coord::Inches(1.5),
            w: Coord::Percent(90.0),
            h: Coord::Percent(70.0),
            align: Align::Right,
            paragraphs: vec![Paragraph::new(
                text,
                TextStyle {
                    bullet: true,
                    ..Default::default()
                },
            )],
        }
    }

    #[test]
    fn test_package_contains_slides_and_notes() {
        let mut pres = Presentation::new();
        pres.set_master_background("#0F172A").unwrap();
        pres.add_slide().add_text(body("أولاً")).set_notes("ملاحظة");
        pres.add_slide().add_text(body("ثانياً"));
        assert_eq!(pres.slide_count(), 2);

        let bytes = pres.to_bytes().unwrap();
        let slide1 = read_part(&bytes, "ppt/slides/slide1.xml").unwrap();
        assert!(slide1.contains("أولاً"));
        assert!(read_part(&bytes, "ppt/slides/slide2.xml").is_some());
        assert!(read_part(&bytes, "ppt/notesSlides/notesSlide1.xml")
            .unwrap()
            .contains("ملاحظة"));
        assert!(read_part(&bytes, "ppt/notesSlides/notesSlide2.xml").is_none());

        let master = read_part(&bytes, "ppt/slideMasters/slideMaster1.xml").unwrap();
        assert!(master.contains(r#"<a:srgbClr val="0F172A"/>"#));
        let pres_xml = read_part(&bytes, "ppt/presentation.xml").unwrap();
        assert!(pres_xml.contains(r#"cx="9144000" cy="5143500""#));
    }

    #[test]
    fn test_invalid_background_is_rejected() {
        let mut pres = Presentation::new();
        assert!(matches!(
            pres.set_master_background("blue"),
            Err(PptxError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_empty_presentation_is_still_a_package() {
        let bytes = Presentation::new().to_bytes().unwrap();
        assert!(read_part(&bytes, "[Content_Types].xml").is_some());
        let pres_xml = read_part(&bytes, "ppt/presentation.xml").unwrap();
        assert!(!pres_xml.contains("sldIdLst"));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        let mut pres = Presentation::new();
        pres.set_font_face("Georgia").add_slide();
        pres.write_to_file(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        let theme = read_part(&bytes, "ppt/theme/theme1.xml").unwrap();
        assert!(theme.contains(r#"typeface="Georgia""#));
    }
}
