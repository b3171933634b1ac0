//! Slide content: positioned text boxes and speaker notes.

use crate::error::{PptxError, Result};
use crate::xml::{escape_xml, srgb, NS_A, NS_P, NS_R, XML_DECL};
use std::fmt::Write as FmtWrite;

/// EMUs per inch (914400 EMU = 1 inch).
pub const EMU_PER_INCH: f64 = 914_400.0;
/// Hundredths of a point per point, the unit of `sz` and `spcPts`.
const CENTIPOINTS: f64 = 100.0;

/// A position or extent, absolute or relative to the slide size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coord {
    Inches(f64),
    /// Percentage (0-100) of the slide width for x/w, height for y/h.
    Percent(f64),
}

impl Coord {
    pub(crate) fn to_emu(self, extent: i64) -> i64 {
        match self {
            Coord::Inches(v) => (v * EMU_PER_INCH).round() as i64,
            Coord::Percent(p) => (extent as f64 * p / 100.0).round() as i64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    fn as_attr(self) -> &'static str {
        match self {
            Align::Left => "l",
            Align::Center => "ctr",
            Align::Right => "r",
        }
    }
}

/// Run and paragraph formatting for one paragraph.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextStyle {
    pub font_size_pt: Option<f64>,
    pub bold: bool,
    /// `RRGGBB`, with or without `#`.
    pub color: Option<String>,
    pub font_face: Option<String>,
    pub bullet: bool,
    pub space_after_pt: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: String,
    pub style: TextStyle,
}

impl Paragraph {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    pub x: Coord,
    pub y: Coord,
    pub w: Coord,
    pub h: Coord,
    pub align: Align,
    pub paragraphs: Vec<Paragraph>,
}

/// One slide being assembled.
#[derive(Debug, Clone, Default)]
pub struct Slide {
    text_boxes: Vec<TextBox>,
    notes: Option<String>,
}

impl Slide {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_text(&mut self, text_box: TextBox) -> &mut Self {
        self.text_boxes.push(text_box);
        self
    }

    /// Speaker notes, written to a notes slide.
    pub fn set_notes(&mut self, notes: impl Into<String>) -> &mut Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn text_boxes(&self) -> &[TextBox] {
        &self.text_boxes
    }

    pub(crate) fn to_xml(&self, slide_width: i64, slide_height: i64) -> Result<String> {
        let mut xml = String::with_capacity(4096);
        xml.push_str(XML_DECL);
        write!(
            xml,
            r#"<p:sld xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}">"#
        )?;
        xml.push_str("<p:cSld><p:spTree>");
        write_group_header(&mut xml);

        for (idx, text_box) in self.text_boxes.iter().enumerate() {
            // Group shape uses id 1.
            let shape_id = idx as u32 + 2;
            write_text_box(&mut xml, shape_id, text_box, slide_width, slide_height)?;
        }

        xml.push_str("</p:spTree></p:cSld>");
        xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
        xml.push_str("</p:sld>");
        Ok(xml)
    }

    pub(crate) fn notes_xml(&self) -> Option<Result<String>> {
        let notes = self.notes.as_ref()?;
        Some(notes_xml(notes))
    }
}

fn notes_xml(notes: &str) -> Result<String> {
    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_DECL);
    write!(
        xml,
        r#"<p:notes xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}">"#
    )?;
    xml.push_str("<p:cSld><p:spTree>");
    write_group_header(&mut xml);

    xml.push_str("<p:sp><p:nvSpPr>");
    xml.push_str(r#"<p:cNvPr id="2" name="Notes Placeholder 1"/>"#);
    xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
    xml.push_str(r#"<p:nvPr><p:ph type="body" idx="1"/></p:nvPr>"#);
    xml.push_str("</p:nvSpPr><p:spPr/>");
    xml.push_str("<p:txBody><a:bodyPr/><a:lstStyle/>");
    for line in notes.lines() {
        xml.push_str("<a:p>");
        if !line.is_empty() {
            write!(
                xml,
                r#"<a:r><a:rPr lang="ar-SA" dirty="0"/><a:t>{}</a:t></a:r>"#,
                escape_xml(line)
            )?;
        }
        xml.push_str("</a:p>");
    }
    if notes.is_empty() {
        xml.push_str("<a:p/>");
    }
    xml.push_str("</p:txBody></p:sp>");

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:notes>");
    Ok(xml)
}

pub(crate) fn write_group_header(xml: &mut String) {
    xml.push_str("<p:nvGrpSpPr>");
    xml.push_str(r#"<p:cNvPr id="1" name=""/>"#);
    xml.push_str("<p:cNvGrpSpPr/><p:nvPr/>");
    xml.push_str("</p:nvGrpSpPr>");
    xml.push_str("<p:grpSpPr><a:xfrm>");
    xml.push_str(r#"<a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#);
    xml.push_str(r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/>"#);
    xml.push_str("</a:xfrm></p:grpSpPr>");
}

fn write_text_box(
    xml: &mut String,
    shape_id: u32,
    text_box: &TextBox,
    slide_width: i64,
    slide_height: i64,
) -> Result<()> {
    let x = text_box.x.to_emu(slide_width);
    let y = text_box.y.to_emu(slide_height);
    let cx = text_box.w.to_emu(slide_width);
    let cy = text_box.h.to_emu(slide_height);

    xml.push_str("<p:sp><p:nvSpPr>");
    write!(
        xml,
        r#"<p:cNvPr id="{shape_id}" name="Text {}"/>"#,
        shape_id - 1
    )?;
    xml.push_str(r#"<p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#);
    xml.push_str("<p:spPr>");
    write!(
        xml,
        r#"<a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#
    )?;
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/>"#);
    xml.push_str("</p:spPr>");

    xml.push_str("<p:txBody>");
    xml.push_str(r#"<a:bodyPr wrap="square" rtlCol="0" anchor="t"><a:normAutofit/></a:bodyPr>"#);
    xml.push_str("<a:lstStyle/>");
    for paragraph in &text_box.paragraphs {
        write_paragraph(xml, paragraph, text_box.align)?;
    }
    if text_box.paragraphs.is_empty() {
        xml.push_str("<a:p/>");
    }
    xml.push_str("</p:txBody></p:sp>");
    Ok(())
}

fn write_paragraph(xml: &mut String, paragraph: &Paragraph, align: Align) -> Result<()> {
    let style = &paragraph.style;

    write!(xml, r#"<a:p><a:pPr algn="{}""#, align.as_attr())?;
    if style.bullet {
        xml.push_str(r#" marL="285750" indent="-285750""#);
    }
    xml.push('>');
    if let Some(after) = style.space_after_pt {
        write!(
            xml,
            r#"<a:spcAft><a:spcPts val="{}"/></a:spcAft>"#,
            (after * CENTIPOINTS).round() as i64
        )?;
    }
    if style.bullet {
        xml.push_str(r#"<a:buFont typeface="Arial"/><a:buChar char="&#8226;"/>"#);
    } else {
        xml.push_str("<a:buNone/>");
    }
    xml.push_str("</a:pPr>");

    xml.push_str(r#"<a:r><a:rPr lang="ar-SA""#);
    if let Some(size) = style.font_size_pt {
        write!(xml, r#" sz="{}""#, (size * CENTIPOINTS).round() as i64)?;
    }
    if style.bold {
        xml.push_str(r#" b="1""#);
    }
    xml.push_str(r#" dirty="0">"#);
    if let Some(color) = &style.color {
        let hex = srgb(color).ok_or_else(|| PptxError::InvalidColor(color.clone()))?;
        write!(xml, r#"<a:solidFill><a:srgbClr val="{hex}"/></a:solidFill>"#)?;
    }
    if let Some(face) = &style.font_face {
        let face = escape_xml(face);
        write!(
            xml,
            r#"<a:latin typeface="{face}"/><a:cs typeface="{face}"/>"#
        )?;
    }
    xml.push_str("</a:rPr>");
    write!(xml, "<a:t>{}</a:t></a:r>", escape_xml(&paragraph.text))?;
    xml.push_str("</a:p>");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title_box(text: &str) -> TextBox {
        TextBox {
            x: Coord::Inches(0.5),
            y: Coord::Inches(0.25),
            w: Coord::Percent(90.0),
            h: Coord::Inches(1.0),
            align: Align::Right,
            paragraphs: vec![Paragraph::new(
                text,
                TextStyle {
                    font_size_pt: Some(32.0),
                    bold: true,
                    color: Some("#1E3A8A".into()),
                    font_face: Some("Georgia".into()),
                    ..Default::default()
                },
            )],
        }
    }

    #[test]
    fn test_coord_to_emu() {
        assert_eq!(Coord::Inches(0.5).to_emu(0), 457_200);
        assert_eq!(Coord::Percent(90.0).to_emu(9_144_000), 8_229_600);
        assert_eq!(Coord::Percent(70.0).to_emu(5_143_500), 3_600_450);
    }

    #[test]
    fn test_title_box_xml() {
        let mut slide = Slide::new();
        slide.add_text(title_box("R&D <plan>"));
        let xml = slide.to_xml(9_144_000, 5_143_500).unwrap();
        assert!(xml.contains(r#"<a:off x="457200" y="228600"/>"#));
        assert!(xml.contains(r#"<a:ext cx="8229600" cy="914400"/>"#));
        assert!(xml.contains(r#"algn="r""#));
        assert!(xml.contains(r#"sz="3200" b="1""#));
        assert!(xml.contains(r#"<a:srgbClr val="1E3A8A"/>"#));
        assert!(xml.contains(r#"<a:latin typeface="Georgia"/>"#));
        assert!(xml.contains("<a:t>R&amp;D &lt;plan&gt;</a:t>"));
        assert!(xml.contains("<a:buNone/>"));
    }

    #[test]
    fn test_bullets_and_spacing() {
        let style = TextStyle {
            font_size_pt: Some(18.0),
            color: Some("0F172A".into()),
            bullet: true,
            space_after_pt: Some(10.0),
            ..Default::default()
        };
        let mut slide = Slide::new();
        slide.add_text(TextBox {
            x: Coord::Inches(0.5),
            y: Coord::Inches(1.5),
            w: Coord::Percent(90.0),
            h: Coord::Percent(70.0),
            align: Align::Right,
            paragraphs: vec![
                Paragraph::new("one", style.clone()),
                Paragraph::new("two", style),
            ],
        });
        let xml = slide.to_xml(9_144_000, 5_143_500).unwrap();
        assert_eq!(xml.matches("<a:buChar").count(), 2);
        assert!(xml.contains(r#"<a:spcPts val="1000"/>"#));
        assert!(xml.contains(r#"sz="1800""#));
    }

    #[test]
    fn test_invalid_color_is_rejected() {
        let mut bad = title_box("x");
        bad.paragraphs[0].style.color = Some("navy".into());
        let mut slide = Slide::new();
        slide.add_text(bad);
        assert!(matches!(
            slide.to_xml(1, 1),
            Err(PptxError::InvalidColor(c)) if c == "navy"
        ));
    }

    #[test]
    fn test_notes_xml_has_one_paragraph_per_line() {
        let mut slide = Slide::new();
        assert!(slide.notes_xml().is_none());
        slide.set_notes("first\nsecond");
        let xml = slide.notes_xml().unwrap().unwrap();
        assert!(xml.contains(r#"<p:ph type="body" idx="1"/>"#));
        assert!(xml.contains("<a:t>first</a:t>"));
        assert!(xml.contains("<a:t>second</a:t>"));
    }
}
