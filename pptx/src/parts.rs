//! Package-level parts: content types, relationships, master, layout, themes.

use crate::error::Result;
use crate::slide::write_group_header;
use crate::xml::{escape_xml, NS_A, NS_P, NS_R, XML_DECL};
use std::fmt::Write as FmtWrite;

const NS_PKG_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CT_PRESENTATION: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const CT_NOTES_SLIDE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.notesSlide+xml";
const CT_SLIDE_MASTER: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
const CT_SLIDE_LAYOUT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
const CT_NOTES_MASTER: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.notesMaster+xml";
const CT_THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
const CT_CORE: &str = "application/vnd.openxmlformats-package.core-properties+xml";
const CT_APP: &str = "application/vnd.openxmlformats-officedocument.extended-properties+xml";

/// A relationship entry inside a `.rels` part.
pub(crate) struct Rel<'a> {
    pub id: String,
    pub kind: &'a str,
    pub target: String,
}

impl<'a> Rel<'a> {
    pub fn new(id: impl Into<String>, kind: &'a str, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            target: target.into(),
        }
    }
}

pub(crate) fn rels_xml(rels: &[Rel<'_>]) -> Result<String> {
    let mut xml = String::with_capacity(256 + rels.len() * 160);
    xml.push_str(XML_DECL);
    write!(xml, r#"<Relationships xmlns="{NS_PKG_RELS}">"#)?;
    for rel in rels {
        let kind = if rel.kind.starts_with("http") {
            rel.kind.to_string()
        } else {
            format!("{REL_BASE}/{}", rel.kind)
        };
        write!(
            xml,
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            rel.id, kind, rel.target
        )?;
    }
    xml.push_str("</Relationships>");
    Ok(xml)
}

pub(crate) fn root_rels_xml() -> Result<String> {
    rels_xml(&[
        Rel::new("rId1", "officeDocument", "ppt/presentation.xml"),
        Rel::new(
            "rId2",
            "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties",
            "docProps/core.xml",
        ),
        Rel::new("rId3", "extended-properties", "docProps/app.xml"),
    ])
}

/// `[Content_Types].xml` for `slide_count` slides, `notes` marking which have notes.
pub(crate) fn content_types_xml(notes: &[bool]) -> Result<String> {
    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_DECL);
    xml.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    xml.push_str(
        r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    );
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);

    let mut overrides = vec![
        ("/ppt/presentation.xml".to_string(), CT_PRESENTATION),
        ("/ppt/slideMasters/slideMaster1.xml".to_string(), CT_SLIDE_MASTER),
        ("/ppt/slideLayouts/slideLayout1.xml".to_string(), CT_SLIDE_LAYOUT),
        ("/ppt/notesMasters/notesMaster1.xml".to_string(), CT_NOTES_MASTER),
        ("/ppt/theme/theme1.xml".to_string(), CT_THEME),
        ("/ppt/theme/theme2.xml".to_string(), CT_THEME),
        ("/docProps/core.xml".to_string(), CT_CORE),
        ("/docProps/app.xml".to_string(), CT_APP),
    ];
    for (idx, has_notes) in notes.iter().enumerate() {
        let n = idx + 1;
        overrides.push((format!("/ppt/slides/slide{n}.xml"), CT_SLIDE));
        if *has_notes {
            overrides.push((format!("/ppt/notesSlides/notesSlide{n}.xml"), CT_NOTES_SLIDE));
        }
    }
    for (part, content_type) in overrides {
        write!(
            xml,
            r#"<Override PartName="{part}" ContentType="{content_type}"/>"#
        )?;
    }
    xml.push_str("</Types>");
    Ok(xml)
}

pub(crate) fn presentation_xml(slide_count: usize, width: i64, height: i64) -> Result<String> {
    let mut xml = String::with_capacity(1024 + slide_count * 48);
    xml.push_str(XML_DECL);
    write!(
        xml,
        r#"<p:presentation xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" saveSubsetFonts="1">"#
    )?;
    xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);
    xml.push_str(r#"<p:notesMasterIdLst><p:notesMasterId r:id="rId3"/></p:notesMasterIdLst>"#);
    if slide_count > 0 {
        xml.push_str("<p:sldIdLst>");
        for idx in 0..slide_count {
            write!(
                xml,
                r#"<p:sldId id="{}" r:id="{}"/>"#,
                256 + idx,
                presentation_slide_rel_id(idx)
            )?;
        }
        xml.push_str("</p:sldIdLst>");
    }
    write!(xml, r#"<p:sldSz cx="{width}" cy="{height}"/>"#)?;
    xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
    xml.push_str("</p:presentation>");
    Ok(xml)
}

/// rId1 master, rId2 theme, rId3 notes master, slides from rId4.
pub(crate) fn presentation_slide_rel_id(idx: usize) -> String {
    format!("rId{}", idx + 4)
}

pub(crate) fn presentation_rels_xml(slide_count: usize) -> Result<String> {
    let mut rels = vec![
        Rel::new("rId1", "slideMaster", "slideMasters/slideMaster1.xml"),
        Rel::new("rId2", "theme", "theme/theme1.xml"),
        Rel::new("rId3", "notesMaster", "notesMasters/notesMaster1.xml"),
    ];
    for idx in 0..slide_count {
        rels.push(Rel::new(
            presentation_slide_rel_id(idx),
            "slide",
            format!("slides/slide{}.xml", idx + 1),
        ));
    }
    rels_xml(&rels)
}

pub(crate) fn slide_rels_xml(slide_number: usize, has_notes: bool) -> Result<String> {
    let mut rels = vec![Rel::new(
        "rId1",
        "slideLayout",
        "../slideLayouts/slideLayout1.xml",
    )];
    if has_notes {
        rels.push(Rel::new(
            "rId2",
            "notesSlide",
            format!("../notesSlides/notesSlide{slide_number}.xml"),
        ));
    }
    rels_xml(&rels)
}

pub(crate) fn notes_slide_rels_xml(slide_number: usize) -> Result<String> {
    rels_xml(&[
        Rel::new("rId1", "notesMaster", "../notesMasters/notesMaster1.xml"),
        Rel::new("rId2", "slide", format!("../slides/slide{slide_number}.xml")),
    ])
}

const CLR_MAP: &str = r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#;

/// Master carrying the shared background fill.
pub(crate) fn slide_master_xml(background: Option<&str>) -> Result<String> {
    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECL);
    write!(
        xml,
        r#"<p:sldMaster xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}">"#
    )?;
    xml.push_str("<p:cSld>");
    match background {
        Some(hex) => write!(
            xml,
            r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="{hex}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>"#
        )?,
        None => xml.push_str(r#"<p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>"#),
    }
    xml.push_str("<p:spTree>");
    write_group_header(&mut xml);
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str(CLR_MAP);
    xml.push_str(r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>"#);
    xml.push_str("</p:sldMaster>");
    Ok(xml)
}

pub(crate) fn slide_master_rels_xml() -> Result<String> {
    rels_xml(&[
        Rel::new("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
        Rel::new("rId2", "theme", "../theme/theme1.xml"),
    ])
}

pub(crate) fn slide_layout_xml() -> Result<String> {
    let mut xml = String::with_capacity(768);
    xml.push_str(XML_DECL);
    write!(
        xml,
        r#"<p:sldLayout xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" type="blank" preserve="1">"#
    )?;
    xml.push_str(r#"<p:cSld name="Blank"><p:spTree>"#);
    write_group_header(&mut xml);
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sldLayout>");
    Ok(xml)
}

pub(crate) fn slide_layout_rels_xml() -> Result<String> {
    rels_xml(&[Rel::new(
        "rId1",
        "slideMaster",
        "../slideMasters/slideMaster1.xml",
    )])
}

pub(crate) fn notes_master_xml() -> Result<String> {
    let mut xml = String::with_capacity(768);
    xml.push_str(XML_DECL);
    write!(
        xml,
        r#"<p:notesMaster xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}">"#
    )?;
    xml.push_str(r#"<p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>"#);
    write_group_header(&mut xml);
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str(CLR_MAP);
    xml.push_str("</p:notesMaster>");
    Ok(xml)
}

pub(crate) fn notes_master_rels_xml() -> Result<String> {
    rels_xml(&[Rel::new("rId1", "theme", "../theme/theme2.xml")])
}

/// Office theme with the given latin typeface as both major and minor font.
pub(crate) fn theme_xml(name: &str, typeface: &str) -> Result<String> {
    let typeface = escape_xml(typeface);
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECL);
    write!(
        xml,
        r#"<a:theme xmlns:a="{NS_A}" name="{}"><a:themeElements>"#,
        escape_xml(name)
    )?;
    xml.push_str(r#"<a:clrScheme name="Office">"#);
    xml.push_str(r#"<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>"#);
    xml.push_str(r#"<a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#);
    for (tag, hex) in [
        ("dk2", "44546A"),
        ("lt2", "E7E6E6"),
        ("accent1", "4472C4"),
        ("accent2", "ED7D31"),
        ("accent3", "A5A5A5"),
        ("accent4", "FFC000"),
        ("accent5", "5B9BD5"),
        ("accent6", "70AD47"),
        ("hlink", "0563C1"),
        ("folHlink", "954F72"),
    ] {
        write!(xml, r#"<a:{tag}><a:srgbClr val="{hex}"/></a:{tag}>"#)?;
    }
    xml.push_str("</a:clrScheme>");

    xml.push_str(r#"<a:fontScheme name="Office">"#);
    for role in ["majorFont", "minorFont"] {
        write!(
            xml,
            r#"<a:{role}><a:latin typeface="{typeface}"/><a:ea typeface=""/><a:cs typeface="{typeface}"/></a:{role}>"#
        )?;
    }
    xml.push_str("</a:fontScheme>");

    xml.push_str(r#"<a:fmtScheme name="Office"><a:fillStyleLst>"#);
    for _ in 0..3 {
        xml.push_str(r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#);
    }
    xml.push_str("</a:fillStyleLst><a:lnStyleLst>");
    for w in [6350, 12700, 19050] {
        write!(
            xml,
            r#"<a:ln w="{w}"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#
        )?;
    }
    xml.push_str("</a:lnStyleLst><a:effectStyleLst>");
    for _ in 0..3 {
        xml.push_str("<a:effectStyle><a:effectLst/></a:effectStyle>");
    }
    xml.push_str("</a:effectStyleLst><a:bgFillStyleLst>");
    for _ in 0..3 {
        xml.push_str(r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#);
    }
    xml.push_str("</a:bgFillStyleLst></a:fmtScheme>");
    xml.push_str("</a:themeElements></a:theme>");
    Ok(xml)
}

pub(crate) fn core_props_xml(title: Option<&str>, creator: Option<&str>) -> Result<String> {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECL);
    xml.push_str(concat!(
        r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
        r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
        r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#
    ));
    if let Some(title) = title {
        write!(xml, "<dc:title>{}</dc:title>", escape_xml(title))?;
    }
    if let Some(creator) = creator {
        write!(xml, "<dc:creator>{}</dc:creator>", escape_xml(creator))?;
    }
    xml.push_str("</cp:coreProperties>");
    Ok(xml)
}

pub(crate) fn app_props_xml(slide_count: usize, notes_count: usize) -> Result<String> {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECL);
    xml.push_str(r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">"#);
    xml.push_str("<Application>slide</Application>");
    write!(
        xml,
        "<Slides>{slide_count}</Slides><Notes>{notes_count}</Notes>"
    )?;
    xml.push_str("</Properties>");
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_types_lists_slides_and_notes() {
        let xml = content_types_xml(&[true, false]).unwrap();
        assert!(xml.contains(r#"PartName="/ppt/slides/slide1.xml""#));
        assert!(xml.contains(r#"PartName="/ppt/slides/slide2.xml""#));
        assert!(xml.contains(r#"PartName="/ppt/notesSlides/notesSlide1.xml""#));
        assert!(!xml.contains("notesSlide2.xml"));
    }

    #[test]
    fn test_presentation_rels_ids_match_presentation_xml() {
        let pres = presentation_xml(2, 9_144_000, 5_143_500).unwrap();
        let rels = presentation_rels_xml(2).unwrap();
        for idx in 0..2 {
            let rid = presentation_slide_rel_id(idx);
            assert!(pres.contains(&format!(r#"r:id="{rid}""#)));
            assert!(rels.contains(&format!(r#"Id="{rid}""#)));
        }
        assert!(pres.contains(r#"<p:sldSz cx="9144000" cy="5143500"/>"#));
    }

    #[test]
    fn test_master_background() {
        let xml = slide_master_xml(Some("F8FAFC")).unwrap();
        assert!(xml.contains(r#"<a:srgbClr val="F8FAFC"/>"#));
        let plain = slide_master_xml(None).unwrap();
        assert!(plain.contains("bgRef"));
    }

    #[test]
    fn test_rels_expand_short_kinds() {
        let xml = slide_rels_xml(3, true).unwrap();
        assert!(xml.contains(
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide"
        ));
        assert!(xml.contains("../notesSlides/notesSlide3.xml"));
    }
}
