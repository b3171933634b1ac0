/// Escape XML special characters and drop characters XML 1.0 cannot carry.
pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if (c as u32) < 0x20 => {}
            '\u{FFFE}' | '\u{FFFF}' => {}
            c => out.push(c),
        }
    }
    out
}

/// Validate a `RRGGBB` color (optionally `#`-prefixed) and return it uppercased.
pub(crate) fn srgb(value: &str) -> Option<String> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(hex.to_ascii_uppercase())
    } else {
        None
    }
}

pub(crate) const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

pub(crate) const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
pub(crate) const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml("<t>\"x\"'y'</t>"), "&lt;t&gt;&quot;x&quot;&apos;y&apos;&lt;/t&gt;");
        assert_eq!(escape_xml("bell\u{7}\nok"), "bell\nok");
        assert_eq!(escape_xml("مرحبا"), "مرحبا");
        assert_eq!(escape_xml("a\u{FFFE}b\u{FFFF}c\u{FFFD}"), "abc\u{FFFD}");
    }

    #[test]
    fn test_srgb() {
        assert_eq!(srgb("#1e3a8a").as_deref(), Some("1E3A8A"));
        assert_eq!(srgb("FFFFFF").as_deref(), Some("FFFFFF"));
        assert_eq!(srgb("#FFF"), None);
        assert_eq!(srgb("red"), None);
    }
}
