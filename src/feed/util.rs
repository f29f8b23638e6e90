//! Utility functions for feed processing.

/// HTML entities that show up in feeds but are not defined by XML.
const HTML_ENTITIES: [(&str, &str); 9] = [
    ("&nbsp;", "&#160;"),
    ("&ndash;", "&#8211;"),
    ("&mdash;", "&#8212;"),
    ("&rsquo;", "&#8217;"),
    ("&lsquo;", "&#8216;"),
    ("&rdquo;", "&#8221;"),
    ("&ldquo;", "&#8220;"),
    ("&amp;amp;", "&amp;"),
    ("&apos;", "&#39;"),
];

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// True for absolute http(s) URLs.
pub fn is_valid_url(url: &str) -> bool {
    url::Url::parse(url).map_or(false, |parsed| matches!(parsed.scheme(), "http" | "https"))
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

/// Best-effort repair of a feed body that failed to parse.
///
/// Drops a BOM and anything before the document start, rewrites HTML-only
/// entities, strips characters XML forbids, and makes sure there is a
/// declaration.
pub fn cleanup_xml(xml: &str) -> String {
    let body = xml.trim().trim_start_matches('\u{FEFF}');
    let start = ["<?xml", "<rss", "<feed"]
        .iter()
        .find_map(|marker| body.find(marker))
        .unwrap_or(0);

    let mut cleaned: String = body[start..].chars().filter(|&c| is_xml_char(c)).collect();
    for (entity, replacement) in HTML_ENTITIES {
        cleaned = cleaned.replace(entity, replacement);
    }

    if cleaned.starts_with("<?xml") {
        cleaned
    } else {
        format!("{}{}", XML_DECLARATION, cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("https://feeds.bbci.co.uk/news/rss.xml"));
        assert!(is_valid_url("http://example.com/feed"));
        assert!(!is_valid_url("ftp://example.com/feed"));
        assert!(!is_valid_url("not a url"));
    }

    #[test]
    fn test_cleanup_xml() {
        let cleaned = cleanup_xml("\u{FEFF}junk<rss><title>A&nbsp;B &mdash; C\u{0001}</title></rss>");
        assert!(cleaned.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss>"));
        assert!(cleaned.contains("A&#160;B &#8212; C</title>"));
        assert!(!cleaned.contains("junk"));
    }

    #[test]
    fn test_cleanup_keeps_existing_declaration() {
        let xml = "  <?xml version=\"1.0\"?><feed>&apos;x&apos;</feed>";
        assert_eq!(cleanup_xml(xml), "<?xml version=\"1.0\"?><feed>&#39;x&#39;</feed>");
    }
}
