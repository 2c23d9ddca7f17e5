//! `<head>` section extraction.

use std::sync::LazyLock;

use regex::Regex;

static HEAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<head[^>]*>(.*?)</head>").expect("Invalid head regex")
});

/// Extract the inner text of the first `<head>...</head>` section.
///
/// Returns a slice of the original document so the caller can later
/// substitute the transformed head back in by exact text replacement.
pub fn extract_head(html: &str) -> Option<&str> {
    HEAD_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_head_contents() {
        let html = "<html><head>\n<title>Hi</title>\n</head><body></body></html>";
        assert_eq!(extract_head(html), Some("\n<title>Hi</title>\n"));
    }

    #[test]
    fn handles_attributes_and_case() {
        let html = r#"<HEAD lang="en"><meta charset="utf-8"></HEAD>"#;
        assert_eq!(extract_head(html), Some(r#"<meta charset="utf-8">"#));
    }

    #[test]
    fn returns_none_without_head() {
        assert_eq!(extract_head("<html><body>no head</body></html>"), None);
    }

    #[test]
    fn takes_first_head_only() {
        let html = "<head>first</head><head>second</head>";
        assert_eq!(extract_head(html), Some("first"));
    }
}
