//! Data URL encoding and CSS processing.

use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use pagepack_html::FaviconTag;

/// Encode bytes as a `data:` URL.
pub fn data_url(mime: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(data))
}

/// Minify CSS using lightningcss.
pub fn minify_css(css: &str) -> Result<String, String> {
    use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

    let stylesheet = StyleSheet::parse(css, ParserOptions::default())
        .map_err(|e| format!("CSS parse error: {}", e))?;

    let minified = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..Default::default()
        })
        .map_err(|e| format!("CSS minify error: {}", e))?;

    Ok(minified.code)
}

/// Replace favicon `href` values with data URLs of the referenced files.
///
/// A favicon whose file cannot be read is logged and left untouched.
pub fn embed_favicons(favicons: &[FaviconTag], head: &str, base_dir: &Path) -> String {
    let mut head = head.to_string();

    for favicon in favicons {
        let path = base_dir.join(&favicon.file);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Missing favicon {}: {}", path.display(), e);
                continue;
            }
        };

        tracing::info!("Adding b64 favicon {}", favicon.file);

        let mime = favicon
            .mime()
            .map(str::to_string)
            .unwrap_or_else(|| mime_from_extension(&favicon.file));
        let url = data_url(&mime, &data);

        let new_tag = favicon
            .raw
            .replace(&format!("\"{}\"", favicon.file), &format!("\"{}\"", url))
            .replace(&format!("'{}'", favicon.file), &format!("\"{}\"", url));
        head = head.replacen(&favicon.raw, &new_tag, 1);
    }

    head
}

/// Guess an image MIME type from a file extension.
fn mime_from_extension(file: &str) -> String {
    let ext = Path::new(file)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    match ext.to_lowercase().as_str() {
        "ico" => "image/x-icon".to_string(),
        "png" => "image/png".to_string(),
        "svg" => "image/svg+xml".to_string(),
        "jpg" | "jpeg" => "image/jpeg".to_string(),
        "gif" => "image/gif".to_string(),
        "webp" => "image/webp".to_string(),
        _ => "application/octet-stream".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn encodes_data_url() {
        assert_eq!(data_url("image/png", b"abc"), "data:image/png;base64,YWJj");
    }

    #[test]
    fn embeds_favicon_from_type_attribute() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("favicon.png"), b"abc").unwrap();

        let head = r#"<link rel="icon" type="image/png" href="favicon.png">"#;
        let favicons = vec![FaviconTag {
            raw: head.to_string(),
            file: "favicon.png".to_string(),
        }];

        let out = embed_favicons(&favicons, head, temp.path());
        assert!(out.contains(r#"href="data:image/png;base64,YWJj""#));
        assert!(!out.contains("favicon.png\""));
    }

    #[test]
    fn guesses_mime_when_type_missing() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("favicon.ico"), b"abc").unwrap();

        let head = r#"<link rel="icon" href="favicon.ico">"#;
        let favicons = vec![FaviconTag {
            raw: head.to_string(),
            file: "favicon.ico".to_string(),
        }];

        let out = embed_favicons(&favicons, head, temp.path());
        assert!(out.contains("data:image/x-icon;base64,"));
    }

    #[test]
    fn missing_favicon_left_untouched() {
        let head = r#"<link rel="icon" href="gone.png">"#;
        let favicons = vec![FaviconTag {
            raw: head.to_string(),
            file: "gone.png".to_string(),
        }];

        let temp = tempdir().unwrap();
        let out = embed_favicons(&favicons, head, temp.path());
        assert_eq!(out, head);
    }

    #[test]
    fn minifies_css() {
        let css = "body {\n  color: red;\n}\n";
        let minified = minify_css(css).unwrap();
        assert_eq!(minified, "body{color:red}");
    }
}
