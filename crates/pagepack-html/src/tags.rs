//! Tag classification by build target.
//!
//! Scripts and stylesheets in the head opt into packing with a
//! `build="..."` attribute naming the bucket they should land in:
//! a merged output file name, `inline`, or `fonts`.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// Kind of a taggable head resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Script,
    Stylesheet,
}

/// Where a tagged resource is routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildTarget {
    /// Substitute the file contents directly into the head.
    Inline,
    /// Compile the sibling font files into an embedded `<style>` block.
    Fonts,
    /// Concatenate into the named output file.
    Merge(String),
}

impl BuildTarget {
    /// Parse a `build` attribute value.
    pub fn from_attr(value: &str) -> Self {
        match value {
            "inline" => Self::Inline,
            "fonts" => Self::Fonts,
            other => Self::Merge(other.to_string()),
        }
    }
}

/// A script or stylesheet tag that carries a build target.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceTag {
    /// Kind of resource
    pub kind: TagKind,

    /// The tag text exactly as it appears in the head
    pub raw: String,

    /// Declared build target
    pub target: BuildTarget,

    /// Source reference as written in the tag
    pub file: String,

    /// Source path resolved against the input document's directory
    pub path: PathBuf,
}

impl ResourceTag {
    /// Whether the tag carries an `async` attribute.
    pub fn is_async(&self) -> bool {
        self.raw.to_lowercase().contains(" async")
    }

    /// Whether the tag carries a `defer` attribute.
    pub fn is_defer(&self) -> bool {
        self.raw.to_lowercase().contains(" defer")
    }
}

/// A favicon link eligible for data URL embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct FaviconTag {
    /// The tag text exactly as it appears in the head
    pub raw: String,

    /// The `href` value as written
    pub file: String,
}

impl FaviconTag {
    /// MIME type from the tag's `type` attribute, if present.
    pub fn mime(&self) -> Option<&str> {
        TYPE_RE
            .captures(&self.raw)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Classified contents of a head section.
#[derive(Debug, Clone, Default)]
pub struct ParsedHead {
    /// Tags routed to inline or merge buckets, in document order
    /// (scripts before stylesheets)
    pub tags: Vec<ResourceTag>,

    /// Favicons eligible for embedding
    pub favicons: Vec<FaviconTag>,

    /// The fonts tag, if any (first one wins)
    pub fonts: Option<ResourceTag>,
}

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b.*?</script>").expect("Invalid script regex"));

static STYLESHEET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<link\s+[^>]*?rel\s*=\s*["']stylesheet["'][^>]*?>"#)
        .expect("Invalid stylesheet regex")
});

static FAVICON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<link\s+[^>]*?rel\s*=\s*["']\s*icon\s*["'][^>]*?>"#)
        .expect("Invalid favicon regex")
});

static BUILD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)build\s*=\s*['"]([^'"]*)['"]"#).expect("Invalid build regex")
});

static SRC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)src\s*=\s*['"]([^'"]+)['"]"#).expect("Invalid src regex"));

static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)href\s*=\s*['"]([^'"]+)['"]"#).expect("Invalid href regex"));

static TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)type\s*=\s*['"]([^'"]+)['"]"#).expect("Invalid type regex"));

// Favicon hrefs at or past this length are assumed to already be data URLs.
const FAVICON_HREF_MAX: usize = 100;

/// Classify the script, stylesheet, and favicon tags of a head section.
///
/// Tags without a `build` attribute do not participate and are left
/// untouched in the document. Source references are resolved against
/// `base_dir`, the directory of the input document.
pub fn parse_head(head: &str, base_dir: &Path) -> ParsedHead {
    let mut parsed = ParsedHead::default();

    let candidates = SCRIPT_RE
        .find_iter(head)
        .map(|m| (TagKind::Script, m.as_str()))
        .chain(
            STYLESHEET_RE
                .find_iter(head)
                .map(|m| (TagKind::Stylesheet, m.as_str())),
        );

    for (kind, raw) in candidates {
        let Some(target) = build_target(raw) else {
            continue;
        };

        let source = match kind {
            TagKind::Script => &SRC_RE,
            TagKind::Stylesheet => &HREF_RE,
        };
        let Some(file) = source
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
        else {
            tracing::warn!("Tag with build target has no source reference: {}", raw);
            continue;
        };

        let tag = ResourceTag {
            kind,
            raw: raw.to_string(),
            path: base_dir.join(&file),
            file,
            target,
        };

        if tag.target == BuildTarget::Fonts {
            if parsed.fonts.is_none() {
                parsed.fonts = Some(tag);
            }
            continue;
        }

        parsed.tags.push(tag);
    }

    if let Some(raw) = FAVICON_RE.find(head).map(|m| m.as_str()) {
        let href = HREF_RE
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str());

        if let Some(file) = href.filter(|h| h.len() < FAVICON_HREF_MAX) {
            parsed.favicons.push(FaviconTag {
                raw: raw.to_string(),
                file: file.to_string(),
            });
        }
    }

    parsed
}

/// Parse the `build` attribute of a tag, if present and non-empty.
fn build_target(raw: &str) -> Option<BuildTarget> {
    BUILD_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .filter(|m| !m.as_str().is_empty())
        .map(|m| BuildTarget::from_attr(m.as_str()))
}
