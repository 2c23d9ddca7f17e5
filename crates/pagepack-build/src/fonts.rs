//! Font compilation into embedded `@font-face` CSS.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use pagepack_html::ResourceTag;

use crate::assets;

const FONT_EXTENSIONS: [&str; 4] = ["ttf", "woff", "woff2", "otf"];

/// Fonts compiled from a `build="fonts"` tag.
#[derive(Debug, Default)]
pub struct CompiledFonts {
    /// Head text with the fonts link replaced by a `<style>` block
    pub head: String,

    /// Font files that were embedded
    pub embedded: Vec<PathBuf>,
}

/// Replace the fonts link tag with a `<style>` block embedding every
/// font file found next to the link target.
///
/// The directory containing the tag's `href` target is scanned
/// (non-recursively) for `.ttf`, `.woff`, `.woff2`, and `.otf` files;
/// each becomes an `@font-face` rule with the file stem as the family
/// name and the bytes as a base64 data URL. An unreadable directory or
/// file is logged and skipped.
pub fn compile_fonts(tag: &ResourceTag, head: &str, minify: bool) -> CompiledFonts {
    tracing::info!("Compiling fonts");

    let folder = tag.path.parent().unwrap_or(Path::new(""));
    let mut css = String::new();
    let mut embedded = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() || !is_font_file(path) {
            continue;
        }

        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Failed to read font {}: {}", path.display(), e);
                continue;
            }
        };

        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("font");
        tracing::info!("\t{}", name);

        let family = path.file_stem().and_then(|s| s.to_str()).unwrap_or("font");
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        css.push_str(&format!(
            "@font-face {{\n    font-family: '{}';\n    src: url({});\n}}\n",
            family,
            assets::data_url(&format!("font/{};charset=utf-8", ext), &data),
        ));

        embedded.push(path.to_path_buf());
    }

    if minify {
        css = assets::minify_css(&css).unwrap_or(css);
    }

    CompiledFonts {
        head: head.replacen(&tag.raw, &format!("<style>\n{}\n</style>", css), 1),
        embedded,
    }
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| FONT_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagepack_html::{BuildTarget, TagKind};
    use tempfile::tempdir;

    fn fonts_tag(base: &Path) -> ResourceTag {
        ResourceTag {
            kind: TagKind::Stylesheet,
            raw: r#"<link rel="stylesheet" href="fonts/fonts.css" build="fonts">"#.to_string(),
            target: BuildTarget::Fonts,
            file: "fonts/fonts.css".to_string(),
            path: base.join("fonts/fonts.css"),
        }
    }

    #[test]
    fn embeds_sibling_fonts() {
        let temp = tempdir().unwrap();
        let fonts_dir = temp.path().join("fonts");
        fs::create_dir_all(&fonts_dir).unwrap();
        fs::write(fonts_dir.join("Inter.woff2"), b"abc").unwrap();
        fs::write(fonts_dir.join("readme.txt"), b"not a font").unwrap();

        let tag = fonts_tag(temp.path());
        let compiled = compile_fonts(&tag, &tag.raw, false);

        assert!(compiled.head.starts_with("<style>"));
        assert!(compiled.head.contains("font-family: 'Inter';"));
        assert!(compiled
            .head
            .contains("data:font/woff2;charset=utf-8;base64,YWJj"));
        assert_eq!(compiled.embedded, vec![fonts_dir.join("Inter.woff2")]);
    }

    #[test]
    fn fonts_in_name_order() {
        let temp = tempdir().unwrap();
        let fonts_dir = temp.path().join("fonts");
        fs::create_dir_all(&fonts_dir).unwrap();
        fs::write(fonts_dir.join("Zeta.ttf"), b"z").unwrap();
        fs::write(fonts_dir.join("Alpha.ttf"), b"a").unwrap();

        let tag = fonts_tag(temp.path());
        let compiled = compile_fonts(&tag, &tag.raw, false);

        let alpha = compiled.head.find("Alpha").unwrap();
        let zeta = compiled.head.find("Zeta").unwrap();
        assert!(alpha < zeta);
    }

    #[test]
    fn missing_folder_produces_empty_style() {
        let temp = tempdir().unwrap();
        let tag = fonts_tag(temp.path());

        let compiled = compile_fonts(&tag, &tag.raw, false);
        assert!(compiled.embedded.is_empty());
        assert!(compiled.head.contains("<style>"));
    }
}
