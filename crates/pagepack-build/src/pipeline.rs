//! The packing pipeline.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use pagepack_html::{extract_head, parse_head, BuildTarget, ResourceTag, TagKind};

use crate::assets;
use crate::clean;
use crate::fonts;
use crate::merge;

/// Configuration for packing a document.
#[derive(Debug, Clone)]
pub struct PackConfig {
    /// Input HTML document
    pub input: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Pack in place and delete superseded source files
    pub overwrite: bool,

    /// Route every tagged resource to the inline bucket
    pub inline_all: bool,

    /// Minify CSS emitted by the pipeline
    pub minify: bool,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("index.html"),
            output_dir: PathBuf::from("."),
            overwrite: false,
            inline_all: false,
            minify: false,
        }
    }
}

/// Result of a pack operation.
#[derive(Debug)]
pub struct PackResult {
    /// Number of tags inlined
    pub inlined: usize,

    /// Names of merged output files
    pub merged: Vec<String>,

    /// Number of font files embedded
    pub fonts_embedded: usize,

    /// Number of superseded source files removed
    pub removed: usize,

    /// Output directory
    pub output_dir: PathBuf,

    /// Total pack time in milliseconds
    pub duration_ms: u64,
}

/// Errors that can occur while packing.
#[derive(Debug, thiserror::Error)]
pub enum PackError {
    #[error("Input not found: {0}")]
    InputNotFound(String),

    #[error("No <head> section in {0}")]
    NoHead(String),

    #[error("Failed to read input: {0}")]
    ReadError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// A participating tag together with its file contents.
#[derive(Debug, Clone)]
pub struct LoadedTag {
    /// The classified tag
    pub tag: ResourceTag,

    /// Contents of the referenced file
    pub text: String,
}

/// Document packer.
pub struct Packer {
    config: PackConfig,
}

impl Packer {
    /// Create a new packer.
    pub fn new(config: PackConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline: extract the head, classify tags, substitute
    /// inline/merged/embedded content, write the output, and (in
    /// overwrite mode) delete the superseded sources.
    pub fn pack(&self) -> Result<PackResult, PackError> {
        let start = Instant::now();

        let input = &self.config.input;
        if !input.is_file() {
            return Err(PackError::InputNotFound(input.display().to_string()));
        }
        let input_dir = input.parent().unwrap_or(Path::new("."));
        tracing::info!("Compiling {}", input.display());

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| PackError::WriteError(e.to_string()))?;
        tracing::info!("Outputting to {}", self.config.output_dir.display());

        let html = fs::read_to_string(input)
            .map_err(|e| PackError::ReadError(format!("{}: {}", input.display(), e)))?;

        let old_head = extract_head(&html)
            .ok_or_else(|| PackError::NoHead(input.display().to_string()))?;

        let mut parsed = parse_head(old_head, input_dir);
        if self.config.inline_all {
            tracing::info!("Placing all resources inline");
            for tag in &mut parsed.tags {
                tag.target = BuildTarget::Inline;
            }
        }

        let mut head = assets::embed_favicons(&parsed.favicons, old_head, input_dir);

        let mut font_paths = Vec::new();
        if let Some(fonts_tag) = &parsed.fonts {
            let compiled = fonts::compile_fonts(fonts_tag, &head, self.config.minify);
            head = compiled.head;
            font_paths = compiled.embedded;
        }

        let loaded = self.read_files(&parsed.tags);

        let (head, inlined) = self.build_inline(&loaded, head);

        let buckets = merge::collect_buckets(&loaded);
        let head = merge::write_buckets(&buckets, &head, &self.config.output_dir, self.config.minify)?;

        let out_path = self
            .config
            .output_dir
            .join(input.file_name().unwrap_or_default());
        let new_html = strip_blank_lines(&html.replacen(old_head, &head, 1));
        tracing::info!("Writing compiled HTML to {}", out_path.display());
        fs::write(&out_path, new_html)
            .map_err(|e| PackError::WriteError(format!("{}: {}", out_path.display(), e)))?;

        let mut removed = 0;
        if self.config.overwrite {
            removed = self.clean_sources(&parsed, &loaded, &font_paths);
        }

        tracing::info!("Done");

        Ok(PackResult {
            inlined,
            merged: buckets.into_iter().map(|b| b.name).collect(),
            fonts_embedded: font_paths.len(),
            removed,
            output_dir: self.config.output_dir.clone(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Read each participating tag's file. A missing file is logged
    /// and its tag drops out of the later stages, leaving the original
    /// tag untouched in the document.
    fn read_files(&self, tags: &[ResourceTag]) -> Vec<LoadedTag> {
        let mut loaded = Vec::new();

        for tag in tags {
            match fs::read_to_string(&tag.path) {
                Ok(text) => loaded.push(LoadedTag {
                    tag: tag.clone(),
                    text,
                }),
                Err(e) => {
                    tracing::warn!("MISSING FILE {}: {}", tag.path.display(), e);
                }
            }
        }

        loaded
    }

    /// Substitute inline-bucket tags with their file contents.
    fn build_inline(&self, loaded: &[LoadedTag], head: String) -> (String, usize) {
        tracing::info!("Adding inline files");
        let mut head = head;
        let mut count = 0;

        for item in loaded
            .iter()
            .filter(|l| l.tag.target == BuildTarget::Inline)
        {
            let (element, label) = match item.tag.kind {
                TagKind::Script => ("script", "script"),
                TagKind::Stylesheet => ("style", "css"),
            };
            tracing::info!("\t{} {}", label, item.tag.file);

            let mut text = item.text.clone();
            if self.config.minify && item.tag.kind == TagKind::Stylesheet {
                text = assets::minify_css(&text).unwrap_or(text);
            }

            let basename = Path::new(&item.tag.file)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(&item.tag.file);
            let new_tag = format!(
                "<{} from=\"{}\">\n{}\n</{}>",
                element, basename, text, element
            );
            head = head.replacen(&item.tag.raw, &new_tag, 1);
            count += 1;
        }

        (head, count)
    }

    /// Delete the source files superseded by the packed output and any
    /// directories that end up empty.
    fn clean_sources(
        &self,
        parsed: &pagepack_html::ParsedHead,
        loaded: &[LoadedTag],
        font_paths: &[PathBuf],
    ) -> usize {
        let input_dir = self.config.input.parent().unwrap_or(Path::new("."));
        let mut removed = 0;

        let old_files: Vec<PathBuf> = loaded.iter().map(|l| l.tag.path.clone()).collect();
        tracing::info!("Removing {} compiled files", old_files.len());

        let favicon_files: Vec<PathBuf> = parsed
            .favicons
            .iter()
            .map(|f| input_dir.join(&f.file))
            .collect();
        removed += clean::remove_files(&favicon_files);
        removed += clean::remove_files(&old_files);

        tracing::info!("Removing {} font files", font_paths.len());
        removed += clean::remove_files(font_paths);
        if let Some(fonts_tag) = &parsed.fonts {
            removed += clean::remove_files(&[fonts_tag.path.clone()]);
            if let Some(dir) = fonts_tag.path.parent() {
                clean::remove_empty_dirs(dir);
            }
        }

        tracing::info!("Removing empty folders");
        for dir in clean::parent_dirs(&old_files) {
            clean::remove_empty_dirs(&dir);
        }

        removed
    }
}

/// Drop lines that contain only whitespace.
fn strip_blank_lines(html: &str) -> String {
    let mut out = html
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if html.ends_with('\n') {
        out.push('\n');
    }
    out
}
