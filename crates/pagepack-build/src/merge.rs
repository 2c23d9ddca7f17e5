//! Bucket aggregation: concatenating tagged resources into named
//! output files.

use std::fs;
use std::path::Path;

use pagepack_html::{BuildTarget, TagKind};

use crate::assets;
use crate::pipeline::{LoadedTag, PackError};

/// A merge bucket: the resources routed to one named output file.
#[derive(Debug)]
pub struct Bucket {
    /// Output file name (the build target value)
    pub name: String,

    /// Kind of the replacement tag, taken from the first member
    pub kind: TagKind,

    /// Member file contents, in document order
    pub texts: Vec<String>,

    /// Member tag texts, in document order
    pub raws: Vec<String>,

    /// Member source references, for logging
    pub files: Vec<String>,

    /// Whether any member script tag was `async`
    pub is_async: bool,

    /// Whether any member script tag was `defer`
    pub is_defer: bool,
}

impl Bucket {
    /// The tag that stands in for the whole bucket in the head.
    pub fn replacement_tag(&self) -> String {
        match self.kind {
            TagKind::Script => {
                let is_async = if self.is_async { " async " } else { "" };
                let is_defer = if self.is_defer { " defer" } else { "" };
                format!(
                    "<script src=\"./{}\"{}{}></script>",
                    self.name, is_async, is_defer
                )
            }
            TagKind::Stylesheet => {
                format!("<link rel=\"stylesheet\" href=\"./{}\">", self.name)
            }
        }
    }
}

/// Group merge-targeted tags into buckets, preserving document order
/// within each bucket and across bucket creation.
pub fn collect_buckets(tags: &[LoadedTag]) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = Vec::new();

    for loaded in tags {
        let BuildTarget::Merge(ref name) = loaded.tag.target else {
            continue;
        };

        let idx = match buckets.iter().position(|b| &b.name == name) {
            Some(idx) => idx,
            None => {
                buckets.push(Bucket {
                    name: name.clone(),
                    kind: loaded.tag.kind,
                    texts: Vec::new(),
                    raws: Vec::new(),
                    files: Vec::new(),
                    is_async: false,
                    is_defer: false,
                });
                buckets.len() - 1
            }
        };
        let bucket = &mut buckets[idx];

        bucket.texts.push(loaded.text.clone());
        bucket.raws.push(loaded.tag.raw.clone());
        bucket.files.push(loaded.tag.file.clone());
        bucket.is_async |= loaded.tag.is_async();
        bucket.is_defer |= loaded.tag.is_defer();
    }

    buckets
}

/// Write each bucket's concatenated contents to the output directory
/// and substitute the replacement tags into the head text.
///
/// The bucket's first member tag becomes the replacement tag; the
/// remaining member tags are removed.
pub fn write_buckets(
    buckets: &[Bucket],
    head: &str,
    output_dir: &Path,
    minify: bool,
) -> Result<String, PackError> {
    tracing::info!("Merging files");
    let mut head = head.to_string();

    for bucket in buckets {
        tracing::info!(
            "\t{} [{}]: {}",
            bucket.name,
            bucket.raws.len(),
            bucket.files.join("   ")
        );

        let mut contents = bucket.texts.join("\n");
        if minify && bucket.kind == TagKind::Stylesheet {
            contents = assets::minify_css(&contents).unwrap_or(contents);
        }

        let path = output_dir.join(&bucket.name);
        fs::write(&path, contents)
            .map_err(|e| PackError::WriteError(format!("{}: {}", path.display(), e)))?;

        for (i, raw) in bucket.raws.iter().enumerate() {
            let replacement = if i == 0 {
                bucket.replacement_tag()
            } else {
                String::new()
            };
            head = head.replacen(raw, &replacement, 1);
        }
    }

    Ok(head)
}
