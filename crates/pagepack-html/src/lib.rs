//! Head section parser with build-target tag classification.
//!
//! This crate extracts the `<head>` fragment of an HTML document and
//! classifies the script, stylesheet, and favicon tags found in it by
//! their declared `build="..."` target.

pub mod head;
pub mod tags;

pub use head::extract_head;
pub use tags::{parse_head, BuildTarget, FaviconTag, ParsedHead, ResourceTag, TagKind};
