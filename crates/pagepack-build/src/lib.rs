//! Packing pipeline for HTML documents and their tagged assets.
//!
//! Takes a document whose head-section resources declare build targets
//! and produces a reduced set of output files: merged bundles, inlined
//! tags, and data-URL-embedded fonts and favicons.

pub mod assets;
pub mod clean;
pub mod fonts;
pub mod merge;
pub mod pipeline;

pub use pipeline::{PackConfig, PackError, PackResult, Packer};
