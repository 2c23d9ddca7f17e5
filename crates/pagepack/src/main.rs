//! Pagepack CLI - packs an HTML document and its tagged assets into
//! fewer files.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use pagepack_build::{PackConfig, Packer};

mod config;

#[derive(Parser)]
#[command(name = "pagepack")]
#[command(about = "Packs an HTML document and its tagged assets into fewer files")]
#[command(version)]
pub struct Cli {
    /// Input HTML document
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory (created if absent; disables overwrite mode)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pack in place and delete superseded source files
    #[arg(long)]
    overwrite: bool,

    /// Place all tagged resources inline
    #[arg(long)]
    inline: bool,

    /// Minify CSS emitted by the pipeline
    #[arg(long)]
    minify: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let file_config = config::load_config()?;
    let config = resolve_config(cli, file_config)?;

    let result = Packer::new(config).pack()?;

    tracing::info!(
        "Inlined {} tags, merged {} bundles, embedded {} fonts in {}ms",
        result.inlined,
        result.merged.len(),
        result.fonts_embedded,
        result.duration_ms
    );
    if result.removed > 0 {
        tracing::info!("Removed {} superseded files", result.removed);
    }
    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}

/// Combine CLI flags and pack.toml into a pack configuration.
/// CLI flags take precedence.
fn resolve_config(cli: Cli, file: config::ConfigFile) -> Result<PackConfig> {
    let Some(input) = cli.input.or(file.pack.input) else {
        bail!("Input path required. Use -i [inputpath]");
    };

    let overwrite = cli.overwrite || file.pack.overwrite;
    let output = cli.output.or(file.pack.output);

    // An explicit output directory disables in-place cleanup.
    let (output_dir, overwrite) = match output {
        Some(dir) => (dir, false),
        None if overwrite => {
            let dir = input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(std::path::Path::new("."))
                .to_path_buf();
            (dir, true)
        }
        None => {
            bail!("Output path required. Use -o [outputpath] or --overwrite");
        }
    };

    Ok(PackConfig {
        input,
        output_dir,
        overwrite,
        inline_all: cli.inline || file.pack.inline,
        minify: cli.minify || file.pack.minify,
    })
}
