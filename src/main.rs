//! aptdoc — extract lint-rule documentation from APT rule catalogues.
//!
//! Two modes:
//!
//! - **stdin mode**: `aptdoc < rules.apt`
//! - **file mode**: `aptdoc -f json docs/*.apt`

use anyhow::{Context, Result};
use aptdoc::model::Extraction;
use aptdoc::{parser, render};
use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "aptdoc",
    about = "Extract lint-rule documentation from APT rule catalogues"
)]
struct Cli {
    /// Input files, directories, or glob patterns. If omitted, reads stdin.
    files: Vec<String>,

    /// Output file. Defaults to stdout.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: markdown (default), json
    #[arg(short = 'f', long, default_value = "markdown")]
    format: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.files.is_empty() {
        return stdin_mode(&cli);
    }

    file_mode(&cli)
}

/// stdin mode: parse a single document from stdin and render it.
fn stdin_mode(cli: &Cli) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let mut extraction = Extraction::default();
    parser::merge::fold(&mut extraction, parser::apt::parse(&input));
    write_output(cli, &extraction)
}

/// file mode: expand inputs, extract, report diagnostics on stderr, render.
fn file_mode(cli: &Cli) -> Result<()> {
    let files = expand_globs(&cli.files)?;
    let extraction = parser::extract_files(&files);

    for failure in &extraction.failures {
        eprintln!(
            "warning: skipping {}: {}",
            failure.path.display(),
            failure.reason
        );
    }
    for conflict in &extraction.conflicts {
        eprintln!(
            "warning: conflicting descriptions for rule {}: kept {:?}, rejected {:?}",
            conflict.rule, conflict.kept, conflict.rejected
        );
    }

    write_output(cli, &extraction)
}

fn write_output(cli: &Cli, extraction: &Extraction) -> Result<()> {
    let renderer = render::create_renderer(&cli.format)?;
    let rendered = renderer.render(extraction);
    match &cli.output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{}", rendered),
    }
    Ok(())
}

/// File extensions recognized as documentation source files.
const SUPPORTED_EXTENSIONS: &[&str] = &["apt"];

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for supported file types.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // If it's a directory, scan for supported extensions (non-recursive)
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() {
                    if let Some(ext) = p.extension().and_then(|e| e.to_str()) {
                        if SUPPORTED_EXTENSIONS.contains(&ext) {
                            files.push(p);
                        }
                    }
                }
            }
            continue;
        }
        // Try as glob
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            eprintln!("warning: no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic output; the library itself preserves whatever
    // order the caller hands it.
    files.sort();
    files.dedup();
    Ok(files)
}
