/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Citecraft filter executable
//!
//! Reads a pandoc JSON document on stdin and writes the rewritten document
//! to stdout. Logs go to stderr; set `RUST_LOG` to adjust them.
//!
//! Usage: citecraft [FORMAT]

use anyhow::{Context, Result};
use citecraft_core::{CiteConfig, FsNoteSource};
use citecraft_pandoc::{filter_document, is_latex_format};
use clap::Parser;
use serde_json::Value;
use std::io::{self, Read, Write};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Target format, as passed by pandoc to JSON filters
    format: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = CiteConfig::load_from_env().context("failed to load citecraft configuration")?;

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read pandoc JSON from stdin")?;
    let mut doc: Value =
        serde_json::from_str(&input).context("stdin is not a pandoc JSON document")?;

    match cli.format.as_deref() {
        Some(format) if !is_latex_format(format) => {
            warn!(format, "citations are only rendered for LaTeX output; passing through");
        }
        _ => {
            let source = FsNoteSource::new(&config.notes_dir);
            let summary = filter_document(&mut doc, &config, source);
            info!(
                citations = summary.citations,
                notes = summary.notes,
                "citations resolved"
            );
        }
    }

    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, &doc).context("failed to write pandoc JSON")?;
    stdout.flush().context("failed to flush stdout")?;
    Ok(())
}
