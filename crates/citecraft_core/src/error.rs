/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Error types for note resolution and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised inside the citation core.
///
/// None of these abort a run: the link resolver turns each of them into
/// inline text or a pass-through at the offending link.
#[derive(Debug, Error)]
pub enum CiteError {
    #[error("note '{note}' not found at {}", path.display())]
    NoteNotFound { note: String, path: PathBuf },

    #[error("note at {} could not be read: {source}", path.display())]
    NoteUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed header in note '{note}': {message}")]
    HeaderParse { note: String, message: String },

    #[error("malformed link target: {0}")]
    MalformedLinkTarget(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for CiteError {
    fn from(e: toml::de::Error) -> Self {
        CiteError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CiteError>;
