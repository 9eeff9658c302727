/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Citecraft core
//!
//! Turns note wikilinks such as `[[report#^abc123|as stated]]` into
//! deduplicated, page-aware footnote citations. Each distinct citation is
//! registered once and rendered as a LaTeX command that prints a fresh
//! footnote the first time it appears on a page and a back-reference to
//! that footnote on later appearances on the same page.
//!
//! # Example
//!
//! ```rust
//! use citecraft_core::{CitationRegistry, CitationRequest};
//!
//! let mut registry = CitationRegistry::new(15);
//! let request = CitationRequest::new("vgl.", "Treaty X", "", "");
//! let first = registry.register(&request);
//! let second = registry.register(&request);
//! assert_eq!(first, second);
//! assert_eq!(registry.len(), 1);
//!
//! let preamble = registry.into_preamble();
//! assert!(preamble.starts_with("% citecraft:begin"));
//! ```

pub mod citation;
pub mod config;
pub mod digest;
pub mod error;
pub mod link;
pub mod note;
pub mod registry;
pub mod render;

pub use citation::{build_citation, CitationText};
pub use config::CiteConfig;
pub use digest::{identifier_from_digest, CitationIdentifier, CitationKey, CitationRequest};
pub use error::{CiteError, Result};
pub use link::{InlineConverter, LinkResolver, LinkTarget, Resolution, WikilinkMatch, WikilinkParser};
pub use note::{FsNoteSource, HeaderState, NoteCache, NoteHeader, NoteSource, ParsedNote};
pub use registry::{CitationEntry, CitationRegistry};
pub use render::{Latex, Typesetter};
