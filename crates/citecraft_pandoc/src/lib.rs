/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Citecraft pandoc filter
//!
//! Connects [`citecraft_core`] to pandoc's JSON AST: wikilinks in the
//! document become label text plus a raw LaTeX citation command, and the
//! commands' definitions are stored in the document metadata under
//! `citations-in-preamble` for the LaTeX template to place in its preamble.
//!
//! ```text
//! pandoc notes.md -f markdown+wikilinks_title_after_pipe \
//!     --filter citecraft -o out.pdf
//! ```

pub mod ast;
pub mod filter;
pub mod inline;

pub use filter::{filter_document, is_latex_format, FilterSummary};
pub use inline::MarkdownInlines;
