/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Typesetter trait for pluggable directive targets.

use crate::digest::CitationIdentifier;

/// Defines how citation text and footnote directives are written for a
/// specific typesetting system.
///
/// The generated text is opaque to this crate. Page placement is only known
/// once the target lays out the document, so directives must decide between
/// a fresh footnote and a back-reference themselves.
pub trait Typesetter: Default + Clone {
    /// Convert literal text into a form the target prints verbatim.
    fn escape(&self, s: &str) -> String;

    /// Shared helpers every directive relies on.
    fn support_directives(&self) -> String;

    /// The per-citation definition: counters plus the footnote command.
    ///
    /// `footnote_text` is already escaped.
    fn directive(&self, id: &CitationIdentifier, footnote_text: &str) -> String;

    /// Text that invokes the directive for `id` at a call site.
    fn invocation(&self, id: &CitationIdentifier) -> String;

    /// Marker line opening the emitted preamble.
    fn begin_marker(&self) -> String;

    /// Marker line closing the emitted preamble.
    fn end_marker(&self) -> String;
}
