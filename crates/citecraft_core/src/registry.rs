/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! The citation registry.
//!
//! Every distinct [`CitationRequest`] gets exactly one entry holding its
//! rendered directive. Repeated requests return the existing identifier, so
//! a citation that recurs anywhere in the document shares one set of
//! counters and one command. Entries keep first-registration order.

use crate::digest::{CitationIdentifier, CitationKey, CitationRequest};
use crate::render::{Latex, Typesetter};
use indexmap::IndexMap;
use tracing::{debug, warn};

/// One registered citation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationEntry {
    pub identifier: CitationIdentifier,
    pub key: CitationKey,
    pub directive: String,
}

/// Run-wide mapping from identifier to directive.
#[derive(Debug, Clone)]
pub struct CitationRegistry<T: Typesetter = Latex> {
    typesetter: T,
    identifier_length: usize,
    entries: IndexMap<CitationIdentifier, CitationEntry>,
}

impl CitationRegistry<Latex> {
    pub fn new(identifier_length: usize) -> Self {
        Self::with_typesetter(Latex, identifier_length)
    }
}

impl<T: Typesetter> CitationRegistry<T> {
    pub fn with_typesetter(typesetter: T, identifier_length: usize) -> Self {
        Self {
            typesetter,
            identifier_length: identifier_length.max(1),
            entries: IndexMap::new(),
        }
    }

    pub fn typesetter(&self) -> &T {
        &self.typesetter
    }

    /// Register a citation and return its identifier.
    ///
    /// Only the first registration of a key renders a directive.
    pub fn register(&mut self, request: &CitationRequest) -> CitationIdentifier {
        let key = request.key();
        let identifier = key.identifier(self.identifier_length);

        if let Some(existing) = self.entries.get(&identifier) {
            if existing.key != key {
                warn!(
                    identifier = %identifier,
                    "identifier collision between distinct citations; reusing the first"
                );
            }
            return identifier;
        }

        let text = compose_footnote_text(&self.typesetter, request);
        let directive = self.typesetter.directive(&identifier, &text);
        debug!(identifier = %identifier, body = %request.body, "registered citation");

        self.entries.insert(
            identifier.clone(),
            CitationEntry {
                identifier: identifier.clone(),
                key,
                directive,
            },
        );
        identifier
    }

    /// Call-site text for a registered identifier.
    pub fn invocation(&self, identifier: &CitationIdentifier) -> String {
        self.typesetter.invocation(identifier)
    }

    pub fn get(&self, identifier: &CitationIdentifier) -> Option<&CitationEntry> {
        self.entries.get(identifier)
    }

    /// Entries in first-registration order.
    pub fn entries(&self) -> impl Iterator<Item = &CitationEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Emit the complete preamble: markers, shared helpers and every
    /// directive in registration order.
    ///
    /// Consumes the registry; call it once all links are resolved.
    pub fn into_preamble(self) -> String {
        let mut out = self.typesetter.begin_marker();
        out.push_str(&self.typesetter.support_directives());
        for entry in self.entries.values() {
            out.push_str(&entry.directive);
        }
        out.push_str(&self.typesetter.end_marker());
        out
    }
}

/// Escape each field and join them as `prefix body, tag, postfix`,
/// skipping empty parts.
pub fn compose_footnote_text<T: Typesetter>(typesetter: &T, request: &CitationRequest) -> String {
    let mut text = String::new();
    if !request.prefix.is_empty() {
        text.push_str(&typesetter.escape(&request.prefix));
        text.push(' ');
    }
    text.push_str(&typesetter.escape(&request.body));
    for qualifier in [&request.tag, &request.postfix] {
        if !qualifier.is_empty() {
            text.push_str(", ");
            text.push_str(&typesetter.escape(qualifier));
        }
    }
    text
}
