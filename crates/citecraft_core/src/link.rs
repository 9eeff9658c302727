/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Wikilink resolution.
//!
//! A citation link names a note and a locator inside it, `note#^abc123`,
//! optionally followed by a label: `[[note#^abc123|as stated]]`. The
//! resolver turns one such link into replacement content for the host
//! document: the label (if any) followed by an invocation of the
//! citation's directive.

use crate::citation::{build_citation, CitationText};
use crate::config::CiteConfig;
use crate::digest::{CitationIdentifier, CitationRequest};
use crate::error::{CiteError, Result};
use crate::note::{HeaderState, NoteCache, NoteSource};
use crate::registry::CitationRegistry;
use crate::render::Typesetter;
use regex::Regex;
use std::path::Path;
use tracing::warn;

/// A link target split into note and locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    pub note: String,
    pub locator: String,
}

impl LinkTarget {
    /// Split `note#^locator`. Anything else is not a citation link.
    pub fn parse(raw: &str) -> Result<Self> {
        let malformed = || CiteError::MalformedLinkTarget(raw.to_string());
        let (note, locator) = raw.trim().rsplit_once('#').ok_or_else(malformed)?;
        let note = note.trim();

        let valid_locator = locator.len() > 1
            && locator.starts_with('^')
            && locator[1..]
                .chars()
                .all(|c| c.is_alphanumeric() || c == '-' || c == '_');
        if note.is_empty() || !valid_locator {
            return Err(malformed());
        }

        Ok(Self {
            note: note.to_string(),
            locator: locator.to_string(),
        })
    }
}

/// A raw `[[target|label]]` occurrence inside a text token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikilinkMatch<'a> {
    /// Text glued to the link on the left, e.g. an opening quote.
    pub pre: &'a str,
    /// The link as written, brackets included.
    pub link: &'a str,
    pub target: &'a str,
    pub label: Option<&'a str>,
    /// Text glued to the link on the right, e.g. closing punctuation.
    pub post: &'a str,
}

/// A regex-based finder for raw wikilink syntax.
pub struct WikilinkParser {
    token_regex: Regex,
}

impl Default for WikilinkParser {
    fn default() -> Self {
        Self {
            token_regex: Regex::new(
                r"^(?P<pre>[^\[]*?)(?P<link>\[\[(?P<target>[^\[\]|]+)(?:\|(?P<label>[^\[\]]*))?\]\])(?P<post>.*)$",
            )
            .unwrap(),
        }
    }
}

impl WikilinkParser {
    /// Match the first wikilink in a text token. Later links stay in `post`.
    pub fn find<'a>(&self, text: &'a str) -> Option<WikilinkMatch<'a>> {
        let cap = self.token_regex.captures(text)?;
        Some(WikilinkMatch {
            pre: cap.name("pre").map_or("", |m| m.as_str()),
            link: cap.name("link")?.as_str(),
            target: cap.name("target")?.as_str(),
            label: cap.name("label").map(|m| m.as_str()),
            post: cap.name("post").map_or("", |m| m.as_str()),
        })
    }
}

/// Converts label source text into the host's inline representation.
pub trait InlineConverter {
    type Inline;

    fn convert(&self, source: &str) -> Vec<Self::Inline>;
}

/// What the host should put in place of a link.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<I> {
    /// Not a citation link, or one that should stay as written.
    Unchanged,
    /// Visible text reporting a broken reference.
    Diagnostic(String),
    /// Label content (if any) followed by the directive invocation.
    Citation {
        label: Option<Vec<I>>,
        identifier: CitationIdentifier,
        invocation: String,
    },
}

/// Resolves citation links against the run's note cache and registry.
pub struct LinkResolver<'a, S: NoteSource, T: Typesetter> {
    notes: &'a mut NoteCache<S>,
    registry: &'a mut CitationRegistry<T>,
    config: &'a CiteConfig,
}

impl<'a, S: NoteSource, T: Typesetter> LinkResolver<'a, S, T> {
    pub fn new(
        notes: &'a mut NoteCache<S>,
        registry: &'a mut CitationRegistry<T>,
        config: &'a CiteConfig,
    ) -> Self {
        Self {
            notes,
            registry,
            config,
        }
    }

    /// Resolve one link.
    ///
    /// `raw_label` is the label source as written; `None`, blank text and
    /// the configured unlabeled markers all select the unlabeled form,
    /// which cites with the comparison prefix.
    pub fn resolve_link<C: InlineConverter>(
        &mut self,
        raw_target: &str,
        raw_label: Option<&str>,
        converter: &C,
    ) -> Resolution<C::Inline> {
        let target = match LinkTarget::parse(raw_target) {
            Ok(target) => target,
            Err(_) => return Resolution::Unchanged,
        };

        let label = raw_label
            .filter(|l| !self.config.is_unlabeled_marker(l))
            .map(|l| converter.convert(l.trim()));

        let location = self.notes.source().locate(&target.note);
        let note = match self.notes.resolve(&target.note) {
            Ok(note) => note,
            Err(err) => {
                warn!("{err}");
                return Resolution::Diagnostic(diagnostic_text(&err, &location));
            }
        };

        let text = match &note.header {
            HeaderState::Present(header) => {
                build_citation(header, &self.config.incomplete_citation)
            }
            HeaderState::Malformed(_) => {
                CitationText::new(self.config.incomplete_citation.clone(), "")
            }
            HeaderState::Absent => {
                warn!(note = %target.note, "note has no header; leaving link unchanged");
                return Resolution::Unchanged;
            }
        };
        let tag = note.locator_tag(&target.locator).unwrap_or_default().to_string();

        let prefix = if label.is_some() {
            String::new()
        } else {
            self.config.compare_prefix.clone()
        };
        let request = CitationRequest::new(prefix, text.display, tag, text.qualifier);
        let identifier = self.registry.register(&request);
        let invocation = self.registry.invocation(&identifier);

        Resolution::Citation {
            label,
            identifier,
            invocation,
        }
    }
}

fn diagnostic_text(err: &CiteError, location: &Path) -> String {
    match err {
        CiteError::NoteNotFound { path, .. } => format!("note not found: {}", path.display()),
        CiteError::NoteUnreadable { path, source } => {
            format!("note unreadable: {} ({source})", path.display())
        }
        other => format!("note unavailable: {} ({other})", location.display()),
    }
}
