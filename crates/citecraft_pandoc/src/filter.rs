/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Document traversal.
//!
//! Walks a pandoc JSON document in order, hands every wikilink to the
//! [`LinkResolver`] and splices the returned content in place of the link.
//! After the walk the registry's preamble is stored in the document
//! metadata.

use crate::ast::{
    double_quoted, link_parts, node_type, raw_latex, set_meta_raw_latex, str_node, stringify,
    text_inlines,
};
use crate::inline::MarkdownInlines;
use citecraft_core::{
    CitationRegistry, CiteConfig, InlineConverter, Latex, LinkResolver, NoteCache, NoteSource,
    Resolution, WikilinkParser,
};
use serde_json::Value;
use tracing::debug;

/// Output formats whose writers pass raw LaTeX through.
pub const LATEX_FORMATS: [&str; 2] = ["latex", "beamer"];

pub fn is_latex_format(format: &str) -> bool {
    LATEX_FORMATS.contains(&format.to_ascii_lowercase().as_str())
}

/// Counts reported after a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSummary {
    /// Distinct citations in the preamble.
    pub citations: usize,
    /// Notes read from storage.
    pub notes: usize,
}

/// Rewrite every citation link in `doc` and attach the preamble.
pub fn filter_document<S: NoteSource>(
    doc: &mut Value,
    config: &CiteConfig,
    source: S,
) -> FilterSummary {
    let mut notes = NoteCache::new(source);
    let mut registry = CitationRegistry::new(config.identifier_length);

    if let Some(blocks) = doc.get_mut("blocks") {
        let mut walker = Walker {
            resolver: LinkResolver::new(&mut notes, &mut registry, config),
            parser: WikilinkParser::default(),
            markdown: MarkdownInlines,
            config,
        };
        walker.walk(blocks);
    }

    let summary = FilterSummary {
        citations: registry.len(),
        notes: notes.len(),
    };
    set_meta_raw_latex(doc, &config.preamble_field, &registry.into_preamble());
    debug!(?summary, "filter finished");
    summary
}

/// Hands out inlines pandoc has already built for a link label.
struct Prerendered<'a>(&'a Value);

impl InlineConverter for Prerendered<'_> {
    type Inline = Value;

    fn convert(&self, _source: &str) -> Vec<Value> {
        self.0.as_array().cloned().unwrap_or_default()
    }
}

struct Walker<'a, S: NoteSource> {
    resolver: LinkResolver<'a, S, Latex>,
    parser: WikilinkParser,
    markdown: MarkdownInlines,
    config: &'a CiteConfig,
}

impl<S: NoteSource> Walker<'_, S> {
    fn walk(&mut self, value: &mut Value) {
        match value {
            Value::Array(items) => {
                let old = std::mem::take(items);
                for mut item in old {
                    match self.rewrite(&item) {
                        Some(replacement) => items.extend(replacement),
                        None => {
                            self.walk(&mut item);
                            items.push(item);
                        }
                    }
                }
            }
            Value::Object(map) => map.values_mut().for_each(|v| self.walk(v)),
            _ => {}
        }
    }

    /// Replacement inlines for a node, or `None` to keep it.
    fn rewrite(&mut self, node: &Value) -> Option<Vec<Value>> {
        match node_type(node)? {
            "Link" => self.rewrite_link(node),
            "Str" => self.rewrite_str(node),
            _ => None,
        }
    }

    fn rewrite_link(&mut self, node: &Value) -> Option<Vec<Value>> {
        let link = link_parts(node)?;
        if !link.is_wikilink() {
            return None;
        }
        let label_text = stringify(link.content);
        let label = (label_text.trim() != link.url).then_some(label_text.as_str());

        match self
            .resolver
            .resolve_link(link.url, label, &Prerendered(link.content))
        {
            Resolution::Unchanged => None,
            Resolution::Diagnostic(text) => Some(text_inlines(&text)),
            Resolution::Citation {
                label, invocation, ..
            } => Some(self.citation_inlines(label, &invocation)),
        }
    }

    fn rewrite_str(&mut self, node: &Value) -> Option<Vec<Value>> {
        let mut rest = node.get("c")?.as_str()?;
        let mut out = Vec::new();
        let mut pending = String::new();
        let mut changed = false;

        while let Some(found) = self.parser.find(rest) {
            pending.push_str(found.pre);
            let middle = match self
                .resolver
                .resolve_link(found.target, found.label, &self.markdown)
            {
                Resolution::Unchanged => {
                    pending.push_str(found.link);
                    rest = found.post;
                    continue;
                }
                Resolution::Diagnostic(text) => text_inlines(&text),
                Resolution::Citation {
                    label, invocation, ..
                } => self.citation_inlines(label, &invocation),
            };
            changed = true;
            if !pending.is_empty() {
                out.push(str_node(&std::mem::take(&mut pending)));
            }
            out.extend(middle);
            rest = found.post;
        }

        if !changed {
            return None;
        }
        pending.push_str(rest);
        if !pending.is_empty() {
            out.push(str_node(&pending));
        }
        Some(out)
    }

    fn citation_inlines(&self, label: Option<Vec<Value>>, invocation: &str) -> Vec<Value> {
        let mut out = match label {
            Some(label) if self.config.quote_labels => vec![double_quoted(label)],
            Some(label) => label,
            None => Vec::new(),
        };
        out.push(raw_latex(invocation));
        out
    }
}
