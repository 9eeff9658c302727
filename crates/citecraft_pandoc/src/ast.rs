/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Helpers for pandoc's JSON document model.
//!
//! Nodes are kept as [`serde_json::Value`] so that every construct pandoc
//! emits survives a round trip through the filter, including the ones this
//! crate never touches.

use serde_json::{json, Map, Value};

/// The `t` tag of an element, if it is one.
pub fn node_type(value: &Value) -> Option<&str> {
    value.get("t")?.as_str()
}

pub fn str_node(text: &str) -> Value {
    json!({ "t": "Str", "c": text })
}

pub fn space() -> Value {
    json!({ "t": "Space" })
}

pub fn raw_latex(text: &str) -> Value {
    json!({ "t": "RawInline", "c": ["latex", text] })
}

pub fn double_quoted(content: Vec<Value>) -> Value {
    json!({ "t": "Quoted", "c": [{ "t": "DoubleQuote" }, content] })
}

/// Split text into `Str`/`Space` inlines the way pandoc's reader does.
pub fn text_inlines(text: &str) -> Vec<Value> {
    let mut out = Vec::new();
    push_text(&mut out, text);
    out
}

/// Append text to an inline list, merging with a trailing `Str`.
pub fn push_text(out: &mut Vec<Value>, text: &str) {
    for (i, word) in text.split(' ').enumerate() {
        if i > 0 && !out.last().is_some_and(|n| node_type(n) == Some("Space")) {
            out.push(space());
        }
        if word.is_empty() {
            continue;
        }
        match out.last_mut() {
            Some(Value::Object(last)) if i == 0 && last.get("t") == Some(&json!("Str")) => {
                let head = last.get("c").and_then(Value::as_str).unwrap_or_default();
                let merged = format!("{head}{word}");
                last.insert("c".to_string(), Value::String(merged));
            }
            _ => out.push(str_node(word)),
        }
    }
}

/// Plain text of an inline list, spaces and breaks collapsed to `' '`.
pub fn stringify(value: &Value) -> String {
    let mut out = String::new();
    collect_text(value, &mut out);
    out
}

fn collect_text(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => items.iter().for_each(|v| collect_text(v, out)),
        Value::Object(_) => match node_type(value) {
            Some("Str") => out.push_str(value["c"].as_str().unwrap_or_default()),
            Some("Space") | Some("SoftBreak") | Some("LineBreak") => out.push(' '),
            Some("Code") | Some("Math") | Some("RawInline") => {
                out.push_str(value["c"][1].as_str().unwrap_or_default())
            }
            _ => {
                if let Some(content) = value.get("c") {
                    collect_text(content, out);
                }
            }
        },
        _ => {}
    }
}

/// Parts of a pandoc `Link` element.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkParts<'a> {
    pub classes: Vec<&'a str>,
    pub content: &'a Value,
    pub url: &'a str,
    pub title: &'a str,
}

impl LinkParts<'_> {
    /// Links produced by pandoc's `wikilinks_title_after_pipe` extension.
    pub fn is_wikilink(&self) -> bool {
        self.title == "wikilink" || self.classes.contains(&"wikilink")
    }
}

/// Decompose `{"t":"Link","c":[attr, content, [url, title]]}`.
pub fn link_parts(value: &Value) -> Option<LinkParts<'_>> {
    if node_type(value) != Some("Link") {
        return None;
    }
    let c = value.get("c")?.as_array()?;
    let classes = c
        .first()?
        .get(1)?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .collect();
    let target = c.get(2)?.as_array()?;
    Some(LinkParts {
        classes,
        content: c.get(1)?,
        url: target.first()?.as_str()?,
        title: target.get(1)?.as_str()?,
    })
}

/// Store raw LaTeX under `field` in the document metadata.
pub fn set_meta_raw_latex(doc: &mut Value, field: &str, latex: &str) {
    let Some(root) = doc.as_object_mut() else {
        return;
    };
    let meta = root
        .entry("meta")
        .or_insert_with(|| Value::Object(Map::new()));
    if let Some(meta) = meta.as_object_mut() {
        meta.insert(
            field.to_string(),
            json!({ "t": "MetaInlines", "c": [raw_latex(latex)] }),
        );
    }
}
