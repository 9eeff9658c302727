/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Label text to pandoc inlines.

use crate::ast::{node_type, push_text, space};
use citecraft_core::InlineConverter;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use serde_json::{json, Value};

/// Parses label source as markdown and emits pandoc inline nodes.
///
/// Block structure is flattened; only inline formatting survives.
#[derive(Debug, Clone, Default)]
pub struct MarkdownInlines;

/// An open inline container.
enum Frame {
    Root,
    Wrap(&'static str),
    Link { url: String, title: String },
}

impl InlineConverter for MarkdownInlines {
    type Inline = Value;

    fn convert(&self, source: &str) -> Vec<Value> {
        let mut stack: Vec<(Frame, Vec<Value>)> = vec![(Frame::Root, Vec::new())];
        let parser = Parser::new_ext(source, Options::ENABLE_STRIKETHROUGH);

        for event in parser {
            match event {
                Event::Start(Tag::Emphasis) => stack.push((Frame::Wrap("Emph"), Vec::new())),
                Event::Start(Tag::Strong) => stack.push((Frame::Wrap("Strong"), Vec::new())),
                Event::Start(Tag::Strikethrough) => {
                    stack.push((Frame::Wrap("Strikeout"), Vec::new()))
                }
                Event::Start(Tag::Link {
                    dest_url, title, ..
                }) => stack.push((
                    Frame::Link {
                        url: dest_url.to_string(),
                        title: title.to_string(),
                    },
                    Vec::new(),
                )),
                Event::End(TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link) => {
                    close_frame(&mut stack)
                }
                Event::End(TagEnd::Paragraph) => {}
                Event::Start(Tag::Paragraph) => {
                    let inlines = current(&mut stack);
                    if !inlines.is_empty() {
                        inlines.push(space());
                    }
                }
                Event::Text(text) => push_text(current(&mut stack), &text),
                Event::Code(code) => {
                    current(&mut stack).push(json!({ "t": "Code", "c": [["", [], []], code.to_string()] }))
                }
                Event::InlineMath(math) => current(&mut stack)
                    .push(json!({ "t": "Math", "c": [{ "t": "InlineMath" }, math.to_string()] })),
                Event::SoftBreak => current(&mut stack).push(json!({ "t": "SoftBreak" })),
                Event::HardBreak => current(&mut stack).push(json!({ "t": "LineBreak" })),
                Event::InlineHtml(html) | Event::Html(html) => current(&mut stack)
                    .push(json!({ "t": "RawInline", "c": ["html", html.to_string()] })),
                _ => {}
            }
        }

        while stack.len() > 1 {
            close_frame(&mut stack);
        }
        let mut inlines = stack.pop().map(|(_, inlines)| inlines).unwrap_or_default();
        while inlines.last().is_some_and(|n| node_type(n) == Some("Space")) {
            inlines.pop();
        }
        inlines
    }
}

fn current(stack: &mut [(Frame, Vec<Value>)]) -> &mut Vec<Value> {
    // The root frame is never popped.
    &mut stack[stack.len() - 1].1
}

fn close_frame(stack: &mut Vec<(Frame, Vec<Value>)>) {
    if stack.len() < 2 {
        return;
    }
    let Some((frame, content)) = stack.pop() else {
        return;
    };
    let node = match frame {
        Frame::Root => return,
        Frame::Wrap(t) => json!({ "t": t, "c": content }),
        Frame::Link { url, title } => {
            json!({ "t": "Link", "c": [["", [], []], content, [url, title]] })
        }
    };
    current(stack).push(node);
}
