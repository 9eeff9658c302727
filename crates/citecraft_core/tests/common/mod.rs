/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

#![allow(dead_code)]

use citecraft_core::{CiteError, InlineConverter, NoteSource};
use std::cell::Cell;
use std::collections::HashMap;
use std::path::PathBuf;

// --- Note storage ---

/// In-memory notes that count how often storage is read.
#[derive(Debug, Default)]
pub struct MemoryNotes {
    notes: HashMap<String, String>,
    reads: Cell<usize>,
}

impl MemoryNotes {
    pub fn with(mut self, note: &str, text: &str) -> Self {
        self.notes.insert(note.to_string(), text.to_string());
        self
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl NoteSource for MemoryNotes {
    fn locate(&self, note: &str) -> PathBuf {
        PathBuf::from("/notes").join(format!("{note}.md"))
    }

    fn read(&self, note: &str) -> Result<String, CiteError> {
        match self.notes.get(note) {
            Some(text) => {
                self.reads.set(self.reads.get() + 1);
                Ok(text.clone())
            }
            None => Err(CiteError::NoteNotFound {
                note: note.to_string(),
                path: self.locate(note),
            }),
        }
    }
}

pub const TREATY: &str = "---\ncitationTitle: \"Treaty X\"\n---\nPreamble text.\n";

pub const REPORT: &str = "---
date: 2024-01-05
title: \"Report\"
sender: \"Agency\"
---
The agency states this.

>%%TAGS%%
>##p. 12; ##finding
^abc123
";

pub const NO_HEADER: &str = "Just a loose note.\n";

pub const BROKEN_HEADER: &str = "---\ntitle: [oops\n---\n";

pub fn sample_notes() -> MemoryNotes {
    MemoryNotes::default()
        .with("treaty", TREATY)
        .with("report", REPORT)
        .with("loose", NO_HEADER)
        .with("broken", BROKEN_HEADER)
}

// --- Inline conversion ---

/// Splits label text into words; records every call.
#[derive(Debug, Default)]
pub struct WordConverter {
    pub calls: Cell<usize>,
}

impl InlineConverter for WordConverter {
    type Inline = String;

    fn convert(&self, source: &str) -> Vec<String> {
        self.calls.set(self.calls.get() + 1);
        source.split_whitespace().map(str::to_string).collect()
    }
}

// --- Page simulation ---

/// What one directive invocation shows on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission {
    /// A new footnote with its text, followed by a mark linking to it.
    Footnote { number: u32, text: String },
    /// Only a mark linking to footnote `number`.
    BackReference { number: u32 },
}

#[derive(Debug, Clone)]
struct Branches {
    same_page: String,
    new_page: String,
}

/// Stand-in for the typesetting pass.
///
/// Reads each `\newcommand` from an emitted preamble, then plays
/// invocations against caller-chosen pages, following whichever branch of
/// the directive the page comparison selects.
#[derive(Debug, Default)]
pub struct StubPageRenderer {
    directives: HashMap<String, Branches>,
    /// Per identifier: last seen page and footnote number.
    state: HashMap<String, (u32, u32)>,
    footnote: u32,
}

impl StubPageRenderer {
    pub fn from_preamble(preamble: &str) -> Self {
        let mut directives = HashMap::new();
        let mut rest = preamble;
        while let Some(start) = rest.find("\\newcommand{\\") {
            let after = &rest[start + "\\newcommand{\\".len()..];
            let id_end = after.find('}').expect("command name");
            let id = after[..id_end].to_string();
            let body_end = after.find("\n}%\n").expect("command end");
            let body = &after[..body_end];

            let (head, tail) = body.split_once("\\else%").expect("else branch");
            let (_, same_page) = head.split_once("\\ifnum").expect("page comparison");
            let (new_page, _) = tail.split_once("\\fi%").expect("fi");
            directives.insert(
                id,
                Branches {
                    same_page: same_page.to_string(),
                    new_page: new_page.to_string(),
                },
            );
            rest = &after[body_end..];
        }

        Self {
            directives,
            ..Default::default()
        }
    }

    pub fn defines(&self, id: &str) -> bool {
        self.directives.contains_key(id)
    }

    pub fn footnote_counter(&self) -> u32 {
        self.footnote
    }

    pub fn invoke(&mut self, id: &str, page: u32) -> Emission {
        let branches = self.directives.get(id).expect("defined directive").clone();
        let (seen_page, number) = self.state.get(id).copied().unwrap_or((0, 0));

        let branch = if page == seen_page {
            &branches.same_page
        } else {
            &branches.new_page
        };

        if branch.contains("\\stepcounter{footnote}") {
            self.footnote += 1;
        }

        match footnote_text(branch) {
            Some(text) => {
                self.state.insert(id.to_string(), (page, self.footnote));
                Emission::Footnote {
                    number: self.footnote,
                    text,
                }
            }
            None => Emission::BackReference { number },
        }
    }
}

fn footnote_text(branch: &str) -> Option<String> {
    let line = branch.lines().find(|l| l.starts_with("\\footnotetext"))?;
    let (_, after_target) = line.split_once("{}}")?;
    Some(after_target.strip_suffix("}%")?.to_string())
}
