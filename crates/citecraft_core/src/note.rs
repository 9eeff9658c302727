/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Note metadata resolution.
//!
//! A note is a markdown file with an optional YAML header and any number of
//! tagged-locator blocks:
//!
//! ```text
//! ---
//! title: Report
//! ---
//! >%%TAGS%%
//! >##p. 12; ##summary
//! ^abc123
//! ```
//!
//! Each note is read and parsed at most once per run; [`NoteCache`] keeps
//! the result for every later link to the same note.

use crate::error::{CiteError, Result};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde_yaml::Value;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const HEADER_MARKER: &str = "---";
const TAGS_INTRODUCER: &str = ">%%TAGS%%";

/// Storage seam for note files.
pub trait NoteSource {
    /// Conventional location of a note.
    fn locate(&self, note: &str) -> PathBuf;

    /// Full text of a note.
    ///
    /// Returns [`CiteError::NoteNotFound`] when nothing exists at
    /// [`NoteSource::locate`].
    fn read(&self, note: &str) -> Result<String>;
}

/// Notes stored as `{base_dir}/{note}.md`.
#[derive(Debug, Clone)]
pub struct FsNoteSource {
    base_dir: PathBuf,
}

impl FsNoteSource {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl NoteSource for FsNoteSource {
    fn locate(&self, note: &str) -> PathBuf {
        self.base_dir.join(format!("{note}.md"))
    }

    fn read(&self, note: &str) -> Result<String> {
        let path = self.locate(note);
        if !path.is_file() {
            return Err(CiteError::NoteNotFound {
                note: note.to_string(),
                path,
            });
        }
        std::fs::read_to_string(&path).map_err(|source| CiteError::NoteUnreadable { path, source })
    }
}

/// Fields of a note's YAML header, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteHeader {
    fields: IndexMap<String, Value>,
}

impl NoteHeader {
    pub fn from_fields(fields: IndexMap<String, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Scalar field as text, as written. Blank strings count as absent.
    pub fn text(&self, field: &str) -> Option<String> {
        let text = match self.fields.get(field)? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        (!text.trim().is_empty()).then_some(text)
    }

    /// Field as a calendar date.
    ///
    /// Accepts `YYYY-MM-DD` and date-times that start with one.
    pub fn date(&self, field: &str) -> Option<NaiveDate> {
        let Value::String(s) = self.fields.get(field)? else {
            return None;
        };
        let s = s.trim();
        let day = s.get(..10)?;
        match s[10..].chars().next() {
            None | Some('T') | Some('t') | Some(' ') => {}
            Some(_) => return None,
        }
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Outcome of reading a note's header.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderState {
    /// The note does not start with a `---` delimited block.
    Absent,
    /// A header block exists but is not a YAML mapping.
    Malformed(String),
    Present(NoteHeader),
}

impl HeaderState {
    pub fn header(&self) -> Option<&NoteHeader> {
        match self {
            HeaderState::Present(header) => Some(header),
            _ => None,
        }
    }
}

/// Metadata of one note.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedNote {
    pub header: HeaderState,
    /// Locator (`^abc123`) to the first tag of its tag block.
    pub locator_tags: IndexMap<String, String>,
}

impl ParsedNote {
    pub fn locator_tag(&self, locator: &str) -> Option<&str> {
        self.locator_tags.get(locator).map(String::as_str)
    }
}

/// Parse the text of a note. `note` is only used in diagnostics.
pub fn parse_note(note: &str, text: &str) -> ParsedNote {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let (header, body) = match split_header(text) {
        Some((raw, body)) => (parse_header(note, raw), body),
        None => (HeaderState::Absent, text),
    };

    ParsedNote {
        header,
        locator_tags: parse_locator_tags(body),
    }
}

/// Split off a leading `---` block, returning the raw header and the rest.
fn split_header(text: &str) -> Option<(&str, &str)> {
    let mut lines = text.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != HEADER_MARKER {
        return None;
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if line.trim_end() == HEADER_MARKER {
            return Some((&text[start..offset], &text[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

fn parse_header(note: &str, raw: &str) -> HeaderState {
    if raw.trim().is_empty() {
        return HeaderState::Present(NoteHeader::default());
    }

    match serde_yaml::from_str::<Value>(raw) {
        Ok(Value::Mapping(mapping)) => {
            let fields = mapping
                .into_iter()
                .filter_map(|(k, v)| match k {
                    Value::String(k) => Some((k, v)),
                    _ => None,
                })
                .collect();
            HeaderState::Present(NoteHeader::from_fields(fields))
        }
        Ok(Value::Null) => HeaderState::Present(NoteHeader::default()),
        Ok(_) => {
            let err = CiteError::HeaderParse {
                note: note.to_string(),
                message: "header is not a mapping".to_string(),
            };
            warn!("{err}");
            HeaderState::Malformed(err.to_string())
        }
        Err(e) => {
            let err = CiteError::HeaderParse {
                note: note.to_string(),
                message: e.to_string(),
            };
            warn!("{err}");
            HeaderState::Malformed(err.to_string())
        }
    }
}

/// Collect `>%%TAGS%%` / tag line / `^locator` triples. The first block
/// naming a locator wins.
fn parse_locator_tags(body: &str) -> IndexMap<String, String> {
    let lines: Vec<&str> = body.lines().collect();
    let mut tags = IndexMap::new();

    for (i, line) in lines.iter().enumerate() {
        if line.trim() != TAGS_INTRODUCER {
            continue;
        }
        let (Some(tag_line), Some(locator_line)) = (lines.get(i + 1), lines.get(i + 2)) else {
            continue;
        };
        let Some(locator) = locator_token(locator_line) else {
            continue;
        };
        if let Some(tag) = first_tag(tag_line) {
            tags.entry(locator.to_string()).or_insert(tag);
        }
    }

    tags
}

fn locator_token(line: &str) -> Option<&str> {
    let token = line
        .trim_start_matches(|c: char| c == '>' || c.is_whitespace())
        .split_whitespace()
        .next()?;
    (token.starts_with('^') && token.len() > 1).then_some(token)
}

fn first_tag(line: &str) -> Option<String> {
    let first = line.split(';').next()?;
    let tag = first
        .trim_start_matches(|c: char| matches!(c, '>' | '-' | '*' | '#') || c.is_whitespace())
        .trim_end_matches(|c: char| matches!(c, ',' | ';') || c.is_whitespace());
    (!tag.is_empty()).then(|| tag.to_string())
}

/// Per-run cache of parsed notes.
#[derive(Debug)]
pub struct NoteCache<S: NoteSource> {
    source: S,
    notes: HashMap<String, ParsedNote>,
}

impl<S: NoteSource> NoteCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            notes: HashMap::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Metadata of `note`, reading it on first demand.
    ///
    /// Failed reads are not cached.
    pub fn resolve(&mut self, note: &str) -> Result<&ParsedNote> {
        match self.notes.entry(note.to_string()) {
            Entry::Occupied(entry) => {
                debug!(note, "note cache hit");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                debug!(note, "reading note");
                let text = self.source.read(note)?;
                Ok(entry.insert(parse_note(note, &text)))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "---
date: 2024-01-05
title: Report
sender: Agency
---
Some text.

>%%TAGS%%
>##p. 12; ##summary
^abc123

>%%TAGS%%
>##p. 99
^abc123

>%%TAGS%%
- #Rn. 4,
^def456
";

    #[test]
    fn parses_header_fields() {
        let note = parse_note("report", REPORT);
        let header = note.header.header().unwrap();
        assert_eq!(header.text("title").as_deref(), Some("Report"));
        assert_eq!(header.text("sender").as_deref(), Some("Agency"));
        assert_eq!(
            header.date("date"),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
    }

    #[test]
    fn first_tag_block_wins() {
        let note = parse_note("report", REPORT);
        assert_eq!(note.locator_tag("^abc123"), Some("p. 12"));
        assert_eq!(note.locator_tag("^def456"), Some("Rn. 4"));
        assert_eq!(note.locator_tag("^missing"), None);
        assert_eq!(note.locator_tags.len(), 2);
    }

    #[test]
    fn note_without_header() {
        let note = parse_note("plain", "just text\n>%%TAGS%%\n>##§ 3\n^x1\n");
        assert_eq!(note.header, HeaderState::Absent);
        assert_eq!(note.locator_tag("^x1"), Some("§ 3"));
    }

    #[test]
    fn unterminated_header_is_absent() {
        let note = parse_note("open", "---\ntitle: Report\nno closing line\n");
        assert_eq!(note.header, HeaderState::Absent);
    }

    #[test]
    fn empty_header_is_present() {
        let note = parse_note("empty", "---\n---\nbody\n");
        assert_eq!(note.header, HeaderState::Present(NoteHeader::default()));
    }

    #[test]
    fn malformed_header_is_recovered() {
        let note = parse_note("bad", "---\ntitle: [unclosed\n---\n>%%TAGS%%\n>##p. 1\n^a\n");
        assert!(matches!(note.header, HeaderState::Malformed(_)));
        assert_eq!(note.locator_tag("^a"), Some("p. 1"));

        let note = parse_note("list", "---\n- a\n- b\n---\n");
        assert!(matches!(note.header, HeaderState::Malformed(_)));
    }

    #[test]
    fn crlf_notes() {
        let text = "---\r\ntitle: Report\r\n---\r\n>%%TAGS%%\r\n>##p. 7\r\n^crlf\r\n";
        let note = parse_note("crlf", text);
        assert_eq!(
            note.header.header().unwrap().text("title").as_deref(),
            Some("Report")
        );
        assert_eq!(note.locator_tag("^crlf"), Some("p. 7"));
    }

    #[test]
    fn incomplete_tag_block_is_ignored() {
        let note = parse_note("short", ">%%TAGS%%\n>##p. 1\nnot a locator\n>%%TAGS%%\n>##p. 2\n");
        assert!(note.locator_tags.is_empty());
    }

    #[test]
    fn date_accepts_datetime_and_rejects_other_text() {
        let header: NoteHeader = match parse_note(
            "dates",
            "---\na: 2024-01-05T10:30:00\nb: 2024-01-05 10:30\nc: soon\nd: 2024-13-01\ne: 20240105\n---\n",
        )
        .header
        {
            HeaderState::Present(h) => h,
            other => panic!("unexpected header {other:?}"),
        };
        assert_eq!(header.date("a"), NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(header.date("b"), NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(header.date("c"), None);
        assert_eq!(header.date("d"), None);
        assert_eq!(header.date("e"), None);
    }

    #[test]
    fn scalar_fields_as_text() {
        let note = parse_note(
            "n",
            "---\ntitle: 1984\nsender: ''\nflag: true\nname: \" padded \"\n---\n",
        );
        let header = note.header.header().unwrap();
        assert_eq!(header.text("title").as_deref(), Some("1984"));
        assert_eq!(header.text("sender"), None);
        assert_eq!(header.text("flag").as_deref(), Some("true"));
        assert_eq!(header.text("missing"), None);
        assert_eq!(header.text("name").as_deref(), Some(" padded "));
    }
}
