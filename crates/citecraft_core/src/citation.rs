/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Citation text derived from a note header.

use crate::note::NoteHeader;

pub const CITATION_TITLE: &str = "citationTitle";
pub const CITATION_TITLE_POSTFIX: &str = "citationTitlePostfix";
pub const DATE: &str = "date";
pub const TITLE: &str = "title";
pub const SENDER: &str = "sender";

/// Display text of a citation plus its trailing qualifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CitationText {
    pub display: String,
    pub qualifier: String,
}

impl CitationText {
    pub fn new(display: impl Into<String>, qualifier: impl Into<String>) -> Self {
        Self {
            display: display.into(),
            qualifier: qualifier.into(),
        }
    }
}

/// Build the citation text for a header.
///
/// `citationTitle` takes precedence over everything else. Without it the
/// text is `{date} - von {sender} - {title}`, and `incomplete` stands in
/// when any of the three is missing.
pub fn build_citation(header: &NoteHeader, incomplete: &str) -> CitationText {
    if let Some(title) = header.text(CITATION_TITLE) {
        let postfix = header.text(CITATION_TITLE_POSTFIX).unwrap_or_default();
        return CitationText::new(title, postfix);
    }

    let date = header.date(DATE).map(|d| d.format("%Y.%m.%d").to_string());
    match (date, header.text(TITLE), header.text(SENDER)) {
        (Some(date), Some(title), Some(sender)) => {
            CitationText::new(format!("{date} - von {sender} - {title}"), "")
        }
        _ => CitationText::new(incomplete, ""),
    }
}
