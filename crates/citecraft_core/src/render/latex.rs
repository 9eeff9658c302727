/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! LaTeX output target.
//!
//! Each citation `ID` becomes three counters and a command `\ID`:
//!
//! - `rlID` numbers the invocations; every call sets the label
//!   `ccID-<n>` and reads back the page it landed on.
//! - `pgID` holds the page of the footnote currently in force.
//! - `fnID` holds that footnote's number.
//!
//! When the label's page equals `pgID` only a hyperlinked footnote mark is
//! written. Otherwise the global `footnote` counter is stepped and the full
//! footnote text is set, carrying a hypertarget scoped to the page.
//! Pages are read through `\citecraftpage`, which falls back to the current
//! page while the label is still undefined (first LaTeX pass). The
//! document needs `refcount` and `hyperref`.

use super::format::Typesetter;
use crate::digest::CitationIdentifier;

/// Name of the shared page lookup helper.
pub const PAGE_HELPER: &str = "citecraftpage";

/// LaTeX renderer.
#[derive(Debug, Clone, Default)]
pub struct Latex;

impl Typesetter for Latex {
    fn escape(&self, s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '&' => out.push_str(r"\&"),
                '%' => out.push_str(r"\%"),
                '$' => out.push_str(r"\$"),
                '#' => out.push_str(r"\#"),
                '_' => out.push_str(r"\_"),
                '{' => out.push_str(r"\{"),
                '}' => out.push_str(r"\}"),
                '~' => out.push_str(r"\textasciitilde{}"),
                '^' => out.push_str(r"\textasciicircum{}"),
                '\\' => out.push_str(r"\textbackslash{}"),
                '\n' => out.push_str(r"\\"),
                // no-break space and narrow no-break space
                '\u{00A0}' | '\u{202F}' => out.push('~'),
                _ => out.push(c),
            }
        }
        out
    }

    fn support_directives(&self) -> String {
        format!(
            "\\providecommand{{\\{PAGE_HELPER}}}[1]{{\\ifcsname r@#1\\endcsname\\getpagerefnumber{{#1}}\\else\\number\\value{{page}}\\fi}}\n"
        )
    }

    fn directive(&self, id: &CitationIdentifier, footnote_text: &str) -> String {
        let id = id.as_str();
        let label = format!("cc{id}-\\arabic{{rl{id}}}");
        let target = format!("tg{id}-\\arabic{{pg{id}}}");

        let mut out = String::new();
        for counter in ["fn", "rl", "pg"] {
            out.push_str(&format!("\\newcounter{{{counter}{id}}}\n"));
            out.push_str(&format!("\\setcounter{{{counter}{id}}}{{0}}\n"));
        }
        out.push_str(&format!("\\newcommand{{\\{id}}}{{%\n"));
        out.push_str(&format!("\\label{{{label}}}%\n"));
        out.push_str(&format!(
            "\\ifnum\\{PAGE_HELPER}{{{label}}}=\\value{{pg{id}}}%\n"
        ));
        out.push_str(&format!(
            "\\hyperlink{{{target}}}{{\\footnotemark[\\value{{fn{id}}}]}}%\n"
        ));
        out.push_str("\\else%\n");
        out.push_str("\\stepcounter{footnote}%\n");
        out.push_str(&format!(
            "\\setcounter{{pg{id}}}{{\\{PAGE_HELPER}{{{label}}}}}%\n"
        ));
        out.push_str(&format!("\\setcounter{{fn{id}}}{{\\value{{footnote}}}}%\n"));
        out.push_str(&format!(
            "\\footnotetext[\\value{{footnote}}]{{\\vadjust pre{{\\hypertarget{{{target}}}{{}}}}{footnote_text}}}%\n"
        ));
        out.push_str(&format!(
            "\\hyperlink{{{target}}}{{\\footnotemark[\\value{{fn{id}}}]}}%\n"
        ));
        out.push_str("\\fi%\n");
        out.push_str(&format!("\\stepcounter{{rl{id}}}%\n"));
        out.push_str("}%\n");
        out
    }

    fn invocation(&self, id: &CitationIdentifier) -> String {
        format!("\\{}{{}}", id.as_str())
    }

    fn begin_marker(&self) -> String {
        "% citecraft:begin\n".to_string()
    }

    fn end_marker(&self) -> String {
        "% citecraft:end\n".to_string()
    }
}
