/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Canonical citation keys and the identifiers derived from them.
//!
//! An identifier has to work as a LaTeX control sequence name, so it is
//! drawn from ASCII letters only. It is a deduplication handle, not a
//! security token.

use sha2::{Digest, Sha256};
use std::fmt;

const ALPHABET: &[u8; 52] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Bytes at or above this bound are skipped so every letter is equally likely.
const REJECTION_BOUND: u8 = 208;

/// The four raw (unescaped) fields of one citation occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CitationRequest {
    pub prefix: String,
    pub body: String,
    pub tag: String,
    pub postfix: String,
}

impl CitationRequest {
    pub fn new(
        prefix: impl Into<String>,
        body: impl Into<String>,
        tag: impl Into<String>,
        postfix: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            body: body.into(),
            tag: tag.into(),
            postfix: postfix.into(),
        }
    }

    pub fn key(&self) -> CitationKey {
        CitationKey::from_request(self)
    }
}

/// Canonical form of a [`CitationRequest`].
///
/// Each field is length-prefixed, so no two distinct requests share a key
/// even when text moves from one field into its neighbour.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CitationKey(String);

impl CitationKey {
    pub fn from_request(request: &CitationRequest) -> Self {
        let fields = [
            &request.prefix,
            &request.body,
            &request.tag,
            &request.postfix,
        ];
        let key = fields
            .iter()
            .map(|f| format!("{}:{}", f.len(), f))
            .collect::<Vec<_>>()
            .join("|");
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive the identifier for this key.
    pub fn identifier(&self, length: usize) -> CitationIdentifier {
        let digest = Sha256::digest(self.0.as_bytes());
        CitationIdentifier(identifier_from_digest(&digest, length))
    }
}

/// Letters-only handle naming one registry entry and its LaTeX macro.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CitationIdentifier(String);

impl CitationIdentifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CitationIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Map digest bytes onto `[A-Za-z]` and cut the result to `length`.
///
/// When the digest runs out of usable bytes it is hashed again and the
/// scan continues over the new block, so any length can be produced.
pub fn identifier_from_digest(digest: &[u8], length: usize) -> String {
    let mut out = String::with_capacity(length);
    let mut block = digest.to_vec();

    while out.len() < length {
        for &b in &block {
            if out.len() == length {
                break;
            }
            if b < REJECTION_BOUND {
                out.push(ALPHABET[usize::from(b % 52)] as char);
            }
        }
        block = Sha256::digest(&block).to_vec();
    }

    out
}
