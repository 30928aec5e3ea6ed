//! DOCTYPE Declaration Parsing
//!
//! Extracts the qualified name and the external identifiers from the raw
//! body of a `<!DOCTYPE ...>` declaration. The internal subset (`[...]`)
//! is skipped entirely; none of its declarations are interpreted.

use crate::error::{Error, Result};
use memchr::memchr;

/// Name plus external identifiers of a document type declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctypeDeclaration {
    /// Qualified name of the document element
    pub name: String,
    /// Public identifier (PUBLIC form only)
    pub public_id: Option<String>,
    /// System identifier (PUBLIC and SYSTEM forms)
    pub system_id: Option<String>,
}

/// Name plus at most `PUBLIC pubid sysid`
const MAX_TOKENS: usize = 4;

impl DoctypeDeclaration {
    /// Parse the text that follows `<!DOCTYPE` up to the closing `>`.
    ///
    /// Accepted forms:
    /// - `name`
    /// - `name SYSTEM "sysid"`
    /// - `name PUBLIC "pubid" "sysid"`
    ///
    /// each optionally followed by an internal subset.
    pub fn parse(raw: &str) -> Result<Self> {
        let tokens = tokenize(raw)?;

        let Some(name) = tokens.first() else {
            return Err(malformed("missing document type name"));
        };

        let (public_id, system_id) = match tokens.get(1).copied() {
            None => (None, None),
            Some("PUBLIC") => match (tokens.get(2), tokens.get(3)) {
                (Some(public_id), Some(system_id)) => {
                    (Some(unquote(public_id).to_string()), Some(unquote(system_id).to_string()))
                }
                _ => return Err(malformed("PUBLIC requires a public and a system identifier")),
            },
            Some("SYSTEM") => match tokens.get(2) {
                Some(system_id) => (None, Some(unquote(system_id).to_string())),
                None => return Err(malformed("SYSTEM requires a system identifier")),
            },
            Some(other) => {
                return Err(malformed(format!("expected PUBLIC or SYSTEM, found {other:?}")));
            }
        };

        Ok(DoctypeDeclaration {
            name: (*name).to_string(),
            public_id,
            system_id,
        })
    }
}

fn malformed(reason: impl Into<String>) -> Error {
    Error::MalformedDoctype { reason: reason.into() }
}

/// Split the declaration into quoted strings and bare words.
///
/// Stops at the internal subset or once enough tokens are collected, so
/// trailing subset text is never glued onto an identifier.
fn tokenize(raw: &str) -> Result<Vec<&str>> {
    let bytes = raw.as_bytes();
    let mut tokens = Vec::with_capacity(MAX_TOKENS);
    let mut pos = 0;

    while pos < bytes.len() && tokens.len() < MAX_TOKENS {
        match bytes[pos] {
            b' ' | b'\t' | b'\n' | b'\r' | b'<' | b'>' => pos += 1,
            b'[' => break,
            quote @ (b'"' | b'\'') => {
                let Some(len) = memchr(quote, &bytes[pos + 1..]) else {
                    return Err(malformed("unterminated quoted identifier"));
                };
                let end = pos + 1 + len + 1;
                tokens.push(&raw[pos..end]);
                pos = end;
            }
            _ => {
                let start = pos;
                while pos < bytes.len()
                    && !matches!(bytes[pos], b' ' | b'\t' | b'\n' | b'\r' | b'<' | b'>' | b'[' | b'"' | b'\'')
                {
                    pos += 1;
                }
                tokens.push(&raw[start..pos]);
            }
        }
    }

    Ok(tokens)
}

/// Strip one pair of matching surrounding quotes
fn unquote(token: &str) -> &str {
    let bytes = token.as_bytes();
    if bytes.len() >= 2 && matches!(bytes[0], b'"' | b'\'') && bytes[bytes.len() - 1] == bytes[0] {
        &token[1..token.len() - 1]
    } else {
        token
    }
}
