//! XML Entity Resolution
//!
//! Resolves the body of a reference (the text between `&` and `;`):
//! - Built-in entities: &lt; &gt; &amp; &quot; &apos;
//! - Numeric character references: &#123; &#x7B;
//! - Caller-supplied entities registered before parsing
//!
//! Entities declared in a document's internal subset are never consulted.

use std::borrow::Cow;
use std::collections::HashMap;

/// The five entities every XML processor must recognize
pub const PREDEFINED_ENTITIES: [(&str, &str); 5] = [
    ("lt", "<"),
    ("gt", ">"),
    ("amp", "&"),
    ("quot", "\""),
    ("apos", "'"),
];

/// Why a reference could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceError {
    /// Named reference with no definition
    Undefined,
    /// Character reference to a code point outside the XML Char production
    InvalidCharacter,
    /// Empty reference or unparsable number
    Malformed,
}

/// Entity lookup table used by the tokenizer
#[derive(Debug, Clone, Default)]
pub struct EntityTable {
    custom: HashMap<String, String>,
}

impl EntityTable {
    /// Create a table holding only the predefined entities
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with additional named entities
    pub fn with_entities<I, K, V>(entities: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::new();
        for (name, value) in entities {
            table.insert(name, value);
        }
        table
    }

    /// Register a named entity; its value is inserted literally when referenced
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.custom.insert(name.into(), value.into());
    }

    /// Number of caller-supplied entities
    pub fn custom_len(&self) -> usize {
        self.custom.len()
    }

    /// Resolve a reference body (without `&` and `;`)
    pub fn resolve(&self, reference: &str) -> Result<Cow<'_, str>, ReferenceError> {
        if reference.is_empty() {
            return Err(ReferenceError::Malformed);
        }

        if let Some(numeric) = reference.strip_prefix('#') {
            return decode_character_reference(numeric).map(|c| Cow::Owned(c.to_string()));
        }

        if let Some((_, value)) = PREDEFINED_ENTITIES.iter().find(|(name, _)| *name == reference) {
            return Ok(Cow::Borrowed(value));
        }

        self.custom
            .get(reference)
            .map(|value| Cow::Borrowed(value.as_str()))
            .ok_or(ReferenceError::Undefined)
    }
}

/// Decode a numeric character reference body (after `#`)
fn decode_character_reference(body: &str) -> Result<char, ReferenceError> {
    let codepoint = match body.strip_prefix('x') {
        // Hexadecimal: &#xHHHH;
        Some(hex) if !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
            u32::from_str_radix(hex, 16).map_err(|_| ReferenceError::InvalidCharacter)?
        }
        // Decimal: &#DDDD;
        None if !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit()) => {
            body.parse::<u32>().map_err(|_| ReferenceError::InvalidCharacter)?
        }
        _ => return Err(ReferenceError::Malformed),
    };

    if !is_valid_xml_char(codepoint) {
        return Err(ReferenceError::InvalidCharacter);
    }
    char::from_u32(codepoint).ok_or(ReferenceError::InvalidCharacter)
}

/// Check if a code point is a valid XML 1.0 Char
/// Char ::= #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
#[inline]
pub fn is_valid_xml_char(codepoint: u32) -> bool {
    matches!(codepoint,
        0x9 | 0xA | 0xD |
        0x20..=0xD7FF |
        0xE000..=0xFFFD |
        0x10000..=0x10FFFF
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predefined() {
        let table = EntityTable::new();
        assert_eq!(table.resolve("lt").unwrap(), "<");
        assert_eq!(table.resolve("gt").unwrap(), ">");
        assert_eq!(table.resolve("amp").unwrap(), "&");
        assert_eq!(table.resolve("quot").unwrap(), "\"");
        assert_eq!(table.resolve("apos").unwrap(), "'");
    }

    #[test]
    fn test_character_references() {
        let table = EntityTable::new();
        assert_eq!(table.resolve("#65").unwrap(), "A");
        assert_eq!(table.resolve("#x41").unwrap(), "A");
        assert_eq!(table.resolve("#8232").unwrap(), "\u{2028}");
        assert_eq!(table.resolve("#x1F600").unwrap(), "\u{1F600}");
    }

    #[test]
    fn test_invalid_character_references() {
        let table = EntityTable::new();
        assert_eq!(table.resolve("#0"), Err(ReferenceError::InvalidCharacter));
        assert_eq!(table.resolve("#xD800"), Err(ReferenceError::InvalidCharacter));
        assert_eq!(table.resolve("#x"), Err(ReferenceError::Malformed));
        assert_eq!(table.resolve("#12a"), Err(ReferenceError::Malformed));
        assert_eq!(table.resolve(""), Err(ReferenceError::Malformed));
    }

    #[test]
    fn test_html_entities_are_undefined() {
        let table = EntityTable::new();
        assert_eq!(table.resolve("nbsp"), Err(ReferenceError::Undefined));
    }

    #[test]
    fn test_custom_entities() {
        let table = EntityTable::with_entities([("test1", "test completed")]);
        assert_eq!(table.custom_len(), 1);
        assert_eq!(table.resolve("test1").unwrap(), "test completed");
        assert_eq!(table.resolve("test2"), Err(ReferenceError::Undefined));
    }

    #[test]
    fn test_custom_cannot_shadow_predefined() {
        let table = EntityTable::with_entities([("lt", "less")]);
        assert_eq!(table.resolve("lt").unwrap(), "<");
    }
}
