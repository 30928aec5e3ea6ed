//! Source positions
//!
//! Value types describing where a node came from in the source text:
//! - `Position`: a cursor (byte offset plus 1-based line and column)
//! - `PositionRange`: the span of a node's markup
//! - `AttributePosition`: end offset of an attribute's value

use std::fmt;

/// A cursor into the source text.
///
/// `offset` is a UTF-8 byte offset, `line` and `column` are 1-based and
/// the column counts characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Byte offset into the source
    pub offset: usize,
    /// Line number (1-based)
    pub line: usize,
    /// Column number in characters (1-based)
    pub column: usize,
}

impl Position {
    /// Create a new position
    #[inline]
    pub const fn new(offset: usize, line: usize, column: usize) -> Self {
        Position { offset, line, column }
    }

    /// The position before the first character of the input
    #[inline]
    pub const fn start() -> Self {
        Position { offset: 0, line: 1, column: 1 }
    }

    /// Shift the position by `delta` characters on the same line.
    ///
    /// Only valid for single-byte characters, which is all the
    /// tracker ever corrects for (`<` and `>`).
    #[inline]
    pub(crate) fn shifted(self, delta: isize) -> Self {
        Position {
            offset: self.offset.saturating_add_signed(delta),
            line: self.line,
            column: self.column.saturating_add_signed(delta),
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Source span of a node.
///
/// `line` and `column` are those of `start`; `end` is exclusive, so
/// `&source[start..end]` is the node's own markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionRange {
    pub line: usize,
    pub column: usize,
    pub start: usize,
    pub end: usize,
}

impl PositionRange {
    /// Build the range running from `from` to `to`
    #[inline]
    pub const fn between(from: Position, to: Position) -> Self {
        PositionRange {
            line: from.line,
            column: from.column,
            start: from.offset,
            end: to.offset,
        }
    }

    /// Length in bytes
    #[inline]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// True for zero-width ranges (close position of a self-closing element)
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Extract the covered text from the source
    #[inline]
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start..self.end)
    }
}

/// End offset of an attribute, just past its closing quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributePosition {
    pub end: usize,
}
