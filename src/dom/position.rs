//! Position Tracking
//!
//! Converts the cursor snapshots carried by lexemes into node spans. Each
//! node's span starts where the previous tracked node ended, so every byte
//! of markup is attributed to exactly one node (inter-node whitespace to
//! the following text node, or skipped when no node is created).
//!
//! Event cursors are not uniform across kinds:
//! - text is dispatched one character past its end (after the `<` that ends it)
//! - comments are dispatched one character short (before the final `>`)
//! - everything else is dispatched exactly at its end

use super::node::NodeKind;
use crate::core::span::{AttributePosition, Position, PositionRange};

/// Tracks the end of the last attributed span
#[derive(Debug, Clone, Default)]
pub struct PositionTracker {
    last: Position,
}

impl PositionTracker {
    /// Create a tracker at the start of input
    pub fn new() -> Self {
        Self::default()
    }

    /// End of the last attributed span
    #[inline]
    pub fn last_position(&self) -> Position {
        self.last
    }

    /// Span of a node whose event was dispatched at `cursor`
    pub fn track_node(&mut self, kind: NodeKind, cursor: Position) -> PositionRange {
        let end = node_end(kind, cursor);
        let range = PositionRange::between(self.last, end);
        self.last = end;
        range
    }

    /// Span of an end tag dispatched at `cursor`
    pub fn track_close(&mut self, cursor: Position) -> PositionRange {
        let range = PositionRange::between(self.last, cursor);
        self.last = cursor;
        range
    }

    /// Move past input that produced no node, taking the raw cursor
    #[inline]
    pub fn advance_only(&mut self, cursor: Position) {
        self.last = cursor;
    }

    /// Move past an event of `kind` that produced no node
    #[inline]
    pub fn skip(&mut self, kind: NodeKind, cursor: Position) {
        self.last = node_end(kind, cursor);
    }

    /// Position of an attribute whose event was dispatched at `cursor`
    #[inline]
    pub fn attribute_position(cursor: Position) -> AttributePosition {
        AttributePosition { end: cursor.offset }
    }
}

/// Correct an event cursor to the end of the node's markup
#[inline]
fn node_end(kind: NodeKind, cursor: Position) -> Position {
    match kind {
        NodeKind::Text => cursor.shifted(-1),
        NodeKind::Comment => cursor.shifted(1),
        _ => cursor,
    }
}
