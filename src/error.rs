//! Parse errors
//!
//! Every failure aborts the parse; no partial tree is ever returned.

use crate::core::span::Position;

/// Errors produced while turning XML into a document tree
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A prefix on an element or attribute has no binding in scope
    #[error("unbound namespace prefix: \"{prefix}\"")]
    UnboundNamespacePrefix { prefix: String },

    /// A named reference that is neither predefined nor supplied by the caller
    #[error("undefined entity: \"{name}\" at {position}")]
    UndefinedEntity { name: String, position: Position },

    /// Non-whitespace character data outside the document element
    #[error("text data outside of root node at {position}")]
    TextOutsideRoot { position: Position },

    /// A doctype declaration without a usable name or identifiers
    #[error("malformed doctype declaration: {reason}")]
    MalformedDoctype { reason: String },

    /// A close event arrived while no element was open
    #[error("close tag without an open element")]
    StructuralUnderflow,

    /// The markup is not well-formed
    #[error("{message} at {position}")]
    Syntax { message: String, position: Position },

    /// The input bytes could not be decoded
    #[error("invalid encoding: {0}")]
    Encoding(String),

    /// Reading the input failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    #[inline]
    pub(crate) fn syntax(message: impl Into<String>, position: Position) -> Self {
        Error::Syntax { message: message.into(), position }
    }

    /// Source position the error was detected at, when known
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::UndefinedEntity { position, .. }
            | Error::TextOutsideRoot { position }
            | Error::Syntax { position, .. } => Some(*position),
            _ => None,
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = Error::UnboundNamespacePrefix { prefix: "un".to_string() };
        assert_eq!(err.to_string(), "unbound namespace prefix: \"un\"");

        let err = Error::TextOutsideRoot { position: Position::new(4, 1, 5) };
        assert_eq!(err.to_string(), "text data outside of root node at line 1, column 5");
    }

    #[test]
    fn test_position() {
        let err = Error::syntax("unexpected end of input", Position::new(3, 2, 1));
        assert_eq!(err.position(), Some(Position::new(3, 2, 1)));
        assert_eq!(Error::StructuralUnderflow.position(), None);
    }
}
