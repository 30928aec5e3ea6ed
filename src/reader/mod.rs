//! XML event layer
//!
//! - `events`: typed lexical events and the `Lexeme` wrapper
//! - `slice`: pull reader over an in-memory document

pub mod events;
pub mod slice;

pub use events::{Lexeme, StartElement, XmlEvent};
pub use slice::SliceReader;
