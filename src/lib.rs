//! RustyDOM - Event-driven XML document builder
//!
//! Turns XML text into a namespace-aware arena tree, optionally annotated
//! with the source span of every node.
//!
//! Entry points:
//! - `parse` / `parse_with_options`: whole document held in memory
//! - `parse_bytes`: raw bytes, BOM and UTF-16 aware
//! - `parse_reader`: blocking `std::io::Read` source, read in chunks
//! - `parse_async`: `tokio::io::AsyncRead` source (feature `async`)
//! - `StreamingParser`: push chunks by hand
//!
//! ```
//! let doc = rustydom::parse("<root xmlns=\"urn:x\"><item>hi</item></root>").unwrap();
//! let root = doc.document_element().unwrap();
//! assert_eq!(doc.namespace_uri(root), Some("urn:x"));
//! assert_eq!(doc.text_content(root), "hi");
//! ```

pub mod core;
pub mod dom;
pub mod error;
pub mod options;
pub mod reader;
pub mod strategy;

pub use crate::core::dtd::DoctypeDeclaration;
pub use crate::core::span::{AttributePosition, Position, PositionRange};
pub use dom::{DocumentBuilder, NamespaceContext, NodeId, NodeKind, PositionTracker, XmlAttribute, XmlDocument};
pub use error::{Error, Result};
pub use options::{ParseOptions, TagFilter};
pub use reader::{Lexeme, SliceReader, StartElement, XmlEvent};
#[cfg(feature = "async")]
pub use strategy::parse_async;
pub use strategy::{parse_reader, StreamingParser};

use tracing::debug;

// ============================================================================
// Synchronous entry points
// ============================================================================

/// Parse a complete document with default options
pub fn parse(xml: &str) -> Result<XmlDocument> {
    parse_with_options(xml, &ParseOptions::default())
}

/// Parse a complete document
pub fn parse_with_options(xml: &str, options: &ParseOptions) -> Result<XmlDocument> {
    debug!(len = xml.len(), fragment = options.fragment, "parse started");

    let mut builder = DocumentBuilder::new(options);
    for lexeme in SliceReader::with_tokenizer(xml, options.tokenizer()) {
        builder.handle(lexeme?)?;
    }
    let document = builder.finish()?;

    debug!(nodes = document.node_count(), "parse finished");
    Ok(document)
}

/// Parse a complete document given as bytes (UTF-8, or UTF-16 with a BOM)
pub fn parse_bytes(bytes: &[u8], options: &ParseOptions) -> Result<XmlDocument> {
    let xml = crate::core::encoding::decode_document(bytes)?;
    parse_with_options(&xml, options)
}
