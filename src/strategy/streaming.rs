//! Streaming Document Parser
//!
//! Builds a document from input that arrives in chunks. Bytes are decoded
//! incrementally, handed to the tokenizer, and every lexeme produced so far
//! is applied to the tree before the next chunk is accepted, so the first
//! error surfaces as soon as the offending chunk is fed.

use crate::core::encoding::StreamDecoder;
use crate::core::tokenizer::Tokenizer;
use crate::dom::{DocumentBuilder, XmlDocument};
use crate::error::Result;
use crate::options::ParseOptions;
use std::io::Read;
use tracing::debug;

/// Read buffer size for `parse_reader` and `parse_async`
const READ_BUFFER_SIZE: usize = 8 * 1024;

/// Incremental bytes-to-tree parser
pub struct StreamingParser {
    decoder: StreamDecoder,
    tokenizer: Tokenizer,
    builder: DocumentBuilder,
    /// Total bytes fed
    consumed: usize,
}

impl StreamingParser {
    /// Create a new streaming parser
    pub fn new(options: &ParseOptions) -> Self {
        StreamingParser {
            decoder: StreamDecoder::new(),
            tokenizer: options.tokenizer(),
            builder: DocumentBuilder::new(options),
            consumed: 0,
        }
    }

    /// Feed a chunk of data to the parser
    pub fn feed(&mut self, chunk: &[u8]) -> Result<()> {
        self.consumed += chunk.len();
        let text = self.decoder.decode(chunk)?;
        if !text.is_empty() {
            self.tokenizer.write(&text);
        }
        self.drain()
    }

    /// Total bytes fed so far
    #[inline]
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// The tree built from the input fed so far
    #[inline]
    pub fn document(&self) -> &XmlDocument {
        self.builder.document()
    }

    /// Signal end of input and return the finished tree
    pub fn finish(mut self) -> Result<XmlDocument> {
        let text = self.decoder.finish()?;
        if !text.is_empty() {
            self.tokenizer.write(&text);
        }
        self.tokenizer.close();
        self.drain()?;

        let document = self.builder.finish()?;
        debug!(bytes = self.consumed, nodes = document.node_count(), "streaming parse finished");
        Ok(document)
    }

    /// Apply every queued lexeme to the tree
    fn drain(&mut self) -> Result<()> {
        while let Some(lexeme) = self.tokenizer.next_event() {
            self.builder.handle(lexeme?)?;
        }
        Ok(())
    }
}

/// Parse everything a blocking reader produces
pub fn parse_reader<R: Read>(mut reader: R, options: &ParseOptions) -> Result<XmlDocument> {
    let mut parser = StreamingParser::new(options);
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        parser.feed(&buffer[..read])?;
    }
    parser.finish()
}

/// Parse everything an asynchronous reader produces.
///
/// Suspends only while waiting on the reader; lexemes are applied as soon
/// as each chunk arrives.
#[cfg(feature = "async")]
pub async fn parse_async<R>(mut reader: R, options: &ParseOptions) -> Result<XmlDocument>
where
    R: tokio::io::AsyncRead + Unpin,
{
    use tokio::io::AsyncReadExt;

    let mut parser = StreamingParser::new(options);
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    loop {
        let read = reader.read(&mut buffer).await?;
        if read == 0 {
            break;
        }
        parser.feed(&buffer[..read])?;
    }
    parser.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_streaming_simple() {
        let mut parser = StreamingParser::new(&ParseOptions::default());
        parser.feed(b"<root><item>text</item></root>").unwrap();
        let doc = parser.finish().unwrap();

        let root = doc.document_element().unwrap();
        assert_eq!(doc.node_name(root), Some("root"));
        assert_eq!(doc.text_content(root), "text");
    }

    #[test]
    fn test_streaming_chunks() {
        let input = "<root><item id=\"1\">caf\u{e9}</item><item id=\"2\"/></root>".as_bytes();
        let mut parser = StreamingParser::new(&ParseOptions::default());
        for chunk in input.chunks(3) {
            parser.feed(chunk).unwrap();
        }
        assert_eq!(parser.consumed(), input.len());
        let doc = parser.finish().unwrap();

        let root = doc.document_element().unwrap();
        assert_eq!(doc.child_element_count(root), 2);
        assert_eq!(doc.text_content(root), "caf\u{e9}");
    }

    #[test]
    fn test_partial_tree_visible() {
        let mut parser = StreamingParser::new(&ParseOptions::default());
        parser.feed(b"<root><a/>").unwrap();
        let root = parser.document().document_element().unwrap();
        assert_eq!(parser.document().child_element_count(root), 1);
    }

    #[test]
    fn test_error_on_feed() {
        let mut parser = StreamingParser::new(&ParseOptions::default());
        let err = parser.feed(b"<root>&nope;</root>").unwrap_err();
        assert!(matches!(err, Error::UndefinedEntity { ref name, .. } if name == "nope"));
    }

    #[test]
    fn test_parse_reader_utf16() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "<a>\u{20ac}</a>".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let doc = parse_reader(bytes.as_slice(), &ParseOptions::default()).unwrap();
        let a = doc.document_element().unwrap();
        assert_eq!(doc.text_content(a), "\u{20ac}");
    }

    #[test]
    fn test_unclosed_at_finish() {
        let mut parser = StreamingParser::new(&ParseOptions::default());
        parser.feed(b"<root><a>").unwrap();
        assert!(matches!(parser.finish(), Err(Error::Syntax { .. })));
    }
}
