//! XML Encoding Detection and Conversion
//!
//! Handles detection of UTF-16 and UTF-8 input based on BOM and byte patterns.
//! Whole documents are converted in one step; streamed input goes through
//! `StreamDecoder`, which carries incomplete sequences across chunk boundaries.

use crate::error::{Error, Result};
use std::borrow::Cow;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Detect the encoding of XML input based on BOM or byte patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl XmlEncoding {
    /// Detect encoding from byte order mark or initial bytes
    pub fn detect(input: &[u8]) -> Self {
        if input.len() < 2 {
            return XmlEncoding::Utf8;
        }

        match (input[0], input[1]) {
            // UTF-16 LE BOM: 0xFF 0xFE
            (0xFF, 0xFE) => XmlEncoding::Utf16Le,
            // UTF-16 BE BOM: 0xFE 0xFF
            (0xFE, 0xFF) => XmlEncoding::Utf16Be,
            // No BOM - check for UTF-16 pattern (< followed by null or null followed by <)
            (0x00, b'<') => XmlEncoding::Utf16Be,
            (b'<', 0x00) => XmlEncoding::Utf16Le,
            _ => XmlEncoding::Utf8,
        }
    }

    /// Length of the byte order mark at the start of `input`, if any
    fn bom_len(self, input: &[u8]) -> usize {
        match self {
            XmlEncoding::Utf8 if input.starts_with(&UTF8_BOM) => 3,
            XmlEncoding::Utf16Le if input.starts_with(&[0xFF, 0xFE]) => 2,
            XmlEncoding::Utf16Be if input.starts_with(&[0xFE, 0xFF]) => 2,
            _ => 0,
        }
    }

    #[inline]
    fn unit(self, pair: [u8; 2]) -> u16 {
        match self {
            XmlEncoding::Utf16Be => u16::from_be_bytes(pair),
            _ => u16::from_le_bytes(pair),
        }
    }
}

/// Decode a complete document to UTF-8 text.
///
/// Borrows the input when it is already BOM-less UTF-8.
pub fn decode_document(input: &[u8]) -> Result<Cow<'_, str>> {
    let encoding = XmlEncoding::detect(input);
    let body = &input[encoding.bom_len(input)..];

    match encoding {
        XmlEncoding::Utf8 => std::str::from_utf8(body).map(Cow::Borrowed).map_err(|e| {
            Error::Encoding(format!("invalid UTF-8 after byte {}", e.valid_up_to()))
        }),
        XmlEncoding::Utf16Le | XmlEncoding::Utf16Be => {
            if body.len() % 2 != 0 {
                return Err(Error::Encoding(format!("{encoding:?}: odd number of bytes")));
            }
            let units: Vec<u16> = body
                .chunks_exact(2)
                .map(|pair| encoding.unit([pair[0], pair[1]]))
                .collect();
            String::from_utf16(&units)
                .map(Cow::Owned)
                .map_err(|e| Error::Encoding(format!("{encoding:?}: {e}")))
        }
    }
}

/// Incremental decoder for chunked input.
///
/// The encoding is detected from the first bytes seen. Bytes that end a
/// chunk in the middle of a character are held back until the next chunk.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    encoding: Option<XmlEncoding>,
    pending: Vec<u8>,
}

impl StreamDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Detected encoding, once enough input has been seen
    pub fn encoding(&self) -> Option<XmlEncoding> {
        self.encoding
    }

    /// Decode the next chunk, returning all complete characters
    pub fn decode(&mut self, chunk: &[u8]) -> Result<String> {
        self.pending.extend_from_slice(chunk);

        let encoding = match self.encoding {
            Some(encoding) => encoding,
            // Wait for enough bytes to recognize a BOM
            None if self.pending.len() < UTF8_BOM.len() => return Ok(String::new()),
            None => {
                let encoding = XmlEncoding::detect(&self.pending);
                let bom = encoding.bom_len(&self.pending);
                self.pending.drain(..bom);
                self.encoding = Some(encoding);
                encoding
            }
        };

        match encoding {
            XmlEncoding::Utf8 => self.decode_utf8(),
            XmlEncoding::Utf16Le | XmlEncoding::Utf16Be => self.decode_utf16(encoding),
        }
    }

    /// Flush the decoder at end of input
    pub fn finish(&mut self) -> Result<String> {
        if self.encoding.is_none() {
            // Input shorter than a BOM
            let encoding = XmlEncoding::detect(&self.pending);
            let bom = encoding.bom_len(&self.pending);
            self.pending.drain(..bom);
            self.encoding = Some(encoding);
        }
        let text = self.decode(&[])?;
        if !self.pending.is_empty() {
            return Err(Error::Encoding("input ends inside a character".to_string()));
        }
        Ok(text)
    }

    fn decode_utf8(&mut self) -> Result<String> {
        let valid = match std::str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            // error_len() == None means the input merely stops mid-sequence
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => {
                return Err(Error::Encoding(format!("invalid UTF-8 sequence after byte {}", e.valid_up_to())));
            }
        };
        let rest = self.pending.split_off(valid);
        let bytes = std::mem::replace(&mut self.pending, rest);
        String::from_utf8(bytes).map_err(|e| Error::Encoding(e.to_string()))
    }

    fn decode_utf16(&mut self, encoding: XmlEncoding) -> Result<String> {
        let mut units: Vec<u16> = self
            .pending
            .chunks_exact(2)
            .map(|pair| encoding.unit([pair[0], pair[1]]))
            .collect();

        // Hold back a trailing high surrogate until its partner arrives
        if matches!(units.last(), Some(0xD800..=0xDBFF)) {
            units.pop();
        }

        let consumed = units.len() * 2;
        self.pending.drain(..consumed);
        String::from_utf16(&units).map_err(|e| Error::Encoding(format!("{encoding:?}: {e}")))
    }
}
