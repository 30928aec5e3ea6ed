//! Slice Reader
//!
//! Pull-style event reader over a complete in-memory document. The input
//! is handed to the tokenizer in bounded slices as events are consumed,
//! so the event queue never holds more than one slice worth of events.

use crate::core::tokenizer::Tokenizer;
use crate::error::Result;
use super::events::Lexeme;

/// Bytes handed to the tokenizer per refill
const SLICE_SIZE: usize = 64 * 1024;

/// XML event reader from a string slice
pub struct SliceReader<'a> {
    input: &'a str,
    fed: usize,
    tokenizer: Tokenizer,
}

impl<'a> SliceReader<'a> {
    /// Create a reader with the default tokenizer configuration
    pub fn new(input: &'a str) -> Self {
        Self::with_tokenizer(input, Tokenizer::default())
    }

    /// Create a reader around a configured tokenizer
    pub fn with_tokenizer(input: &'a str, tokenizer: Tokenizer) -> Self {
        SliceReader { input, fed: 0, tokenizer }
    }

    /// Get the next lexeme, or `None` once the input is exhausted
    pub fn next_event(&mut self) -> Option<Result<Lexeme>> {
        loop {
            if let Some(item) = self.tokenizer.next_event() {
                return Some(item);
            }
            if self.tokenizer.is_closed() {
                return None;
            }
            self.refill();
        }
    }

    fn refill(&mut self) {
        if self.fed >= self.input.len() {
            self.tokenizer.close();
            return;
        }
        let mut end = (self.fed + SLICE_SIZE).min(self.input.len());
        while !self.input.is_char_boundary(end) {
            end += 1;
        }
        self.tokenizer.write(&self.input[self.fed..end]);
        self.fed = end;
    }
}

impl<'a> Iterator for SliceReader<'a> {
    type Item = Result<Lexeme>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event()
    }
}
