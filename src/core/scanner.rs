//! SIMD-accelerated XML scanning using memchr
//!
//! Uses memchr crate for fast byte searching with SIMD acceleration:
//! - SSE2 (default x86_64)
//! - AVX2 (runtime detection)
//! - NEON (aarch64)
//!
//! `Scanner` walks one chunk of input; `Cursor` carries the line/column
//! bookkeeping across chunks.

use super::span::Position;
use memchr::{memchr2, memchr3, memchr_iter};

/// Scanner over a single chunk of text
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given chunk
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Scanner { input, pos: 0 }
    }

    /// Get the current byte position within the chunk
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Check if we've reached the end
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Get the unread part of the chunk
    #[inline]
    pub fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Consume the next character
    #[inline]
    pub fn next_char(&mut self) -> Option<char> {
        let c = self.remaining().chars().next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Find the next byte that interrupts character data: '<', '&' or '\r'
    #[inline]
    pub fn find_text_break(&self) -> Option<usize> {
        memchr3(b'<', b'&', b'\r', self.remaining().as_bytes()).map(|i| self.pos + i)
    }

    /// Find next occurrence of either of two bytes
    #[inline]
    pub fn find_byte2(&self, b1: u8, b2: u8) -> Option<usize> {
        memchr2(b1, b2, self.remaining().as_bytes()).map(|i| self.pos + i)
    }

    /// Consume everything up to `end` (exclusive) and return it.
    ///
    /// `end` must come from one of the `find_*` methods, which only stop
    /// on ASCII bytes and therefore on character boundaries.
    #[inline]
    pub fn take_until(&mut self, end: usize) -> &'a str {
        let run = &self.input[self.pos..end];
        self.pos = end;
        run
    }

    /// Consume the rest of the chunk
    #[inline]
    pub fn take_rest(&mut self) -> &'a str {
        self.take_until(self.input.len())
    }
}

/// Running source position across chunks
#[derive(Debug, Clone, Copy, Default)]
pub struct Cursor {
    position: Position,
    after_cr: bool,
}

impl Cursor {
    /// Create a cursor at the start of input
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position
    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Whether the last consumed character was a carriage return
    #[inline]
    pub fn after_cr(&self) -> bool {
        self.after_cr
    }

    /// Move past one character; `\r\n` and lone `\r` each end one line
    #[inline]
    pub fn advance(&mut self, c: char) {
        self.position.offset += c.len_utf8();
        match c {
            '\n' if self.after_cr => self.position.column = 1,
            '\n' | '\r' => {
                self.position.line += 1;
                self.position.column = 1;
            }
            _ => self.position.column += 1,
        }
        self.after_cr = c == '\r';
    }

    /// Move past a run that contains no carriage return
    pub fn advance_run(&mut self, run: &str) {
        if run.is_empty() {
            return;
        }
        let bytes = run.as_bytes();
        self.position.offset += bytes.len();

        let mut newlines = memchr_iter(b'\n', bytes);
        match newlines.next_back() {
            Some(last) => {
                let mut count = newlines.count() + 1;
                // A '\n' completing a '\r\n' pair has already been counted
                if self.after_cr && bytes[0] == b'\n' {
                    count -= 1;
                }
                self.position.line += count;
                self.position.column = run[last + 1..].chars().count() + 1;
            }
            None => self.position.column += run.chars().count(),
        }
        self.after_cr = false;
    }

    /// Position one column past the current one, standing in for a
    /// terminator at end of input
    #[inline]
    pub fn virtual_terminator(&self) -> Position {
        self.position.shifted(1)
    }
}

/// Check if char is a valid XML name start character
/// Allows ASCII letters, underscore, colon, and non-ASCII Unicode
#[inline]
pub fn is_name_start_char(c: char) -> bool {
    matches!(c, 'A'..='Z' | 'a'..='z' | '_' | ':') || c as u32 >= 0x80
}

/// Check if char is valid XML name character
/// Allows ASCII alphanumeric, punctuation, and non-ASCII Unicode
#[inline]
pub fn is_name_char(c: char) -> bool {
    matches!(c, 'A'..='Z' | 'a'..='z' | '0'..='9' | '_' | '-' | '.' | ':') || c as u32 >= 0x80
}

/// XML whitespace (space, tab, newline, carriage return)
#[inline]
pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// True when `text` is empty or only XML whitespace
#[inline]
pub fn is_blank(text: &str) -> bool {
    text.chars().all(is_whitespace)
}
