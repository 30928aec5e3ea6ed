//! Push-based XML Tokenizer
//!
//! Character state machine fed with arbitrary chunks of text:
//! - `write(chunk)` may be called any number of times, chunks can split
//!   anywhere (inside names, references, `\r\n` pairs, ...)
//! - `close()` flushes trailing character data and checks the document ends cleanly
//! - `next_event()` pulls queued lexemes in document order
//!
//! Errors are queued in order after the events that preceded them; once an
//! error is queued all further input is ignored.
//!
//! Cursor snapshots follow fixed rules per event kind: text is dispatched
//! after its terminating `<`, comments after the closing `--` but before
//! `>`, every other markup event after its final `>`, attributes after the
//! closing quote.

use super::attributes::{push_value_char, Attribute};
use super::entities::{EntityTable, ReferenceError};
use super::scanner::{is_name_char, is_name_start_char, is_whitespace, Cursor, Scanner};
use super::span::Position;
use crate::error::{Error, Result};
use crate::reader::events::{Lexeme, StartElement, XmlEvent};
use std::collections::VecDeque;

/// Markup declarations recognized after `<!`
const BANG_KEYWORDS: [&str; 3] = ["--", "[CDATA[", "DOCTYPE"];

/// Tokenizer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Between markup, collecting character data
    Text,
    /// Inside `&...;` in character data
    TextReference,
    /// Just read `<`
    MarkupStart,
    /// After `<!`, matching a declaration keyword
    Bang,
    Comment,
    /// One `-` seen inside a comment
    CommentDash,
    /// `--` seen, only `>` may follow
    CommentEnd,
    CData { brackets: u8 },
    Doctype { quote: Option<char>, subset: bool },
    PiTarget,
    PiBodyStart,
    PiBody,
    PiQuestion,
    OpenTagName,
    InTag,
    AttributeName,
    AfterAttributeName,
    BeforeAttributeValue,
    AttributeValue { quote: char },
    AttributeReference { quote: char },
    AfterAttributeValue,
    SelfClosing,
    CloseTagName,
    AfterCloseTagName,
    /// An error was queued
    Failed,
}

/// Incremental XML tokenizer
#[derive(Debug)]
pub struct Tokenizer {
    state: State,
    cursor: Cursor,
    entities: EntityTable,
    fragment: bool,
    /// Character data, comment, CDATA, PI body or doctype text being collected
    buffer: String,
    /// Element name or PI target being collected
    name: String,
    attribute_name: String,
    attribute_value: String,
    /// Body of the reference being read
    reference: String,
    attributes: Vec<Attribute>,
    open_elements: Vec<String>,
    seen_root: bool,
    closed: bool,
    events: VecDeque<Result<Lexeme>>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(EntityTable::new(), false)
    }
}

impl Tokenizer {
    /// Create a tokenizer.
    ///
    /// In fragment mode several top-level elements are allowed and a
    /// document without any element is not an error.
    pub fn new(entities: EntityTable, fragment: bool) -> Self {
        Tokenizer {
            state: State::Text,
            cursor: Cursor::new(),
            entities,
            fragment,
            buffer: String::new(),
            name: String::new(),
            attribute_name: String::new(),
            attribute_value: String::new(),
            reference: String::new(),
            attributes: Vec::new(),
            open_elements: Vec::with_capacity(32),
            seen_root: false,
            closed: false,
            events: VecDeque::with_capacity(64),
        }
    }

    /// Current cursor position
    #[inline]
    pub fn position(&self) -> Position {
        self.cursor.position()
    }

    /// Whether `close()` has been called
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether an error has been queued
    #[inline]
    pub fn has_failed(&self) -> bool {
        self.state == State::Failed
    }

    /// Pull the next queued event
    #[inline]
    pub fn next_event(&mut self) -> Option<Result<Lexeme>> {
        self.events.pop_front()
    }

    /// Feed a chunk of input
    pub fn write(&mut self, chunk: &str) {
        if self.state == State::Failed {
            return;
        }
        if self.closed {
            self.fail(Error::syntax("input written after close", self.position()));
            return;
        }

        let mut scanner = Scanner::new(chunk);
        while !scanner.is_eof() {
            if self.take_run(&mut scanner) {
                continue;
            }
            let Some(c) = scanner.next_char() else {
                break;
            };
            let after_cr = self.cursor.after_cr();
            self.cursor.advance(c);
            if let Err(err) = self.step(c, after_cr) {
                self.fail(err);
                return;
            }
        }
    }

    /// Signal end of input
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if self.state == State::Failed {
            return;
        }
        if let Err(err) = self.finish_input() {
            self.fail(err);
        }
    }

    fn fail(&mut self, err: Error) {
        self.events.push_back(Err(err));
        self.state = State::Failed;
    }

    #[inline]
    fn emit(&mut self, event: XmlEvent, cursor: Position) {
        self.events.push_back(Ok(Lexeme::new(event, cursor)));
    }

    /// Consume a run of plain content in one go; false when the next
    /// character needs the state machine
    fn take_run(&mut self, scanner: &mut Scanner<'_>) -> bool {
        // A pending '\r' decides how a leading '\n' is treated
        if self.cursor.after_cr() {
            return false;
        }
        let end = match self.state {
            State::Text => scanner.find_text_break(),
            State::Comment => scanner.find_byte2(b'-', b'\r'),
            State::CData { brackets: 0 } => scanner.find_byte2(b']', b'\r'),
            _ => return false,
        };
        let run = match end {
            Some(end) => scanner.take_until(end),
            None => scanner.take_rest(),
        };
        if run.is_empty() {
            return false;
        }
        self.buffer.push_str(run);
        self.cursor.advance_run(run);
        true
    }

    fn step(&mut self, c: char, after_cr: bool) -> Result<()> {
        let at = self.cursor.position();

        match self.state {
            State::Text => match c {
                '<' => {
                    self.flush_text(at);
                    self.state = State::MarkupStart;
                }
                '&' => {
                    self.reference.clear();
                    self.state = State::TextReference;
                }
                _ => push_text_char(&mut self.buffer, c, after_cr),
            },

            State::TextReference => {
                if c == ';' {
                    self.resolve_reference(false, at)?;
                    self.state = State::Text;
                } else {
                    self.push_reference_char(c, at)?;
                }
            }

            State::MarkupStart => match c {
                '/' => {
                    self.name.clear();
                    self.state = State::CloseTagName;
                }
                '!' => {
                    self.buffer.clear();
                    self.state = State::Bang;
                }
                '?' => {
                    self.name.clear();
                    self.buffer.clear();
                    self.state = State::PiTarget;
                }
                c if is_name_start_char(c) => {
                    self.name.clear();
                    self.name.push(c);
                    self.state = State::OpenTagName;
                }
                _ => return Err(Error::syntax(format!("unexpected character {c:?} after '<'"), at)),
            },

            State::Bang => {
                self.buffer.push(c);
                match self.buffer.as_str() {
                    "--" => {
                        self.buffer.clear();
                        self.state = State::Comment;
                    }
                    "[CDATA[" => {
                        if self.open_elements.is_empty() && !self.fragment {
                            return Err(Error::syntax("CDATA section outside the root element", at));
                        }
                        self.buffer.clear();
                        self.state = State::CData { brackets: 0 };
                    }
                    "DOCTYPE" => {
                        if self.seen_root {
                            return Err(Error::syntax("doctype declared after the root element", at));
                        }
                        self.buffer.clear();
                        self.state = State::Doctype { quote: None, subset: false };
                    }
                    partial if BANG_KEYWORDS.iter().any(|k| k.starts_with(partial)) => {}
                    _ => return Err(Error::syntax("unrecognized markup declaration", at)),
                }
            }

            State::Comment => match c {
                '-' => self.state = State::CommentDash,
                _ => push_text_char(&mut self.buffer, c, after_cr),
            },

            State::CommentDash => match c {
                '-' => {
                    let data = std::mem::take(&mut self.buffer);
                    self.emit(XmlEvent::Comment(data), at);
                    self.state = State::CommentEnd;
                }
                _ => {
                    self.buffer.push('-');
                    push_text_char(&mut self.buffer, c, after_cr);
                    self.state = State::Comment;
                }
            },

            State::CommentEnd => match c {
                '>' => self.state = State::Text,
                _ => return Err(Error::syntax("'--' is not permitted inside a comment", at)),
            },

            State::CData { brackets } => match c {
                ']' if brackets < 2 => self.state = State::CData { brackets: brackets + 1 },
                // "]]]" keeps the last two brackets pending
                ']' => self.buffer.push(']'),
                '>' if brackets == 2 => {
                    let data = std::mem::take(&mut self.buffer);
                    self.emit(XmlEvent::CData(data), at);
                    self.state = State::Text;
                }
                _ => {
                    for _ in 0..brackets {
                        self.buffer.push(']');
                    }
                    push_text_char(&mut self.buffer, c, after_cr);
                    self.state = State::CData { brackets: 0 };
                }
            },

            State::Doctype { quote, subset } => {
                let next = match (quote, c) {
                    (Some(q), c) if c == q => State::Doctype { quote: None, subset },
                    (Some(_), _) => State::Doctype { quote, subset },
                    (None, '"' | '\'') => State::Doctype { quote: Some(c), subset },
                    (None, '[') => State::Doctype { quote: None, subset: true },
                    (None, ']') => State::Doctype { quote: None, subset: false },
                    (None, '>') if !subset => {
                        let raw = std::mem::take(&mut self.buffer);
                        self.emit(XmlEvent::Doctype(raw), at);
                        self.state = State::Text;
                        return Ok(());
                    }
                    _ => State::Doctype { quote, subset },
                };
                self.buffer.push(c);
                self.state = next;
            }

            State::PiTarget => match c {
                c if is_whitespace(c) || c == '?' => {
                    if self.name.is_empty() {
                        return Err(Error::syntax("processing instruction without a target", at));
                    }
                    self.state = if c == '?' { State::PiQuestion } else { State::PiBodyStart };
                }
                c if is_name_char(c) => self.name.push(c),
                _ => {
                    return Err(Error::syntax(
                        format!("invalid character {c:?} in processing instruction target"),
                        at,
                    ))
                }
            },

            State::PiBodyStart => match c {
                c if is_whitespace(c) => {}
                '?' => self.state = State::PiQuestion,
                _ => {
                    push_text_char(&mut self.buffer, c, after_cr);
                    self.state = State::PiBody;
                }
            },

            State::PiBody => match c {
                '?' => self.state = State::PiQuestion,
                _ => push_text_char(&mut self.buffer, c, after_cr),
            },

            State::PiQuestion => match c {
                '>' => {
                    let target = std::mem::take(&mut self.name);
                    let body = std::mem::take(&mut self.buffer);
                    self.emit(XmlEvent::ProcessingInstruction { target, body }, at);
                    self.state = State::Text;
                }
                '?' => self.buffer.push('?'),
                _ => {
                    self.buffer.push('?');
                    push_text_char(&mut self.buffer, c, after_cr);
                    self.state = State::PiBody;
                }
            },

            State::OpenTagName => match c {
                c if is_name_char(c) => self.name.push(c),
                c if is_whitespace(c) => {
                    self.begin_open_tag(at)?;
                    self.state = State::InTag;
                }
                '>' => {
                    self.begin_open_tag(at)?;
                    self.finish_open_tag(false, at);
                }
                '/' => {
                    self.begin_open_tag(at)?;
                    self.state = State::SelfClosing;
                }
                _ => return Err(Error::syntax(format!("invalid character {c:?} in element name"), at)),
            },

            State::InTag => match c {
                c if is_whitespace(c) => {}
                '>' => self.finish_open_tag(false, at),
                '/' => self.state = State::SelfClosing,
                c if is_name_start_char(c) => {
                    self.attribute_name.clear();
                    self.attribute_name.push(c);
                    self.state = State::AttributeName;
                }
                _ => return Err(Error::syntax(format!("invalid character {c:?} in start tag"), at)),
            },

            State::AttributeName => match c {
                c if is_name_char(c) => self.attribute_name.push(c),
                c if is_whitespace(c) => self.state = State::AfterAttributeName,
                '=' => self.state = State::BeforeAttributeValue,
                _ => return Err(self.attribute_without_value(at)),
            },

            State::AfterAttributeName => match c {
                c if is_whitespace(c) => {}
                '=' => self.state = State::BeforeAttributeValue,
                _ => return Err(self.attribute_without_value(at)),
            },

            State::BeforeAttributeValue => match c {
                c if is_whitespace(c) => {}
                '"' | '\'' => {
                    self.attribute_value.clear();
                    self.state = State::AttributeValue { quote: c };
                }
                _ => return Err(Error::syntax("attribute values must be quoted", at)),
            },

            State::AttributeValue { quote } => match c {
                c if c == quote => {
                    self.finish_attribute(at)?;
                    self.state = State::AfterAttributeValue;
                }
                '&' => {
                    self.reference.clear();
                    self.state = State::AttributeReference { quote };
                }
                '<' => return Err(Error::syntax("'<' is not permitted in attribute values", at)),
                _ => push_value_char(&mut self.attribute_value, c, after_cr),
            },

            State::AttributeReference { quote } => {
                if c == ';' {
                    self.resolve_reference(true, at)?;
                    self.state = State::AttributeValue { quote };
                } else {
                    self.push_reference_char(c, at)?;
                }
            }

            State::AfterAttributeValue => match c {
                c if is_whitespace(c) => self.state = State::InTag,
                '>' => self.finish_open_tag(false, at),
                '/' => self.state = State::SelfClosing,
                _ => return Err(Error::syntax("attributes must be separated by whitespace", at)),
            },

            State::SelfClosing => match c {
                '>' => self.finish_open_tag(true, at),
                _ => return Err(Error::syntax("expected '>' after '/' in start tag", at)),
            },

            State::CloseTagName => match c {
                c if is_name_char(c) => self.name.push(c),
                c if is_whitespace(c) && !self.name.is_empty() => self.state = State::AfterCloseTagName,
                '>' if !self.name.is_empty() => self.finish_close_tag(at)?,
                _ => return Err(Error::syntax(format!("invalid character {c:?} in end tag"), at)),
            },

            State::AfterCloseTagName => match c {
                c if is_whitespace(c) => {}
                '>' => self.finish_close_tag(at)?,
                _ => return Err(Error::syntax(format!("invalid character {c:?} in end tag"), at)),
            },

            State::Failed => {}
        }

        Ok(())
    }

    fn finish_input(&mut self) -> Result<()> {
        let at = self.cursor.position();
        match self.state {
            State::Text => self.flush_text(self.cursor.virtual_terminator()),
            State::TextReference => return Err(Error::syntax("unterminated entity reference", at)),
            _ => return Err(Error::syntax("unexpected end of input", at)),
        }

        if let Some(open) = self.open_elements.last() {
            return Err(Error::syntax(format!("unclosed element <{open}>"), at));
        }
        if !self.seen_root && !self.fragment {
            return Err(Error::syntax("document has no root element", at));
        }
        Ok(())
    }

    fn flush_text(&mut self, cursor: Position) {
        if !self.buffer.is_empty() {
            let text = std::mem::take(&mut self.buffer);
            self.emit(XmlEvent::Text(text), cursor);
        }
    }

    fn push_reference_char(&mut self, c: char, at: Position) -> Result<()> {
        if is_name_char(c) || (c == '#' && self.reference.is_empty()) {
            self.reference.push(c);
            Ok(())
        } else {
            Err(Error::syntax(format!("invalid character {c:?} in entity reference"), at))
        }
    }

    /// Append the replacement text of the reference just read
    fn resolve_reference(&mut self, in_attribute: bool, at: Position) -> Result<()> {
        let target = if in_attribute { &mut self.attribute_value } else { &mut self.buffer };
        let failure = match self.entities.resolve(&self.reference) {
            Ok(value) => {
                target.push_str(&value);
                None
            }
            Err(reason) => Some(reason),
        };

        match failure {
            None => Ok(()),
            Some(ReferenceError::Undefined) => Err(Error::UndefinedEntity {
                name: std::mem::take(&mut self.reference),
                position: at,
            }),
            Some(ReferenceError::InvalidCharacter) => Err(Error::syntax(
                format!("character reference &{}; is not a valid XML character", self.reference),
                at,
            )),
            Some(ReferenceError::Malformed) => Err(Error::syntax(
                format!("malformed reference &{};", self.reference),
                at,
            )),
        }
    }

    fn attribute_without_value(&self, at: Position) -> Error {
        Error::syntax(format!("attribute {} has no value", self.attribute_name), at)
    }

    fn begin_open_tag(&mut self, at: Position) -> Result<()> {
        if self.open_elements.is_empty() && self.seen_root && !self.fragment {
            return Err(Error::syntax(
                format!("element <{}> follows the root element", self.name),
                at,
            ));
        }
        self.attributes.clear();
        self.emit(XmlEvent::OpenTagStart { name: self.name.clone() }, at);
        Ok(())
    }

    fn finish_attribute(&mut self, at: Position) -> Result<()> {
        if self.attributes.iter().any(|a| a.name == self.attribute_name) {
            return Err(Error::syntax(
                format!("duplicate attribute {} on <{}>", self.attribute_name, self.name),
                at,
            ));
        }
        let attribute = Attribute::new(
            std::mem::take(&mut self.attribute_name),
            std::mem::take(&mut self.attribute_value),
        );
        self.emit(XmlEvent::Attribute(attribute.clone()), at);
        self.attributes.push(attribute);
        Ok(())
    }

    fn finish_open_tag(&mut self, self_closing: bool, at: Position) {
        let name = std::mem::take(&mut self.name);
        let attributes = std::mem::take(&mut self.attributes);
        if self.open_elements.is_empty() {
            self.seen_root = true;
        }

        self.emit(XmlEvent::OpenTag(StartElement::new(name.clone(), attributes, self_closing)), at);
        if self_closing {
            self.emit(XmlEvent::CloseTag { name }, at);
        } else {
            self.open_elements.push(name);
        }
        self.state = State::Text;
    }

    fn finish_close_tag(&mut self, at: Position) -> Result<()> {
        let name = std::mem::take(&mut self.name);
        match self.open_elements.pop() {
            None => return Err(Error::syntax(format!("unexpected close tag </{name}>"), at)),
            Some(open) if open != name => {
                return Err(Error::syntax(
                    format!("mismatched close tag: expected </{open}>, found </{name}>"),
                    at,
                ))
            }
            Some(_) => {}
        }
        self.emit(XmlEvent::CloseTag { name }, at);
        self.state = State::Text;
        Ok(())
    }
}

/// Append a character of text, comment, CDATA or PI data with
/// end-of-line normalization
#[inline]
fn push_text_char(buffer: &mut String, c: char, after_cr: bool) {
    match c {
        '\r' => buffer.push('\n'),
        '\n' if after_cr => {}
        _ => buffer.push(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(tokenizer: &mut Tokenizer) -> Vec<Result<Lexeme>> {
        std::iter::from_fn(|| tokenizer.next_event()).collect()
    }

    fn lex(input: &str) -> Vec<(XmlEvent, usize)> {
        lex_with(Tokenizer::default(), input)
    }

    fn lex_with(mut tokenizer: Tokenizer, input: &str) -> Vec<(XmlEvent, usize)> {
        tokenizer.write(input);
        tokenizer.close();
        drain(&mut tokenizer)
            .into_iter()
            .map(|item| {
                let lexeme = item.unwrap();
                (lexeme.event, lexeme.cursor.offset)
            })
            .collect()
    }

    fn lex_error(input: &str) -> Error {
        let mut tokenizer = Tokenizer::default();
        tokenizer.write(input);
        tokenizer.close();
        drain(&mut tokenizer)
            .into_iter()
            .find_map(|item| item.err())
            .expect("expected an error")
    }

    fn text(s: &str) -> XmlEvent {
        XmlEvent::Text(s.to_string())
    }

    #[test]
    fn test_element_with_text() {
        let events = lex("<a>hi</a>");
        assert_eq!(
            events,
            vec![
                (XmlEvent::OpenTagStart { name: "a".to_string() }, 3),
                (XmlEvent::OpenTag(StartElement::new("a", vec![], false)), 3),
                (text("hi"), 6),
                (XmlEvent::CloseTag { name: "a".to_string() }, 9),
            ]
        );
    }

    #[test]
    fn test_self_closing_emits_open_and_close() {
        let events = lex("<x />");
        assert_eq!(events[1], (XmlEvent::OpenTag(StartElement::new("x", vec![], true)), 5));
        assert_eq!(events[2], (XmlEvent::CloseTag { name: "x".to_string() }, 5));
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_comment_cursor_stops_before_gt() {
        let events = lex("<r><!--c--></r>");
        assert_eq!(events[2], (XmlEvent::Comment("c".to_string()), 10));
    }

    #[test]
    fn test_comment_with_single_dashes() {
        let events = lex("<r><!-- a-b - c --></r>");
        assert_eq!(events[2].0, XmlEvent::Comment(" a-b - c ".to_string()));
    }

    #[test]
    fn test_attribute_cursor_after_quote() {
        let events = lex("<a b=\"1\" c='2'/>");
        assert_eq!(events[1], (XmlEvent::Attribute(Attribute::new("b", "1")), 8));
        assert_eq!(events[2], (XmlEvent::Attribute(Attribute::new("c", "2")), 14));
        match &events[3].0 {
            XmlEvent::OpenTag(el) => {
                assert_eq!(el.attributes.len(), 2);
                assert!(el.self_closing);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_trailing_text_uses_virtual_terminator() {
        let tokenizer = Tokenizer::new(EntityTable::new(), true);
        let events = lex_with(tokenizer, "abc");
        assert_eq!(events, vec![(text("abc"), 4)]);
    }

    #[test]
    fn test_references() {
        let events = lex("<a t=\"&lt;&#65;\">x &amp; y&#x42;</a>");
        match &events[2].0 {
            XmlEvent::OpenTag(el) => assert_eq!(el.get_attribute_value("t"), Some("<A")),
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(events[3].0, text("x & y\u{42}"));
    }

    #[test]
    fn test_custom_entity() {
        let tokenizer = Tokenizer::new(EntityTable::with_entities([("test1", "test completed")]), false);
        let events = lex_with(tokenizer, "<a>&test1;</a>");
        assert_eq!(events[2].0, text("test completed"));
    }

    #[test]
    fn test_undefined_entity() {
        match lex_error("<a>&test1;</a>") {
            Error::UndefinedEntity { name, .. } => assert_eq!(name, "test1"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_line_endings_normalized() {
        let events = lex("<a>x\r\ny\rz</a>");
        assert_eq!(events[2].0, text("x\ny\nz"));

        let events = lex("<a><![CDATA[p\r\nq]]></a>");
        assert_eq!(events[2].0, XmlEvent::CData("p\nq".to_string()));
    }

    #[test]
    fn test_attribute_whitespace_normalized() {
        let events = lex("<a v=\"va\n\n\t\t\tl\n\n\t\t6\"/>");
        assert_eq!(events[1].0, XmlEvent::Attribute(Attribute::new("v", "va     l    6")));
    }

    #[test]
    fn test_cdata_brackets() {
        let events = lex("<a><![CDATA[x]]]><![CDATA[]>]]></a>");
        assert_eq!(events[2].0, XmlEvent::CData("x]".to_string()));
        assert_eq!(events[3].0, XmlEvent::CData("]>".to_string()));
    }

    #[test]
    fn test_processing_instruction() {
        let events = lex("<?pi-target   pi-data ?><a/>");
        assert_eq!(
            events[0],
            (
                XmlEvent::ProcessingInstruction {
                    target: "pi-target".to_string(),
                    body: "pi-data ".to_string(),
                },
                24
            )
        );

        let events = lex("<?empty?><a/>");
        assert_eq!(
            events[0].0,
            XmlEvent::ProcessingInstruction { target: "empty".to_string(), body: String::new() }
        );
    }

    #[test]
    fn test_doctype_with_internal_subset() {
        let input = "<!DOCTYPE a [<!ENTITY e \">\">]><a/>";
        let events = lex(input);
        assert_eq!(events[0], (XmlEvent::Doctype(" a [<!ENTITY e \">\">]".to_string()), 30));
        assert_eq!(&input[..30], "<!DOCTYPE a [<!ENTITY e \">\">]>");
    }

    #[test]
    fn test_chunked_matches_whole() {
        let input = "<?xml version=\"1.0\"?>\r\n<!DOCTYPE r SYSTEM \"r.dtd\">\n<r a=\"1&amp;2\">\r\n\tté&lt;xt<!-- c-o -->\
                     <![CDATA[d]]]]><?p q?><e/></r>\n";
        let whole = lex(input);

        let mut tokenizer = Tokenizer::default();
        let chars: Vec<char> = input.chars().collect();
        for c in chars {
            tokenizer.write(c.encode_utf8(&mut [0; 4]));
        }
        tokenizer.close();
        let chunked: Vec<_> = drain(&mut tokenizer)
            .into_iter()
            .map(|item| {
                let lexeme = item.unwrap();
                (lexeme.event, lexeme.cursor.offset)
            })
            .collect();

        assert_eq!(whole, chunked);
    }

    #[test]
    fn test_line_and_column() {
        let mut tokenizer = Tokenizer::default();
        tokenizer.write("<a>\n  <b/>\r\n</a>");
        tokenizer.close();
        let events: Vec<_> = drain(&mut tokenizer).into_iter().map(|e| e.unwrap()).collect();
        let b_open = events
            .iter()
            .find(|l| matches!(&l.event, XmlEvent::OpenTag(el) if el.name == "b"))
            .unwrap();
        assert_eq!(b_open.cursor, Position::new(10, 2, 7));
        let last = events.last().unwrap();
        assert_eq!(last.cursor, Position::new(16, 3, 5));
    }

    #[test]
    fn test_error_stops_processing() {
        let mut tokenizer = Tokenizer::default();
        tokenizer.write("<a></b><c>");
        tokenizer.close();
        let items = drain(&mut tokenizer);
        assert!(items[0].is_ok());
        assert!(items[1].is_ok());
        assert!(matches!(items.last(), Some(Err(Error::Syntax { .. }))));
        assert_eq!(items.len(), 3);
        assert!(tokenizer.has_failed());
    }

    #[test]
    fn test_well_formedness_errors() {
        assert!(matches!(lex_error("<a></b>"), Error::Syntax { .. }));
        assert!(matches!(lex_error("</a>"), Error::Syntax { .. }));
        assert!(matches!(lex_error("<a>"), Error::Syntax { .. }));
        assert!(matches!(lex_error("<a/><b/>"), Error::Syntax { .. }));
        assert!(matches!(lex_error("<a x=\"1\" x=\"2\"/>"), Error::Syntax { .. }));
        assert!(matches!(lex_error("<a x=1/>"), Error::Syntax { .. }));
        assert!(matches!(lex_error("<a x/>"), Error::Syntax { .. }));
        assert!(matches!(lex_error("<a x=\"1\"y=\"2\"/>"), Error::Syntax { .. }));
        assert!(matches!(lex_error("<a><!-- x -- y --></a>"), Error::Syntax { .. }));
        assert!(matches!(lex_error("<a><!-- open"), Error::Syntax { .. }));
        assert!(matches!(lex_error("<a>&amp</a>"), Error::Syntax { .. }));
        assert!(matches!(lex_error("<a>&#0;</a>"), Error::Syntax { .. }));
        assert!(matches!(lex_error("<a/><!DOCTYPE a>"), Error::Syntax { .. }));
        assert!(matches!(lex_error(""), Error::Syntax { .. }));
        assert!(matches!(lex_error("< a/>"), Error::Syntax { .. }));
        assert!(matches!(lex_error("<!FOO>"), Error::Syntax { .. }));
    }

    #[test]
    fn test_fragment_allows_siblings_and_no_root() {
        let tokenizer = Tokenizer::new(EntityTable::new(), true);
        let events = lex_with(tokenizer, "<a>foo</a><b>foo</b>");
        assert_eq!(events.len(), 8);

        let tokenizer = Tokenizer::new(EntityTable::new(), true);
        assert!(lex_with(tokenizer, "").is_empty());
    }

    #[test]
    fn test_write_after_close() {
        let mut tokenizer = Tokenizer::default();
        tokenizer.write("<a/>");
        tokenizer.close();
        tokenizer.write("<b/>");
        let items = drain(&mut tokenizer);
        assert!(matches!(items.last(), Some(Err(Error::Syntax { .. }))));
    }
}
