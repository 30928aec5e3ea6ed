//! XML Event Types
//!
//! Typed lexical events produced by the tokenizer and consumed by the
//! document builder. Every event travels inside a `Lexeme` together with
//! the cursor position at which it was dispatched.

use crate::core::attributes::{namespace_declarations, split_name, Attribute};
use crate::core::span::Position;

/// XML parsing event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    /// Name of an element whose attributes are about to follow
    OpenTagStart { name: String },
    /// One attribute of the tag currently being read
    Attribute(Attribute),
    /// Complete start tag: `<name attrs...>` or `<name attrs.../>`
    OpenTag(StartElement),
    /// End of an element: `</name>`, also sent right after a self-closing tag
    CloseTag { name: String },
    /// Character data between tags (references resolved)
    Text(String),
    /// Processing instruction: `<?target body?>`
    ProcessingInstruction { target: String, body: String },
    /// Comment content
    Comment(String),
    /// Raw DOCTYPE body following `<!DOCTYPE`
    Doctype(String),
    /// CDATA section content
    CData(String),
}

impl XmlEvent {
    /// Short name of the event kind, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            XmlEvent::OpenTagStart { .. } => "open-tag-start",
            XmlEvent::Attribute(_) => "attribute",
            XmlEvent::OpenTag(_) => "open-tag",
            XmlEvent::CloseTag { .. } => "close-tag",
            XmlEvent::Text(_) => "text",
            XmlEvent::ProcessingInstruction { .. } => "processing-instruction",
            XmlEvent::Comment(_) => "comment",
            XmlEvent::Doctype(_) => "doctype",
            XmlEvent::CData(_) => "cdata",
        }
    }
}

/// An event plus the cursor it was dispatched at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub event: XmlEvent,
    pub cursor: Position,
}

impl Lexeme {
    #[inline]
    pub fn new(event: XmlEvent, cursor: Position) -> Self {
        Lexeme { event, cursor }
    }
}

/// Start element event data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartElement {
    /// Full element name (may include prefix)
    pub name: String,
    /// Namespace prefix (before colon), if any
    pub prefix: Option<String>,
    /// Local name (after colon)
    pub local_name: String,
    /// Namespace declarations made on this element, in document order
    pub namespaces: Vec<(String, Option<String>)>,
    /// All attributes in document order, declarations included
    pub attributes: Vec<Attribute>,
    /// Written as `<name/>`
    pub self_closing: bool,
}

impl StartElement {
    /// Create a new start element, deriving prefix, local name and
    /// namespace declarations
    pub fn new(name: impl Into<String>, attributes: Vec<Attribute>, self_closing: bool) -> Self {
        let name = name.into();
        let (prefix, local_name) = split_name(&name);
        let prefix = prefix.map(str::to_string);
        let local_name = local_name.to_string();
        StartElement {
            namespaces: namespace_declarations(&attributes),
            name,
            prefix,
            local_name,
            attributes,
            self_closing,
        }
    }

    /// Prefix used for namespace lookup (empty for the default namespace)
    #[inline]
    pub fn lookup_prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or("")
    }

    /// Get an attribute by qualified name
    pub fn get_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Get an attribute value by qualified name
    pub fn get_attribute_value(&self, name: &str) -> Option<&str> {
        self.get_attribute(name).map(|a| a.value.as_str())
    }
}
