//! XML Attributes
//!
//! The normalized attribute record carried by open-tag events, plus the
//! helpers the tokenizer uses to build it:
//! - qualified name splitting
//! - attribute-value whitespace normalization
//! - namespace declaration extraction (`xmlns`, `xmlns:p`)

use memchr::memchr;

/// A parsed XML attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name (may include namespace prefix)
    pub name: String,
    /// Namespace prefix (before colon), if any
    pub prefix: Option<String>,
    /// Local name (after colon, if namespaced)
    pub local_name: String,
    /// Attribute value (references resolved, whitespace normalized)
    pub value: String,
}

impl Attribute {
    /// Create a new attribute, splitting the qualified name
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let (prefix, local_name) = split_name(&name);
        let prefix = prefix.map(str::to_string);
        let local_name = local_name.to_string();
        Attribute {
            name,
            prefix,
            local_name,
            value: value.into(),
        }
    }

    /// The prefix this attribute declares, if it is a namespace declaration.
    ///
    /// `xmlns="..."` declares the default namespace (empty prefix).
    pub fn declared_prefix(&self) -> Option<&str> {
        match self.prefix.as_deref() {
            Some("xmlns") => Some(&self.local_name),
            None if self.name == "xmlns" => Some(""),
            _ => None,
        }
    }

    /// Check if this attribute is a namespace declaration
    #[inline]
    pub fn is_namespace_declaration(&self) -> bool {
        self.declared_prefix().is_some()
    }
}

/// Split a name into prefix and local name at the first colon
pub fn split_name(name: &str) -> (Option<&str>, &str) {
    if let Some(colon_pos) = memchr(b':', name.as_bytes()) {
        (Some(&name[..colon_pos]), &name[colon_pos + 1..])
    } else {
        (None, name)
    }
}

/// Collect the namespace declarations made by an element's attributes.
///
/// Values are `None` when the declaration binds the prefix to the empty
/// string, which un-declares the default namespace.
pub fn namespace_declarations(attributes: &[Attribute]) -> Vec<(String, Option<String>)> {
    attributes
        .iter()
        .filter_map(|attr| {
            let prefix = attr.declared_prefix()?;
            let uri = (!attr.value.is_empty()).then(|| attr.value.clone());
            Some((prefix.to_string(), uri))
        })
        .collect()
}

/// Append a literal value character, applying end-of-line and
/// attribute-value normalization.
///
/// `after_cr` tells whether the previous input character was a carriage
/// return, so `\r\n` collapses into a single space.
#[inline]
pub(crate) fn push_value_char(value: &mut String, c: char, after_cr: bool) {
    match c {
        '\n' if after_cr => {}
        '\r' | '\n' | '\t' => value.push(' '),
        _ => value.push(c),
    }
}
