//! Document Builder
//!
//! Turns lexemes into tree mutations. Each event produces at most one node.
//!
//! Per-parse state:
//! - `open_elements`: explicit stack of open elements; the innermost one is
//!   the insertion point, the root container when empty
//! - `namespaces`: one frame per open element (absent when namespace
//!   processing is disabled)
//! - `positions`: source span tracking (absent when disabled)
//! - `filter_depth`: nesting depth inside a subtree rejected by the tag filter

use super::document::XmlDocument;
use super::namespace::{ns, NamespaceContext};
use super::node::{NodeId, NodeKind};
use super::position::PositionTracker;
use crate::core::attributes::{split_name, Attribute};
use crate::core::dtd::DoctypeDeclaration;
use crate::core::scanner::is_blank;
use crate::core::span::Position;
use crate::error::{Error, Result};
use crate::options::{ParseOptions, TagFilter};
use crate::reader::events::{Lexeme, StartElement, XmlEvent};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Builds an `XmlDocument` from a stream of lexemes
pub struct DocumentBuilder {
    document: XmlDocument,
    namespaces: Option<NamespaceContext>,
    positions: Option<PositionTracker>,
    open_elements: Vec<NodeId>,
    filter_depth: usize,
    /// Cursor of each attribute of the tag being read, by qualified name
    pending_attributes: HashMap<String, Position>,
    tag_filter: Option<TagFilter>,
    fragment: bool,
    seen_element: bool,
    last_cursor: Position,
}

impl DocumentBuilder {
    /// Create a builder for one parse
    pub fn new(options: &ParseOptions) -> Self {
        let document = if options.fragment {
            XmlDocument::new_fragment()
        } else {
            XmlDocument::new()
        };
        let namespaces = options
            .namespaces
            .then(|| NamespaceContext::new(options.additional_namespaces.iter()));

        DocumentBuilder {
            document,
            namespaces,
            positions: options.position_tracking.then(PositionTracker::new),
            open_elements: Vec::with_capacity(32),
            filter_depth: 0,
            pending_attributes: HashMap::new(),
            tag_filter: options.tag_filter.clone(),
            fragment: options.fragment,
            seen_element: false,
            last_cursor: Position::start(),
        }
    }

    /// The tree built so far
    #[inline]
    pub fn document(&self) -> &XmlDocument {
        &self.document
    }

    /// Current insertion point
    #[inline]
    pub fn context_node(&self) -> NodeId {
        self.open_elements.last().copied().unwrap_or(XmlDocument::ROOT)
    }

    /// Nesting depth inside a filtered subtree, 0 when not filtering
    #[inline]
    pub fn filter_depth(&self) -> usize {
        self.filter_depth
    }

    /// Apply one lexeme to the tree
    pub fn handle(&mut self, lexeme: Lexeme) -> Result<()> {
        let Lexeme { event, cursor } = lexeme;
        trace!(kind = event.kind(), offset = cursor.offset, filter_depth = self.filter_depth, "event");
        self.last_cursor = cursor;

        match event {
            XmlEvent::OpenTagStart { .. } => {
                self.pending_attributes.clear();
                Ok(())
            }
            XmlEvent::Attribute(attribute) => {
                if self.positions.is_some() && self.filter_depth == 0 {
                    self.pending_attributes.insert(attribute.name, cursor);
                }
                Ok(())
            }
            XmlEvent::OpenTag(element) => self.open_tag(&element, cursor),
            XmlEvent::CloseTag { .. } => self.close_tag(cursor),
            XmlEvent::Text(data) => self.text(data, cursor),
            XmlEvent::ProcessingInstruction { target, body } => {
                self.processing_instruction(&target, body, cursor)
            }
            XmlEvent::Comment(data) => {
                if self.filter_depth == 0 {
                    let id = self.document.create_comment(data);
                    self.append(id, NodeKind::Comment, cursor);
                }
                Ok(())
            }
            XmlEvent::CData(data) => {
                if self.filter_depth == 0 {
                    let id = self.document.create_cdata_section(data);
                    self.append(id, NodeKind::CData, cursor);
                }
                Ok(())
            }
            XmlEvent::Doctype(raw) => self.doctype(&raw, cursor),
        }
    }

    /// Finish the parse and hand over the tree
    pub fn finish(self) -> Result<XmlDocument> {
        if let Some(&open) = self.open_elements.last() {
            let name = self.document.node_name(open).unwrap_or_default();
            return Err(Error::syntax(format!("unclosed element <{name}>"), self.last_cursor));
        }
        if self.filter_depth > 0 {
            return Err(Error::syntax("unclosed filtered element", self.last_cursor));
        }
        Ok(self.document)
    }

    // =========================================================================
    // Elements
    // =========================================================================

    fn open_tag(&mut self, element: &StartElement, cursor: Position) -> Result<()> {
        self.seen_element = true;

        if self.filter_depth > 0 {
            self.filter_depth += 1;
            return Ok(());
        }

        let parent = self.context_node();
        if let Some(filter) = &self.tag_filter {
            if !filter(element, &self.document, parent) {
                debug!(element = %element.name, offset = cursor.offset, "filtering subtree");
                self.filter_depth = 1;
                return Ok(());
            }
        }

        let id = match self.namespaces.as_mut() {
            Some(namespaces) => {
                check_qualified_names(element, cursor)?;
                namespaces.push(&element.namespaces);
                let prefix = element.lookup_prefix();
                let Some(uri) = namespaces.location(prefix) else {
                    return Err(unbound(prefix));
                };
                self.document.create_element_ns(uri, &element.name)
            }
            None => self.document.create_element(&element.name),
        };
        self.track(id, NodeKind::Element, cursor);

        for attribute in &element.attributes {
            let index = match &self.namespaces {
                Some(namespaces) => {
                    let uri = attribute_namespace(namespaces, attribute)?;
                    self.document.set_attribute_ns(id, uri, &attribute.name, attribute.value.as_str())
                }
                None => self.document.set_attribute(id, &attribute.name, attribute.value.as_str()),
            };
            if let (Some(index), Some(&end)) = (index, self.pending_attributes.get(&attribute.name)) {
                if let Some(stored) = self
                    .document
                    .node_mut(id)
                    .and_then(|node| node.attributes.get_mut(index))
                {
                    stored.position = Some(PositionTracker::attribute_position(end));
                }
            }
        }

        self.document.append_child(parent, id);
        self.open_elements.push(id);
        Ok(())
    }

    fn close_tag(&mut self, cursor: Position) -> Result<()> {
        if self.filter_depth > 0 {
            self.filter_depth -= 1;
            if self.filter_depth == 0 {
                debug!(offset = cursor.offset, "filtered subtree closed");
                if let Some(positions) = self.positions.as_mut() {
                    positions.advance_only(cursor);
                }
            }
            return Ok(());
        }

        let Some(id) = self.open_elements.pop() else {
            return Err(Error::StructuralUnderflow);
        };
        if let Some(positions) = self.positions.as_mut() {
            let range = positions.track_close(cursor);
            if let Some(node) = self.document.node_mut(id) {
                node.close_position = Some(range);
            }
        }
        if let Some(namespaces) = self.namespaces.as_mut() {
            if !namespaces.pop() {
                return Err(Error::StructuralUnderflow);
            }
        }
        Ok(())
    }

    // =========================================================================
    // Character data and other nodes
    // =========================================================================

    fn text(&mut self, data: String, cursor: Position) -> Result<()> {
        if self.filter_depth > 0 {
            return Ok(());
        }

        if self.open_elements.is_empty() && !self.fragment {
            if !is_blank(&data) {
                return Err(Error::TextOutsideRoot { position: cursor.shifted(-1) });
            }
            if let Some(positions) = self.positions.as_mut() {
                positions.skip(NodeKind::Text, cursor);
            }
            return Ok(());
        }

        let id = self.document.create_text_node(data);
        self.append(id, NodeKind::Text, cursor);
        Ok(())
    }

    fn processing_instruction(&mut self, target: &str, body: String, cursor: Position) -> Result<()> {
        if self.filter_depth > 0 {
            return Ok(());
        }

        // XML declaration
        if target == "xml" && !self.seen_element {
            if let Some(positions) = self.positions.as_mut() {
                positions.advance_only(cursor);
            }
            return Ok(());
        }

        let id = self.document.create_processing_instruction(target, body);
        self.append(id, NodeKind::ProcessingInstruction, cursor);
        Ok(())
    }

    fn doctype(&mut self, raw: &str, cursor: Position) -> Result<()> {
        if self.filter_depth > 0 {
            return Ok(());
        }

        let declaration = DoctypeDeclaration::parse(raw)?;
        let id = self.document.create_document_type(
            &declaration.name,
            declaration.public_id.as_deref().unwrap_or(""),
            declaration.system_id.as_deref().unwrap_or(""),
        );
        self.append(id, NodeKind::DocumentType, cursor);
        Ok(())
    }

    /// Record the node's span and append it to the insertion point
    fn append(&mut self, id: NodeId, kind: NodeKind, cursor: Position) {
        self.track(id, kind, cursor);
        let parent = self.context_node();
        self.document.append_child(parent, id);
    }

    fn track(&mut self, id: NodeId, kind: NodeKind, cursor: Position) {
        let Some(positions) = self.positions.as_mut() else {
            return;
        };
        let range = positions.track_node(kind, cursor);
        if let Some(node) = self.document.node_mut(id) {
            node.position = Some(range);
        }
    }
}

/// Namespace of an attribute. Unprefixed attributes are in no namespace,
/// whatever the default namespace, except `xmlns` itself.
fn attribute_namespace<'c>(namespaces: &'c NamespaceContext, attribute: &Attribute) -> Result<Option<&'c str>> {
    match attribute.prefix.as_deref() {
        None if attribute.name == "xmlns" => Ok(Some(ns::XMLNS)),
        None => Ok(None),
        Some(prefix) => namespaces.location(prefix).ok_or_else(|| unbound(prefix)),
    }
}

/// Names with an empty prefix or local part, and prefixed declarations
/// with an empty URI, have no namespace-aware reading
fn check_qualified_names(element: &StartElement, cursor: Position) -> Result<()> {
    let names = std::iter::once(&element.name).chain(element.attributes.iter().map(|a| &a.name));
    for name in names {
        if let (Some(prefix), local_name) = split_name(name) {
            if prefix.is_empty() || local_name.is_empty() {
                return Err(Error::syntax(format!("malformed qualified name {name:?}"), cursor));
            }
        }
    }
    if let Some((prefix, _)) = element.namespaces.iter().find(|(p, uri)| !p.is_empty() && uri.is_none()) {
        return Err(Error::syntax(
            format!("namespace prefix {prefix:?} cannot be bound to the empty string"),
            cursor,
        ));
    }
    Ok(())
}

fn unbound(prefix: &str) -> Error {
    Error::UnboundNamespacePrefix { prefix: prefix.to_string() }
}
