//! XML Node representation
//!
//! Uses NodeId (u32) for compact, cache-friendly node references.

use crate::core::span::{AttributePosition, PositionRange};

/// Compact node identifier (index into arena)
pub type NodeId = u32;

/// Type of XML node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Document root
    Document,
    /// Root container in fragment mode
    DocumentFragment,
    /// Element node
    Element,
    /// Text content
    Text,
    /// CDATA section
    CData,
    /// Comment
    Comment,
    /// Processing instruction
    ProcessingInstruction,
    /// `<!DOCTYPE ...>`
    DocumentType,
}

impl NodeKind {
    /// Text, CDATA, comments and processing instructions carry a data string
    #[inline]
    pub fn has_data(self) -> bool {
        matches!(
            self,
            NodeKind::Text | NodeKind::CData | NodeKind::Comment | NodeKind::ProcessingInstruction
        )
    }

    /// Node kinds that may hold children
    #[inline]
    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Document | NodeKind::DocumentFragment | NodeKind::Element)
    }
}

/// An XML node in the arena
#[derive(Debug, Clone)]
pub struct XmlNode {
    /// Type of this node
    pub kind: NodeKind,
    /// Parent node (None for the root container and detached nodes)
    pub parent: Option<NodeId>,
    /// First child node
    pub first_child: Option<NodeId>,
    /// Last child node
    pub last_child: Option<NodeId>,
    /// Previous sibling
    pub prev_sibling: Option<NodeId>,
    /// Next sibling
    pub next_sibling: Option<NodeId>,
    /// Qualified name (elements, doctypes) or target (PIs)
    pub name_id: u32,
    /// Namespace prefix, or 0
    pub prefix_id: u32,
    /// Local name (elements)
    pub local_name_id: u32,
    /// Namespace URI, or 0
    pub namespace_id: u32,
    /// Public identifier (doctypes), or 0
    pub public_id: u32,
    /// System identifier (doctypes), or 0
    pub system_id: u32,
    /// Character data (text, CDATA, comments, PIs)
    pub data: String,
    /// Attributes in document order (elements)
    pub attributes: Vec<XmlAttribute>,
    /// Span of the node's own markup, when tracking is enabled
    pub position: Option<PositionRange>,
    /// Span of an element's end tag, when tracking is enabled
    pub close_position: Option<PositionRange>,
}

impl XmlNode {
    /// Create a detached node of the given kind with no name or data
    pub fn new(kind: NodeKind) -> Self {
        XmlNode {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            name_id: 0,
            prefix_id: 0,
            local_name_id: 0,
            namespace_id: 0,
            public_id: 0,
            system_id: 0,
            data: String::new(),
            attributes: Vec::new(),
            position: None,
            close_position: None,
        }
    }

    /// Create a new element node
    pub fn element(name_id: u32, prefix_id: u32, local_name_id: u32, namespace_id: u32) -> Self {
        XmlNode {
            name_id,
            prefix_id,
            local_name_id,
            namespace_id,
            ..Self::new(NodeKind::Element)
        }
    }

    /// Create a text, CDATA or comment node
    pub fn character_data(kind: NodeKind, data: impl Into<String>) -> Self {
        XmlNode {
            data: data.into(),
            ..Self::new(kind)
        }
    }

    /// Create a processing instruction node
    pub fn processing_instruction(target_id: u32, data: impl Into<String>) -> Self {
        XmlNode {
            name_id: target_id,
            data: data.into(),
            ..Self::new(NodeKind::ProcessingInstruction)
        }
    }

    /// Create a document type node
    pub fn document_type(name_id: u32, public_id: u32, system_id: u32) -> Self {
        XmlNode {
            name_id,
            public_id,
            system_id,
            ..Self::new(NodeKind::DocumentType)
        }
    }

    /// Check if this is an element node
    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Check if this is a text node
    #[inline]
    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    /// Check if this node has children
    #[inline]
    pub fn has_children(&self) -> bool {
        self.first_child.is_some()
    }

    /// Check if this node has attributes
    #[inline]
    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }
}

/// Stored attribute
#[derive(Debug, Clone)]
pub struct XmlAttribute {
    /// Qualified name
    pub name_id: u32,
    /// Namespace prefix, or 0
    pub prefix_id: u32,
    /// Local name
    pub local_name_id: u32,
    /// Namespace URI, or 0
    pub namespace_id: u32,
    /// Attribute value
    pub value: String,
    /// End of the attribute in the source, when tracking is enabled
    pub position: Option<AttributePosition>,
}
