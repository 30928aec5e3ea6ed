//! XML Document - Arena-based DOM representation
//!
//! Efficient DOM storage with:
//! - Arena allocation for nodes
//! - NodeId indices for traversal
//! - String interning for names and namespace URIs
//!
//! Node 0 is always the root container: a Document, or a DocumentFragment
//! when the tree was built in fragment mode. Nodes are created detached
//! and linked with `append_child`.

use super::node::{NodeId, NodeKind, XmlAttribute, XmlNode};
use super::strings::StringPool;
use crate::core::attributes::split_name;
use crate::core::span::PositionRange;

/// An XML document stored in arena format
#[derive(Debug, Clone)]
pub struct XmlDocument {
    /// Arena of nodes
    nodes: Vec<XmlNode>,
    /// Interned strings
    strings: StringPool,
}

impl Default for XmlDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlDocument {
    /// ID of the root container
    pub const ROOT: NodeId = 0;

    /// Create an empty document
    pub fn new() -> Self {
        Self::with_root(NodeKind::Document)
    }

    /// Create an empty document fragment
    pub fn new_fragment() -> Self {
        Self::with_root(NodeKind::DocumentFragment)
    }

    fn with_root(kind: NodeKind) -> Self {
        let mut nodes = Vec::with_capacity(256);
        nodes.push(XmlNode::new(kind));
        XmlDocument {
            nodes,
            strings: StringPool::new(),
        }
    }

    /// Root container ID
    #[inline]
    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    /// Whether the root container is a document fragment
    #[inline]
    pub fn is_fragment(&self) -> bool {
        self.nodes[Self::ROOT as usize].kind == NodeKind::DocumentFragment
    }

    /// Interned names and URIs
    #[inline]
    pub fn strings(&self) -> &StringPool {
        &self.strings
    }

    fn push_node(&mut self, node: XmlNode) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        id
    }

    // =========================================================================
    // Node factory
    // =========================================================================

    /// Create an element in a namespace; the prefix is taken from the
    /// qualified name
    pub fn create_element_ns(&mut self, namespace: Option<&str>, qualified_name: &str) -> NodeId {
        let (prefix, local_name) = split_name(qualified_name);
        let node = XmlNode::element(
            self.strings.intern(qualified_name),
            self.strings.intern_opt(prefix),
            self.strings.intern(local_name),
            self.strings.intern_opt(namespace),
        );
        self.push_node(node)
    }

    /// Create an element with no namespace; the name is not split
    pub fn create_element(&mut self, name: &str) -> NodeId {
        let name_id = self.strings.intern(name);
        self.push_node(XmlNode::element(name_id, 0, name_id, 0))
    }

    /// Create a text node
    pub fn create_text_node(&mut self, data: impl Into<String>) -> NodeId {
        self.push_node(XmlNode::character_data(NodeKind::Text, data))
    }

    /// Create a CDATA section
    pub fn create_cdata_section(&mut self, data: impl Into<String>) -> NodeId {
        self.push_node(XmlNode::character_data(NodeKind::CData, data))
    }

    /// Create a comment
    pub fn create_comment(&mut self, data: impl Into<String>) -> NodeId {
        self.push_node(XmlNode::character_data(NodeKind::Comment, data))
    }

    /// Create a processing instruction
    pub fn create_processing_instruction(&mut self, target: &str, data: impl Into<String>) -> NodeId {
        let target_id = self.strings.intern(target);
        self.push_node(XmlNode::processing_instruction(target_id, data))
    }

    /// Create a document type node; empty identifiers mean absent
    pub fn create_document_type(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        let node = XmlNode::document_type(
            self.strings.intern(name),
            self.strings.intern(public_id),
            self.strings.intern(system_id),
        );
        self.push_node(node)
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Append `child` as the last child of `parent`, detaching it from
    /// its current parent first.
    ///
    /// # Panics
    /// If either ID does not belong to this document.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> NodeId {
        self.detach(child);

        // Get parent's last_child first to avoid borrow issues
        let last_child_opt = self.nodes[parent as usize].last_child;

        if let Some(last_child_id) = last_child_opt {
            self.nodes[child as usize].prev_sibling = Some(last_child_id);
            self.nodes[last_child_id as usize].next_sibling = Some(child);
        } else {
            self.nodes[parent as usize].first_child = Some(child);
        }
        self.nodes[parent as usize].last_child = Some(child);
        self.nodes[child as usize].parent = Some(parent);
        child
    }

    /// Unlink a node from its parent and siblings
    fn detach(&mut self, id: NodeId) {
        let node = &mut self.nodes[id as usize];
        let (Some(parent), prev, next) = (node.parent.take(), node.prev_sibling.take(), node.next_sibling.take()) else {
            return;
        };

        match prev {
            Some(prev) => self.nodes[prev as usize].next_sibling = next,
            None => self.nodes[parent as usize].first_child = next,
        }
        match next {
            Some(next) => self.nodes[next as usize].prev_sibling = prev,
            None => self.nodes[parent as usize].last_child = prev,
        }
    }

    /// Set a namespaced attribute, replacing any attribute with the same
    /// namespace and local name. Returns the attribute's index, or `None`
    /// when `element` is not an element.
    pub fn set_attribute_ns(
        &mut self,
        element: NodeId,
        namespace: Option<&str>,
        qualified_name: &str,
        value: impl Into<String>,
    ) -> Option<usize> {
        let (prefix, local_name) = split_name(qualified_name);
        let attribute = XmlAttribute {
            name_id: self.strings.intern(qualified_name),
            prefix_id: self.strings.intern_opt(prefix),
            local_name_id: self.strings.intern(local_name),
            namespace_id: self.strings.intern_opt(namespace),
            value: value.into(),
            position: None,
        };
        self.store_attribute(element, attribute)
    }

    /// Set an attribute with no namespace; the name is not split
    pub fn set_attribute(&mut self, element: NodeId, name: &str, value: impl Into<String>) -> Option<usize> {
        let name_id = self.strings.intern(name);
        let attribute = XmlAttribute {
            name_id,
            prefix_id: 0,
            local_name_id: name_id,
            namespace_id: 0,
            value: value.into(),
            position: None,
        };
        self.store_attribute(element, attribute)
    }

    fn store_attribute(&mut self, element: NodeId, attribute: XmlAttribute) -> Option<usize> {
        let node = self.nodes.get_mut(element as usize).filter(|n| n.is_element())?;
        let existing = node.attributes.iter().position(|a| {
            a.namespace_id == attribute.namespace_id && a.local_name_id == attribute.local_name_id
        });
        match existing {
            Some(index) => {
                node.attributes[index] = attribute;
                Some(index)
            }
            None => {
                node.attributes.push(attribute);
                Some(node.attributes.len() - 1)
            }
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Get a node by ID
    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&XmlNode> {
        self.nodes.get(id as usize)
    }

    /// Get a mutable node by ID
    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut XmlNode> {
        self.nodes.get_mut(id as usize)
    }

    /// Kind of a node
    #[inline]
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node(id).map(|n| n.kind)
    }

    /// Parent of a node
    #[inline]
    pub fn parent_node(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// First child of a node
    #[inline]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.first_child
    }

    /// Last child of a node
    #[inline]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.last_child
    }

    /// Next sibling of a node
    #[inline]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.next_sibling
    }

    /// Previous sibling of a node
    #[inline]
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.prev_sibling
    }

    /// Iterate over children of a node
    pub fn children(&self, id: NodeId) -> ChildIter<'_> {
        ChildIter {
            doc: self,
            next: self.first_child(id),
        }
    }

    /// Iterate over all descendants of a node (document order)
    pub fn descendants(&self, id: NodeId) -> DescendantIter<'_> {
        // Initialize stack with all children in reverse order (so first is processed first)
        let mut stack = Vec::new();
        let mut child_id = self.last_child(id);
        while let Some(cid) = child_id {
            stack.push(cid);
            child_id = self.previous_sibling(cid);
        }
        DescendantIter { doc: self, stack }
    }

    /// First element child of the root container
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(Self::ROOT).find(|&id| self.kind(id) == Some(NodeKind::Element))
    }

    /// Number of element children
    pub fn child_element_count(&self, id: NodeId) -> usize {
        self.children(id).filter(|&c| self.kind(c) == Some(NodeKind::Element)).count()
    }

    /// Get total number of nodes, detached ones included
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// DOM node name: qualified name for elements, target for PIs, name
    /// for doctypes, `#text`-style names for the rest
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        let node = self.node(id)?;
        match node.kind {
            NodeKind::Element | NodeKind::ProcessingInstruction | NodeKind::DocumentType => {
                self.strings.get_str(node.name_id)
            }
            NodeKind::Document => Some("#document"),
            NodeKind::DocumentFragment => Some("#document-fragment"),
            NodeKind::Text => Some("#text"),
            NodeKind::CData => Some("#cdata-section"),
            NodeKind::Comment => Some("#comment"),
        }
    }

    /// Local name of an element
    pub fn local_name(&self, id: NodeId) -> Option<&str> {
        let node = self.node(id).filter(|n| n.is_element())?;
        self.strings.get_str(node.local_name_id)
    }

    /// Namespace prefix of an element
    pub fn prefix(&self, id: NodeId) -> Option<&str> {
        self.strings.get_opt(self.node(id)?.prefix_id)
    }

    /// Namespace URI of an element
    pub fn namespace_uri(&self, id: NodeId) -> Option<&str> {
        self.strings.get_opt(self.node(id)?.namespace_id)
    }

    /// Data of a text, CDATA, comment or PI node
    pub fn data(&self, id: NodeId) -> Option<&str> {
        self.node(id).filter(|n| n.kind.has_data()).map(|n| n.data.as_str())
    }

    /// Target of a processing instruction
    pub fn target(&self, id: NodeId) -> Option<&str> {
        let node = self.node(id).filter(|n| n.kind == NodeKind::ProcessingInstruction)?;
        self.strings.get_str(node.name_id)
    }

    /// Public identifier of a doctype (empty when absent)
    pub fn public_id(&self, id: NodeId) -> Option<&str> {
        let node = self.node(id).filter(|n| n.kind == NodeKind::DocumentType)?;
        self.strings.get_str(node.public_id)
    }

    /// System identifier of a doctype (empty when absent)
    pub fn system_id(&self, id: NodeId) -> Option<&str> {
        let node = self.node(id).filter(|n| n.kind == NodeKind::DocumentType)?;
        self.strings.get_str(node.system_id)
    }

    /// Concatenated text and CDATA content of a node and its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        match self.node(id) {
            Some(node) if node.kind.has_data() => node.data.clone(),
            Some(_) => self
                .descendants(id)
                .filter_map(|d| self.node(d))
                .filter(|n| matches!(n.kind, NodeKind::Text | NodeKind::CData))
                .map(|n| n.data.as_str())
                .collect(),
            None => String::new(),
        }
    }

    /// Get attributes for an element
    pub fn attributes(&self, id: NodeId) -> &[XmlAttribute] {
        self.node(id).map(|n| n.attributes.as_slice()).unwrap_or(&[])
    }

    /// Get an attribute by qualified name
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&XmlAttribute> {
        let name_id = self.strings.find(name)?;
        self.attributes(id).iter().find(|a| a.name_id == name_id)
    }

    /// Get attribute value by qualified name
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attribute(id, name).map(|a| a.value.as_str())
    }

    /// Get attribute value by namespace and local name
    pub fn get_attribute_ns(&self, id: NodeId, namespace: Option<&str>, local_name: &str) -> Option<&str> {
        let namespace_id = self.strings.find(namespace.unwrap_or(""))?;
        let local_name_id = self.strings.find(local_name)?;
        self.attributes(id)
            .iter()
            .find(|a| a.namespace_id == namespace_id && a.local_name_id == local_name_id)
            .map(|a| a.value.as_str())
    }

    /// Qualified name of an attribute
    #[inline]
    pub fn attribute_name<'d>(&'d self, attribute: &XmlAttribute) -> &'d str {
        self.strings.get_str(attribute.name_id).unwrap_or("")
    }

    /// Namespace URI of an attribute
    #[inline]
    pub fn attribute_namespace<'d>(&'d self, attribute: &XmlAttribute) -> Option<&'d str> {
        self.strings.get_opt(attribute.namespace_id)
    }

    /// Source span of a node
    #[inline]
    pub fn position(&self, id: NodeId) -> Option<PositionRange> {
        self.node(id)?.position
    }

    /// Source span of an element's end tag
    #[inline]
    pub fn close_position(&self, id: NodeId) -> Option<PositionRange> {
        self.node(id)?.close_position
    }
}

/// Iterator over child nodes
pub struct ChildIter<'d> {
    doc: &'d XmlDocument,
    next: Option<NodeId>,
}

impl<'d> Iterator for ChildIter<'d> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.next_sibling(current);
        Some(current)
    }
}

/// Iterator over descendant nodes (depth-first)
pub struct DescendantIter<'d> {
    doc: &'d XmlDocument,
    stack: Vec<NodeId>,
}

impl<'d> Iterator for DescendantIter<'d> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;

        // Add children to stack in reverse order (so first child is processed first)
        let mut child_id = self.doc.last_child(current);
        while let Some(id) = child_id {
            self.stack.push(id);
            child_id = self.doc.previous_sibling(id);
        }

        Some(current)
    }
}
