//! Parse options
//!
//! Builder-style configuration shared by every entry point.

use crate::core::entities::EntityTable;
use crate::core::tokenizer::Tokenizer;
use crate::dom::{NodeId, XmlDocument};
use crate::reader::events::StartElement;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Decides whether an element (and its whole subtree) is kept.
///
/// Receives the element as read, the tree built so far, and the node the
/// element would be appended to.
pub type TagFilter = Arc<dyn Fn(&StartElement, &XmlDocument, NodeId) -> bool + Send + Sync>;

/// Options controlling how a document is built
#[derive(Clone)]
pub struct ParseOptions {
    /// Resolve prefixes and place nodes in namespaces (default: true)
    pub namespaces: bool,
    /// Record source spans on nodes and attributes (default: false)
    pub position_tracking: bool,
    /// Extra named entities, inserted literally when referenced
    pub additional_entities: HashMap<String, String>,
    /// Prefix bindings in effect before the first element opens
    pub additional_namespaces: HashMap<String, String>,
    /// Subtree filter; rejected elements and their content produce no nodes
    pub tag_filter: Option<TagFilter>,
    /// Build into a document fragment that accepts several top-level
    /// elements and top-level text (default: false)
    pub fragment: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            namespaces: true,
            position_tracking: false,
            additional_entities: HashMap::new(),
            additional_namespaces: HashMap::new(),
            tag_filter: None,
            fragment: false,
        }
    }
}

impl fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOptions")
            .field("namespaces", &self.namespaces)
            .field("position_tracking", &self.position_tracking)
            .field("additional_entities", &self.additional_entities)
            .field("additional_namespaces", &self.additional_namespaces)
            .field("tag_filter", &self.tag_filter.as_ref().map(|_| "Fn"))
            .field("fragment", &self.fragment)
            .finish()
    }
}

impl ParseOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable namespace processing
    pub fn with_namespaces(mut self, enabled: bool) -> Self {
        self.namespaces = enabled;
        self
    }

    /// Enable or disable source position tracking
    pub fn with_position_tracking(mut self, enabled: bool) -> Self {
        self.position_tracking = enabled;
        self
    }

    /// Add a named entity
    pub fn with_entity(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_entities.insert(name.into(), value.into());
        self
    }

    /// Add a baseline prefix binding
    pub fn with_namespace(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.additional_namespaces.insert(prefix.into(), uri.into());
        self
    }

    /// Keep only elements accepted by `filter`
    pub fn with_tag_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&StartElement, &XmlDocument, NodeId) -> bool + Send + Sync + 'static,
    {
        self.tag_filter = Some(Arc::new(filter));
        self
    }

    /// Enable or disable fragment mode
    pub fn with_fragment(mut self, enabled: bool) -> Self {
        self.fragment = enabled;
        self
    }

    /// Tokenizer configured with these options' entities and fragment mode
    pub(crate) fn tokenizer(&self) -> Tokenizer {
        let entities = EntityTable::with_entities(
            self.additional_entities
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        );
        Tokenizer::new(entities, self.fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ParseOptions::default();
        assert!(options.namespaces);
        assert!(!options.position_tracking);
        assert!(!options.fragment);
        assert!(options.tag_filter.is_none());
        assert!(options.additional_entities.is_empty());
    }

    #[test]
    fn test_builder() {
        let options = ParseOptions::new()
            .with_position_tracking(true)
            .with_entity("test1", "test completed")
            .with_namespace("nerf", "http://nerf")
            .with_tag_filter(|el, _, _| el.name != "skip")
            .with_fragment(true)
            .with_namespaces(false);

        assert!(options.position_tracking);
        assert!(options.fragment);
        assert!(!options.namespaces);
        assert_eq!(options.additional_entities.get("test1").map(String::as_str), Some("test completed"));
        assert_eq!(options.additional_namespaces.get("nerf").map(String::as_str), Some("http://nerf"));

        let filter = options.tag_filter.clone().unwrap();
        let doc = XmlDocument::new();
        assert!(!filter(&StartElement::new("skip", vec![], false), &doc, doc.root()));
        assert!(filter(&StartElement::new("keep", vec![], false), &doc, doc.root()));
    }

    #[test]
    fn test_debug_hides_filter() {
        let options = ParseOptions::new().with_tag_filter(|_, _, _| true);
        let rendered = format!("{options:?}");
        assert!(rendered.contains("tag_filter: Some(\"Fn\")"));
    }
}
