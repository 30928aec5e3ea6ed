//! DOM Module - Arena-based XML Document
//!
//! Implements the document tree and the machinery that builds it:
//! - Arena allocation for nodes
//! - NodeId (u32) indices for cache-friendly traversal
//! - String interning for names and namespace URIs
//! - Namespace resolution stack
//! - Source position tracking
//! - Event-driven document builder

pub mod builder;
pub mod document;
pub mod namespace;
pub mod node;
pub mod position;
pub mod strings;

pub use builder::DocumentBuilder;
pub use document::{ChildIter, DescendantIter, XmlDocument};
pub use namespace::NamespaceContext;
pub use node::{NodeId, NodeKind, XmlAttribute, XmlNode};
pub use position::PositionTracker;
pub use strings::StringPool;
