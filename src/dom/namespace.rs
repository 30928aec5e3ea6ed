//! Namespace Resolution
//!
//! Stack-based prefix resolution. Lookups consult, in order:
//! 1. the frames pushed for currently open elements, innermost first
//! 2. the caller-supplied baseline frame
//! 3. `DEFAULT_NAMESPACES`

/// Well-known namespace URIs
pub mod ns {
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
    pub const XMLNS: &str = "http://www.w3.org/2000/xmlns/";
}

/// Bindings in effect before any element is opened
pub const DEFAULT_NAMESPACES: &[(&str, Option<&str>)] = &[
    ("", None),
    ("xml", Some(ns::XML)),
    ("xmlns", Some(ns::XMLNS)),
];

/// Namespace binding (prefix -> URI)
#[derive(Debug, Clone)]
struct NsBinding {
    prefix: String,
    uri: Option<String>,
    depth: usize,
}

/// Stack-based namespace context
#[derive(Debug, Clone)]
pub struct NamespaceContext {
    /// Baseline bindings followed by per-element bindings, innermost last
    bindings: Vec<NsBinding>,
    /// Number of pushed frames
    depth: usize,
}

impl Default for NamespaceContext {
    fn default() -> Self {
        Self::new(std::iter::empty::<(&str, &str)>())
    }
}

impl NamespaceContext {
    /// Create a context with a baseline frame of extra prefix bindings
    pub fn new<I, P, U>(baseline: I) -> Self
    where
        I: IntoIterator<Item = (P, U)>,
        P: AsRef<str>,
        U: AsRef<str>,
    {
        let mut context = NamespaceContext {
            bindings: Vec::with_capacity(16),
            depth: 0,
        };
        for (prefix, uri) in baseline {
            let uri = uri.as_ref();
            context.declare(prefix.as_ref(), (!uri.is_empty()).then_some(uri));
        }
        context
    }

    /// Enter an element scope with the declarations made on that element
    pub fn push(&mut self, frame: &[(String, Option<String>)]) {
        self.depth += 1;
        for (prefix, uri) in frame {
            self.declare(prefix, uri.as_deref());
        }
    }

    /// Leave the innermost element scope. Returns false if no scope was open.
    pub fn pop(&mut self) -> bool {
        if self.depth == 0 {
            return false;
        }
        while let Some(binding) = self.bindings.last() {
            if binding.depth < self.depth {
                break;
            }
            self.bindings.pop();
        }
        self.depth -= 1;
        true
    }

    fn declare(&mut self, prefix: &str, uri: Option<&str>) {
        // Don't allow redeclaring xml or xmlns
        if prefix == "xml" || prefix == "xmlns" {
            return;
        }
        // Only the default namespace can be undeclared
        if uri.is_none() && !prefix.is_empty() {
            return;
        }
        self.bindings.push(NsBinding {
            prefix: prefix.to_string(),
            uri: uri.map(str::to_string),
            depth: self.depth,
        });
    }

    /// Resolve a prefix (empty for the default namespace).
    ///
    /// `None` means the prefix is unbound; `Some(None)` means it is bound
    /// to no namespace.
    pub fn location(&self, prefix: &str) -> Option<Option<&str>> {
        // Search from most recent to oldest
        if let Some(binding) = self.bindings.iter().rev().find(|b| b.prefix == prefix) {
            return Some(binding.uri.as_deref());
        }
        DEFAULT_NAMESPACES
            .iter()
            .find(|(p, _)| *p == prefix)
            .map(|(_, uri)| *uri)
    }

    /// Number of open element scopes
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }
}
