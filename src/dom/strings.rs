//! String Interning Pool
//!
//! Deduplicated storage for element names, prefixes, namespace URIs and
//! doctype identifiers. Character data is not interned.
//!
//! Uses hash-based lookup to avoid storing duplicate string data.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// String interning pool
///
/// ID 0 is reserved for the empty string, which doubles as "absent"
/// for prefixes and namespace URIs.
#[derive(Debug, Clone)]
pub struct StringPool {
    /// Strings indexed by ID
    entries: Vec<Box<str>>,
    /// Hash of string content -> list of IDs with that hash
    hash_index: HashMap<u64, Vec<u32>>,
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}

impl StringPool {
    /// Create a new pool holding only the empty string
    pub fn new() -> Self {
        let mut entries = Vec::with_capacity(64);
        entries.push(Box::from(""));
        StringPool {
            entries,
            hash_index: HashMap::new(),
        }
    }

    /// Compute hash of a string
    #[inline]
    fn compute_hash(s: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        s.hash(&mut hasher);
        hasher.finish()
    }

    /// Intern a string, returning its ID
    pub fn intern(&mut self, s: &str) -> u32 {
        if s.is_empty() {
            return 0;
        }

        let hash = Self::compute_hash(s);
        if let Some(ids) = self.hash_index.get(&hash) {
            for &id in ids {
                if &*self.entries[id as usize] == s {
                    return id;
                }
            }
        }

        let id = self.entries.len() as u32;
        self.entries.push(Box::from(s));
        self.hash_index.entry(hash).or_default().push(id);
        id
    }

    /// Intern an optional string; `None` maps to ID 0
    #[inline]
    pub fn intern_opt(&mut self, s: Option<&str>) -> u32 {
        s.map_or(0, |s| self.intern(s))
    }

    /// Look up a string ID without interning
    pub fn find(&self, s: &str) -> Option<u32> {
        if s.is_empty() {
            return Some(0);
        }
        self.hash_index
            .get(&Self::compute_hash(s))?
            .iter()
            .copied()
            .find(|&id| &*self.entries[id as usize] == s)
    }

    /// Get string by ID
    #[inline]
    pub fn get_str(&self, id: u32) -> Option<&str> {
        self.entries.get(id as usize).map(|s| &**s)
    }

    /// Get string by ID, treating ID 0 as absent
    #[inline]
    pub fn get_opt(&self, id: u32) -> Option<&str> {
        if id == 0 {
            None
        } else {
            self.get_str(id)
        }
    }

    /// Number of interned strings, including the reserved empty string
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when only the reserved empty string is present
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.len() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_dedupes() {
        let mut pool = StringPool::new();
        let a = pool.intern("root");
        let b = pool.intern("child");
        assert_ne!(a, b);
        assert_eq!(pool.intern("root"), a);
        assert_eq!(pool.get_str(a), Some("root"));
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_empty_is_zero() {
        let mut pool = StringPool::new();
        assert!(pool.is_empty());
        assert_eq!(pool.intern(""), 0);
        assert_eq!(pool.intern_opt(None), 0);
        assert_eq!(pool.get_str(0), Some(""));
        assert_eq!(pool.get_opt(0), None);
    }

    #[test]
    fn test_find() {
        let mut pool = StringPool::new();
        let id = pool.intern("http://example.com");
        assert_eq!(pool.find("http://example.com"), Some(id));
        assert_eq!(pool.find("missing"), None);
        assert_eq!(pool.get_opt(id), Some("http://example.com"));
    }
}
