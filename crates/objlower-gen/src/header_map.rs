//! Which header declares a type.

use objlower_core::QualifiedName;
use rustc_hash::FxHashMap;

/// Header paths of translated types.
///
/// Types are looked up by their outermost enclosing type; types without an
/// explicit mapping live in the header named after their package directory
/// and outermost type (`com/foo/Bar.h`).
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    mapping: FxHashMap<String, String>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map the dotted name of a top-level type to a header path.
    pub fn put(&mut self, qualified_name: impl Into<String>, header: impl Into<String>) {
        self.mapping.insert(qualified_name.into(), header.into());
    }

    /// Header declaring `name`.
    pub fn header_for(&self, name: &QualifiedName) -> String {
        let outer = name.outermost();
        self.mapping
            .get(&outer.to_string())
            .cloned()
            .unwrap_or_else(|| outer.default_header())
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.mapping.contains_key(qualified_name)
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}
