//! Types a generated type depends on, and whether their headers can be
//! included.

use std::fmt;

use objlower_core::{TypeBinding, TypeHash};
use rustc_hash::FxHashSet;

use crate::HeaderMap;

/// A dependency on another type.
///
/// Ordered by type name, so sets of imports print in a stable order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Import {
    /// Target-language name of the type.
    pub type_name: String,
    /// Header declaring the type.
    pub import_file_name: String,
    pub is_interface: bool,
    /// Declared in the same generation unit as the importing type.
    pub is_local: bool,
    pub hash: TypeHash,
}

impl Import {
    pub fn new(binding: &TypeBinding, headers: &HeaderMap, is_local: bool) -> Self {
        Self {
            type_name: binding.full_name(),
            import_file_name: headers.header_for(&binding.name),
            is_interface: binding.is_interface(),
            is_local,
            hash: binding.hash,
        }
    }

    /// `@class T;` or `@protocol T;`
    pub fn forward_declaration(&self) -> String {
        if self.is_interface {
            format!("@protocol {};", self.type_name)
        } else {
            format!("@class {};", self.type_name)
        }
    }
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.type_name, self.import_file_name)
    }
}

/// Decides whether a header can be included.
pub trait ImportPolicy: Send + Sync {
    fn can_import(&self, header: &str) -> bool;
}

/// Every header is importable except those explicitly blocked.
#[derive(Debug, Clone, Default)]
pub struct StandardImportPolicy {
    blocked: FxHashSet<String>,
}

impl StandardImportPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block(mut self, header: impl Into<String>) -> Self {
        self.blocked.insert(header.into());
        self
    }
}

impl ImportPolicy for StandardImportPolicy {
    fn can_import(&self, header: &str) -> bool {
        !header.is_empty() && !self.blocked.contains(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use objlower_core::QualifiedName;

    #[test]
    fn forward_declaration_kind() {
        let headers = HeaderMap::new();
        let class = TypeBinding::class(QualifiedName::from_dotted("com.foo.B"));
        let protocol = TypeBinding::interface(QualifiedName::from_dotted("com.foo.P"));
        assert_eq!(
            Import::new(&class, &headers, false).forward_declaration(),
            "@class ComFooB;"
        );
        let import = Import::new(&protocol, &headers, true);
        assert_eq!(import.forward_declaration(), "@protocol ComFooP;");
        assert_eq!(import.import_file_name, "com/foo/P.h");
        assert!(import.is_local);
    }

    #[test]
    fn imports_order_by_type_name() {
        let headers = HeaderMap::new();
        let b = Import::new(&TypeBinding::class(QualifiedName::global("B")), &headers, false);
        let a = Import::new(&TypeBinding::class(QualifiedName::global("A")), &headers, false);
        let mut imports = vec![b.clone(), a.clone()];
        imports.sort();
        assert_eq!(imports, vec![a, b]);
    }

    #[test]
    fn blocked_headers() {
        let policy = StandardImportPolicy::new().block("legacy/Old.h");
        assert!(policy.can_import("com/foo/B.h"));
        assert!(!policy.can_import("legacy/Old.h"));
        assert!(!policy.can_import(""));
    }
}
