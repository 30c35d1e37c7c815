//! Dependency Resolver - decide which headers a unit includes and which
//! types it only forward-declares.
//!
//! ## Rules
//!
//! - Includes start from the runtime umbrella header and the unit's own
//!   header, plus the importable headers of every non-local type a
//!   generated type fully uses. Local types never need an include.
//! - In the implementation file, a local type is forward-declared only
//!   when it is private and has not been emitted yet in emission order.
//!   Public local types are already declared by the unit's own header.
//! - In the declaration file, which only holds public types, a local type
//!   is forward-declared when it has not been emitted yet.
//! - A non-local type is forward-declared only when no include covers its
//!   header.
//!
//! Both results are sets; their iteration order is lexicographic, so the
//! output does not depend on how the unit's types were collected.

use std::collections::BTreeSet;

use objlower_core::TypeHash;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{GeneratedType, Import, ImportPolicy};

/// Includes and forward declarations of one output file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedDependencies {
    /// Header paths, sorted.
    pub includes: BTreeSet<String>,
    /// Types to announce with `@class`/`@protocol`, sorted by name.
    pub forward_declarations: BTreeSet<Import>,
    /// Headers of non-local types that could not be included.
    pub unimportable: BTreeSet<String>,
}

impl ResolvedDependencies {
    /// `#include "..."` lines.
    pub fn include_lines(&self) -> String {
        self.includes
            .iter()
            .map(|header| format!("#include \"{header}\"\n"))
            .collect()
    }

    /// `@class`/`@protocol` lines.
    pub fn forward_declaration_lines(&self) -> String {
        self.forward_declarations
            .iter()
            .map(|import| format!("{}\n", import.forward_declaration()))
            .collect()
    }
}

/// Resolves dependencies for the types of one unit in emission order.
pub struct DependencyResolver<'a> {
    types: &'a [GeneratedType],
    policy: &'a dyn ImportPolicy,
    /// Privacy of each local type.
    private: FxHashMap<TypeHash, bool>,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(types: &'a [GeneratedType], policy: &'a dyn ImportPolicy) -> Self {
        let private = types.iter().map(|ty| (ty.hash, ty.is_private)).collect();
        Self {
            types,
            policy,
            private,
        }
    }

    /// Dependencies of the implementation file.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn implementation(&self, runtime_header: &str, own_header: &str) -> ResolvedDependencies {
        self.resolve(
            [runtime_header, own_header],
            |ty| &ty.implementation_includes,
            |ty| &ty.implementation_forward_declarations,
            |_| true,
            false,
        )
    }

    /// Dependencies of the declaration file. Only public types take part.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn header(&self, runtime_header: &str) -> ResolvedDependencies {
        self.resolve(
            [runtime_header],
            |ty| &ty.header_includes,
            |ty| &ty.header_forward_declarations,
            |ty| !ty.is_private,
            true,
        )
    }

    fn resolve<const N: usize>(
        &self,
        fixed: [&str; N],
        includes_of: impl Fn(&GeneratedType) -> &BTreeSet<Import>,
        forwards_of: impl Fn(&GeneratedType) -> &BTreeSet<Import>,
        participates: impl Fn(&GeneratedType) -> bool,
        declare_public_locals: bool,
    ) -> ResolvedDependencies {
        let mut resolved = ResolvedDependencies::default();
        resolved.includes.extend(fixed.iter().map(|h| h.to_string()));

        for ty in self.types.iter().filter(|ty| participates(ty)) {
            for import in includes_of(ty) {
                if self.is_local(import) {
                    continue;
                }
                if self.policy.can_import(&import.import_file_name) {
                    resolved.includes.insert(import.import_file_name.clone());
                } else {
                    resolved.unimportable.insert(import.import_file_name.clone());
                }
            }
        }

        let mut seen = FxHashSet::default();
        for ty in self.types.iter().filter(|ty| participates(ty)) {
            seen.insert(ty.hash);
            for import in forwards_of(ty) {
                let declare = match self.private.get(&import.hash) {
                    Some(&is_private) => {
                        (is_private || declare_public_locals) && !seen.contains(&import.hash)
                    }
                    None => !resolved.includes.contains(&import.import_file_name),
                };
                if declare {
                    resolved.forward_declarations.insert(import.clone());
                }
            }
        }
        resolved
    }

    fn is_local(&self, import: &Import) -> bool {
        self.private.contains_key(&import.hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StandardImportPolicy;

    fn import(name: &str, header: &str, is_local: bool) -> Import {
        Import {
            type_name: name.to_string(),
            import_file_name: header.to_string(),
            is_interface: false,
            is_local,
            hash: TypeHash::from_name(name),
        }
    }

    fn generated(name: &str, is_private: bool) -> GeneratedType {
        GeneratedType {
            hash: TypeHash::from_name(name),
            type_name: name.to_string(),
            is_private,
            is_interface: false,
            is_abstract: false,
            has_protocols: false,
            supertypes: Vec::new(),
            public_declaration: String::new(),
            private_declaration: String::new(),
            implementation: String::new(),
            implementation_includes: BTreeSet::new(),
            implementation_forward_declarations: BTreeSet::new(),
            header_includes: BTreeSet::new(),
            header_forward_declarations: BTreeSet::new(),
        }
    }

    #[test]
    fn local_types_are_never_included() {
        let mut a = generated("A", false);
        a.implementation_includes.insert(import("B", "B.h", true));
        a.implementation_includes.insert(import("Ext", "ext/Ext.h", false));
        let types = vec![a, generated("B", true)];

        let policy = StandardImportPolicy::new();
        let deps = DependencyResolver::new(&types, &policy).implementation("J2ObjC_source.h", "A.h");
        let includes: Vec<_> = deps.includes.iter().map(String::as_str).collect();
        assert_eq!(includes, vec!["A.h", "J2ObjC_source.h", "ext/Ext.h"]);
        assert!(deps.forward_declarations.is_empty());
    }

    #[test]
    fn private_local_declared_only_before_its_definition() {
        let mut a = generated("A", false);
        a.implementation_forward_declarations.insert(import("B", "B.h", true));
        let mut b = generated("B", true);
        b.implementation_forward_declarations.insert(import("A", "A.h", true));
        let mut c = generated("C", false);
        c.implementation_forward_declarations.insert(import("B", "B.h", true));
        let types = vec![a, b, c];

        let policy = StandardImportPolicy::new();
        let deps = DependencyResolver::new(&types, &policy).implementation("J2ObjC_source.h", "A.h");
        let names: Vec<_> = deps.forward_declarations.iter().map(|i| i.type_name.as_str()).collect();
        assert_eq!(names, vec!["B"]);
    }

    #[test]
    fn included_types_are_not_forward_declared() {
        let mut a = generated("A", false);
        a.implementation_includes.insert(import("Ext", "ext/Ext.h", false));
        a.implementation_forward_declarations.insert(import("Ext", "ext/Ext.h", false));
        a.implementation_forward_declarations.insert(import("Other", "ext/Other.h", false));
        let types = vec![a];

        let policy = StandardImportPolicy::new();
        let deps = DependencyResolver::new(&types, &policy).implementation("J2ObjC_source.h", "A.h");
        assert_eq!(deps.forward_declaration_lines(), "@class Other;\n");
    }

    #[test]
    fn unimportable_headers_are_reported() {
        let mut a = generated("A", false);
        a.implementation_includes.insert(import("Old", "legacy/Old.h", false));
        a.implementation_forward_declarations.insert(import("Old", "legacy/Old.h", false));
        let types = vec![a];

        let policy = StandardImportPolicy::new().block("legacy/Old.h");
        let deps = DependencyResolver::new(&types, &policy).implementation("J2ObjC_source.h", "A.h");
        assert!(!deps.includes.contains("legacy/Old.h"));
        assert!(deps.unimportable.contains("legacy/Old.h"));
        assert_eq!(deps.forward_declaration_lines(), "@class Old;\n");
    }

    #[test]
    fn header_declares_later_public_types() {
        let mut a = generated("A", false);
        a.header_forward_declarations.insert(import("C", "A.h", true));
        let mut c = generated("C", false);
        c.header_forward_declarations.insert(import("A", "A.h", true));
        c.header_includes.insert(import("Base", "base/Base.h", false));
        let types = vec![a, c];

        let policy = StandardImportPolicy::new();
        let deps = DependencyResolver::new(&types, &policy).header("J2ObjC_header.h");
        assert_eq!(deps.include_lines(), "#include \"J2ObjC_header.h\"\n#include \"base/Base.h\"\n");
        assert_eq!(deps.forward_declaration_lines(), "@class C;\n");
    }
}
