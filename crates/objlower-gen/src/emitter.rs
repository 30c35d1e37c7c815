//! Unit Emitter - the text of a unit's implementation and declaration
//! files.
//!
//! The implementation file is emitted in a fixed order:
//!
//! 1. File banner
//! 2. Sorted includes, native blocks and forward declarations
//! 3. Memory-management assertion
//! 4. Incomplete protocol / implementation pragmas
//! 5. Deprecation warnings suppressed from here on
//! 6. String pool and its initializer
//! 7. Every type's private declaration, then every type's implementation
//! 8. Deprecation suppression closed

use std::collections::BTreeSet;

use objlower_core::{MemoryManagement, Options};

use crate::{DependencyResolver, GenerationUnit, ImportPolicy};

/// Both output texts of a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedUnit {
    /// Declaration file text.
    pub header: String,
    /// Implementation file text.
    pub implementation: String,
    /// Headers left out of either file because they cannot be imported.
    pub unimportable: BTreeSet<String>,
}

pub struct UnitEmitter<'a> {
    unit: &'a GenerationUnit,
    options: &'a Options,
    resolver: DependencyResolver<'a>,
}

impl<'a> UnitEmitter<'a> {
    pub fn new(unit: &'a GenerationUnit, options: &'a Options, policy: &'a dyn ImportPolicy) -> Self {
        Self {
            unit,
            options,
            resolver: DependencyResolver::new(&unit.types, policy),
        }
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn emit(&self) -> EmittedUnit {
        let (implementation, mut unimportable) = self.implementation();
        let (header, header_unimportable) = self.header();
        unimportable.extend(header_unimportable);
        EmittedUnit {
            header,
            implementation,
            unimportable,
        }
    }

    fn banner(&self) -> String {
        match &self.options.file_header {
            Some(header) if header.ends_with('\n') => header.clone(),
            Some(header) => format!("{header}\n"),
            None => format!(
                "//\n//  Generated by the objlower translator.  DO NOT EDIT!\n//  source: {}\n//\n",
                self.unit.source_name
            ),
        }
    }

    /// Implementation file text and the headers it could not include.
    pub fn implementation(&self) -> (String, BTreeSet<String>) {
        let deps = self.resolver.implementation(
            &self.options.runtime_source_header,
            &self.unit.header_path(),
        );

        let mut out = self.banner();
        out.push('\n');
        out.push_str(&deps.include_lines());
        for block in &self.unit.native_blocks {
            out.push_str(block);
            if !block.ends_with('\n') {
                out.push('\n');
            }
        }
        if !deps.forward_declarations.is_empty() {
            out.push('\n');
            out.push_str(&deps.forward_declaration_lines());
        }
        out.push('\n');

        out.push_str(&self.memory_management());
        out.push_str(&self.incomplete_pragmas());
        out.push_str("\n#pragma clang diagnostic push\n");
        out.push_str("#pragma clang diagnostic ignored \"-Wdeprecated-declarations\"\n");
        out.push_str(&self.unit.strings.declarations());
        for ty in &self.unit.types {
            out.push_str(&ty.private_declaration);
        }
        for ty in &self.unit.types {
            out.push_str(&ty.implementation);
        }
        out.push_str("\n#pragma clang diagnostic pop\n");
        (out, deps.unimportable)
    }

    /// Build-time assertion that the file is compiled with the memory model
    /// it was generated for. The message names the output path.
    pub fn memory_management(&self) -> String {
        let path = &self.unit.output_path;
        match self.options.memory_management {
            MemoryManagement::Gc => String::new(),
            MemoryManagement::Arc => format!(
                "#if !__has_feature(objc_arc)\n#error \"{path} must be compiled with ARC (-fobjc-arc)\"\n#endif\n"
            ),
            MemoryManagement::Manual if self.options.legacy_gc => String::new(),
            MemoryManagement::Manual => format!(
                "#if !J2OBJC_USE_GC && __has_feature(objc_arc)\n#error \"{path} must not be compiled with ARC (-fobjc-arc)\"\n#endif\n"
            ),
        }
    }

    fn incomplete_pragmas(&self) -> String {
        let mut out = String::new();
        if self.unit.has_incomplete_protocol || self.unit.has_incomplete_implementation {
            out.push('\n');
        }
        if self.unit.has_incomplete_protocol {
            out.push_str("#pragma clang diagnostic ignored \"-Wprotocol\"\n");
        }
        if self.unit.has_incomplete_implementation {
            out.push_str("#pragma clang diagnostic ignored \"-Wincomplete-implementation\"\n");
        }
        out
    }

    fn include_guard(&self) -> String {
        let mut guard: String = self
            .unit
            .output_path
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        guard.push_str("_H");
        guard
    }

    /// Declaration file text and the headers it could not include.
    pub fn header(&self) -> (String, BTreeSet<String>) {
        let deps = self.resolver.header(&self.options.runtime_header);
        let guard = self.include_guard();

        let mut out = self.banner();
        out.push_str(&format!("\n#ifndef {guard}\n#define {guard}\n\n"));
        out.push_str(&deps.include_lines());
        if !deps.forward_declarations.is_empty() {
            out.push('\n');
            out.push_str(&deps.forward_declaration_lines());
        }
        for ty in &self.unit.types {
            out.push_str(&ty.public_declaration);
        }
        out.push_str(&format!("\n#endif // {guard}\n"));
        (out, deps.unimportable)
    }
}
