//! Core types shared by every stage of the lowering pipeline.
//!
//! ## Modules
//!
//! - [`binding`]: Resolved type and variable bindings
//! - [`diagnostics`]: Per-unit diagnostic collection
//! - [`env`]: Read-only symbol environment
//! - [`error`]: Error types for every stage
//! - [`mangle`]: Names of synthesized accessors and storage
//! - [`options`]: Translation options
//! - [`qualified_name`]: Package-qualified type names
//! - [`span`]: Source locations
//! - [`type_hash`]: Deterministic type identity

pub mod binding;
pub mod diagnostics;
pub mod env;
pub mod error;
pub mod mangle;
pub mod options;
pub mod qualified_name;
pub mod span;
pub mod type_hash;

pub use binding::{
    Binding, ConstantValue, FunctionRef, MethodRef, Modifiers, PrimitiveKind, TypeBinding,
    TypeKind, TypeRef, VarId, VariableBinding, VariableKind, Visibility, double_literal,
    int_literal,
};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use env::SymbolEnvironment;
pub use error::{
    AstError, GenerationError, PassError, RegistrationError, TranslateError, UnitFailure,
};
pub use options::{HeaderMapping, MemoryManagement, Options, UnitGrouping};
pub use qualified_name::{QualifiedName, camel_case_package};
pub use span::Span;
pub use type_hash::TypeHash;
