//! Unified error types for the translator.
//!
//! ## Error Hierarchy
//!
//! ```text
//! TranslateError (top-level wrapper)
//! ├── RegistrationError - Building the symbol environment
//! ├── AstError          - Structural invariant violations in the tree
//! ├── PassError         - A rewrite pass failed
//! └── GenerationError   - Partitioning or type generation failed
//! ```
//!
//! Missing bindings and unimportable headers are not errors: the former
//! skip a rewrite, the latter are reported as warnings.

use thiserror::Error;

use crate::{Span, TypeHash};

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors that occur while populating the symbol environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A type with this name already exists.
    #[error("duplicate type: {0}")]
    DuplicateType(String),

    /// A field names a declaring type that was never registered.
    #[error("field '{variable}' declared by unknown type {owner}")]
    UnknownDeclaringType {
        /// The field name.
        variable: String,
        /// The unregistered owner.
        owner: TypeHash,
    },
}

// ============================================================================
// AST Errors
// ============================================================================

/// Structural invariant violations detected by tree operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AstError {
    /// The node has no parent, so it cannot be replaced in place.
    #[error("at {span}: node #{node} is detached and cannot be replaced")]
    DetachedNode { node: u32, span: Span },

    /// The node's parent does not hold it in any child slot.
    #[error("at {span}: node #{node} is not a child of its recorded parent #{parent}")]
    BrokenParentLink { node: u32, parent: u32, span: Span },

    /// A node of one kind was found where another kind is required.
    #[error("at {span}: expected {expected}, found {found}")]
    UnexpectedNode {
        expected: &'static str,
        found: &'static str,
        span: Span,
    },

    /// A node index outside the arena.
    #[error("node #{node} does not exist")]
    InvalidNode { node: u32 },
}

impl AstError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            AstError::DetachedNode { span, .. }
            | AstError::BrokenParentLink { span, .. }
            | AstError::UnexpectedNode { span, .. } => *span,
            AstError::InvalidNode { .. } => Span::default(),
        }
    }
}

// ============================================================================
// Pass Errors
// ============================================================================

/// A rewrite pass failed on one tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PassError {
    /// A tree operation hit a structural invariant violation.
    #[error("pass '{pass}': {source}")]
    Structural {
        pass: &'static str,
        #[source]
        source: AstError,
    },

    /// A pass-specific failure.
    #[error("pass '{pass}' at {span}: {message}")]
    Failed {
        pass: &'static str,
        message: String,
        span: Span,
    },
}

impl PassError {
    /// Wrap a structural error raised while running `pass`.
    pub fn structural(pass: &'static str, source: AstError) -> Self {
        PassError::Structural { pass, source }
    }

    pub fn span(&self) -> Span {
        match self {
            PassError::Structural { source, .. } => source.span(),
            PassError::Failed { span, .. } => *span,
        }
    }
}

// ============================================================================
// Generation Errors
// ============================================================================

/// Errors that occur while building or ordering a generation unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Locally declared types extend each other in a cycle.
    #[error("at {span}: cyclic supertype chain through '{name}'")]
    CyclicSupertypes { name: String, span: Span },

    /// A declaration refers to a type the environment does not know.
    #[error("at {span}: unknown type {hash}")]
    UnknownType { hash: TypeHash, span: Span },

    /// A type declaration carries no type binding.
    #[error("at {span}: type declaration has no binding")]
    MissingTypeBinding { span: Span },

    /// The tree handed to the generator has an unexpected shape.
    #[error(transparent)]
    Structural(#[from] AstError),
}

impl GenerationError {
    pub fn span(&self) -> Span {
        match self {
            GenerationError::CyclicSupertypes { span, .. } => *span,
            GenerationError::UnknownType { span, .. } => *span,
            GenerationError::MissingTypeBinding { span } => *span,
            GenerationError::Structural(err) => err.span(),
        }
    }
}

// ============================================================================
// Top-level
// ============================================================================

/// Any error raised while translating a unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Ast(#[from] AstError),

    #[error(transparent)]
    Pass(#[from] PassError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl TranslateError {
    /// Source location of the offending node, if any.
    pub fn span(&self) -> Span {
        match self {
            TranslateError::Registration(_) => Span::default(),
            TranslateError::Ast(err) => err.span(),
            TranslateError::Pass(err) => err.span(),
            TranslateError::Generation(err) => err.span(),
        }
    }
}

/// A generation unit that was abandoned.
///
/// Sibling units are unaffected by the failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{unit}: {}", errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
pub struct UnitFailure {
    /// Source name of the abandoned unit.
    pub unit: String,
    /// Errors that caused the unit to be abandoned.
    pub errors: Vec<TranslateError>,
}
