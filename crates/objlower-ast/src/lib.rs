//! Arena tree for the lowering pipeline.
//!
//! ## Modules
//!
//! - [`node`]: Node kinds, literals and [`NodeId`]
//! - [`ops`]: Operators
//! - [`tree`]: The [`Tree`] arena with parent links and in-place replacement
//! - [`render`]: Target-language text for expressions, statements and types

mod builder;
pub mod node;
pub mod ops;
pub mod render;
pub mod tree;

pub use node::{Literal, Node, NodeId, NodeKind};
pub use ops::{AssignOp, BinaryOp, PostfixOp, UnaryOp};
pub use render::{
    Renderer, StringConstants, declaration, escape_string, string_literal, type_name,
    variable_name,
};
pub use tree::Tree;
