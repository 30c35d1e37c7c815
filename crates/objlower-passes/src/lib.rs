//! Rewrite passes over the lowering tree.
//!
//! ## Modules
//!
//! - [`visitor`]: Pre-order traversal with pruning
//! - [`pass`]: The [`Pass`] trait and the ordered [`PassPipeline`]
//! - [`static_access`]: Cross-type static field access through accessors

pub mod pass;
pub mod static_access;
pub mod visitor;

pub use pass::{Pass, PassPipeline, PassRun};
pub use static_access::{StaticAccessPass, needs_accessor};
pub use visitor::{Descend, TreeVisitor, walk};
