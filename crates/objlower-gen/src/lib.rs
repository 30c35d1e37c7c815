//! Code generation for rewritten trees.
//!
//! Rewritten compilation units are grouped into generation units, each
//! emitted as one declaration file and one implementation file.
//!
//! ## Modules
//!
//! - [`partition`]: Unit planning and supertype-first type ordering
//! - [`type_gen`]: Per-type declaration and implementation text
//! - [`unit`]: The [`GenerationUnit`] of one output pair
//! - [`resolver`]: Minimal includes and forward declarations
//! - [`emitter`]: Output file text
//! - [`string_pool`]: Per-unit string constants
//! - [`import`]: Type dependencies and import policy
//! - [`header_map`]: Header paths of translated types

pub mod emitter;
pub mod header_map;
pub mod import;
pub mod partition;
pub mod resolver;
pub mod string_pool;
pub mod type_gen;
pub mod unit;

pub use emitter::{EmittedUnit, UnitEmitter};
pub use header_map::HeaderMap;
pub use import::{Import, ImportPolicy, StandardImportPolicy};
pub use partition::{UnitPlan, file_stem, order_types, plan_units, strip_extension};
pub use resolver::{DependencyResolver, ResolvedDependencies};
pub use string_pool::StringPool;
pub use type_gen::{GeneratedType, TypeContext};
pub use unit::GenerationUnit;
