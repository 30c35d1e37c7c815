//! Source-to-source lowering of a resolved, class-based object language
//! into Objective-C.
//!
//! The front end hands over one [`Tree`] per input file together with a
//! read-only [`SymbolEnvironment`]. The [`Translator`] then runs the
//! rewrite passes, groups the rewritten types into generation units and
//! emits a declaration and an implementation file per unit.
//!
//! ## Crates
//!
//! - [`objlower_core`]: Bindings, options, errors and diagnostics
//! - [`objlower_ast`]: The lowering tree and its renderer
//! - [`objlower_passes`]: Rewrite-pass framework and the static-access pass
//! - [`objlower_gen`]: Partitioning, dependency resolution and emission
//!
//! ## Example
//!
//! ```
//! use objlower::{
//!     QualifiedName, SourceInput, Span, SymbolEnvironment, Translator, Tree, TypeBinding,
//!     Options,
//! };
//!
//! let mut env = SymbolEnvironment::new();
//! let counter = env
//!     .register_type(TypeBinding::class(QualifiedName::from_dotted("com.example.Counter")))
//!     .unwrap();
//!
//! let mut tree = Tree::new();
//! let decl = tree.type_decl(counter, Vec::new(), Span::default());
//! tree.compilation_unit("com/example/Counter.java", vec![decl], Vec::new());
//!
//! let translator = Translator::new(Options::default(), &env);
//! let output = translator.translate(vec![SourceInput::new("com/example/Counter.java", tree)]);
//!
//! let unit = output.output("com/example/Counter").unwrap();
//! assert!(unit.header.contains("@interface ComExampleCounter : NSObject"));
//! assert!(unit.implementation.contains("@implementation ComExampleCounter"));
//! ```

pub mod preprocess;
pub mod translator;

pub use translator::{GeneratedOutput, SourceInput, TranslationOutput, Translator};

pub use objlower_ast::{NodeId, NodeKind, Tree};
pub use objlower_core::{
    AstError, Binding, ConstantValue, Diagnostic, DiagnosticKind, Diagnostics, FunctionRef,
    GenerationError, HeaderMapping, MemoryManagement, MethodRef, Modifiers, Options, PassError,
    PrimitiveKind, QualifiedName, Span, SymbolEnvironment, TranslateError, TypeBinding, TypeHash,
    TypeRef, UnitFailure, UnitGrouping, VarId, VariableBinding, Visibility,
};
pub use objlower_gen::{ImportPolicy, StandardImportPolicy};
pub use objlower_passes::{Pass, PassPipeline, StaticAccessPass};
