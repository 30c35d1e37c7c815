//! Integration tests for generated text: dependency resolution, the string
//! pool, static state and the memory-management prologue.

mod common;

use common::{int, method_ref};
use objlower::{
    MemoryManagement, Modifiers, NodeId, Options, QualifiedName, SourceInput, Span,
    SymbolEnvironment, TranslationOutput, Translator, Tree, TypeBinding, TypeHash, TypeRef, VarId,
    VariableBinding, Visibility,
};
use objlower_ast::{AssignOp, Literal};

/// Types `com.gen.T1` (public), `T2` and `T3` (private) and the external
/// `org.ext.T4`.
struct Types {
    env: SymbolEnvironment,
    t1: TypeHash,
    t2: TypeHash,
    t3: TypeHash,
    t4: TypeHash,
    value: VarId,
    /// Locals of each type, in `[T1, T2, T3, T4]` order.
    locals: [VarId; 4],
}

impl Types {
    fn new() -> Self {
        let mut env = SymbolEnvironment::new();
        let t1 = env
            .register_type(TypeBinding::class(QualifiedName::from_dotted("com.gen.T1")))
            .unwrap();
        let t2 = env
            .register_type(
                TypeBinding::class(QualifiedName::from_dotted("com.gen.T2"))
                    .with_visibility(Visibility::Package),
            )
            .unwrap();
        let t3 = env
            .register_type(
                TypeBinding::class(QualifiedName::from_dotted("com.gen.T3"))
                    .with_visibility(Visibility::Private),
            )
            .unwrap();
        let t4 = env
            .register_type(TypeBinding::class(QualifiedName::from_dotted("org.ext.T4")))
            .unwrap();
        let value = env
            .add_variable(VariableBinding::field(t4, "VALUE", int()).with_static())
            .unwrap();
        let locals = [t1, t2, t3, t4].map(|ty| {
            env.add_variable(VariableBinding::local("v", TypeRef::Declared(ty)))
                .unwrap()
        });
        Self {
            env,
            t1,
            t2,
            t3,
            t4,
            value,
            locals,
        }
    }

    fn local_of(&self, tree: &mut Tree, index: usize) -> NodeId {
        tree.local_variable(self.locals[index], None, Span::default())
    }

    /// Type `ty` with one method declaring locals of the types at `uses`.
    fn type_using(&self, tree: &mut Tree, ty: TypeHash, uses: &[usize]) -> NodeId {
        let mut statements: Vec<NodeId> = uses.iter().map(|&i| self.local_of(tree, i)).collect();
        if ty == self.t1 {
            let qualifier = tree.type_name("T4", self.t4, Span::default());
            let name = tree.variable_name("VALUE", self.value, Span::default());
            let read = tree.qualified_name(qualifier, name);
            statements.push(tree.expression_statement(read));
        }
        let body = tree.block(statements);
        let method = tree.method_decl(
            method_ref(ty, "run"),
            Vec::new(),
            Some(body),
            Span::default(),
        );
        tree.type_decl(ty, vec![method], Span::default())
    }

    /// One input declaring T1, T2 and T3 in the given order.
    fn input(&self, order: &[TypeHash]) -> SourceInput {
        let mut tree = Tree::new();
        let decls = order
            .iter()
            .map(|&ty| {
                let uses: &[usize] = if ty == self.t1 {
                    &[2, 1, 3]
                } else if ty == self.t2 {
                    &[2]
                } else {
                    &[0]
                };
                self.type_using(&mut tree, ty, uses)
            })
            .collect();
        tree.compilation_unit("com/gen/T1.java", decls, Vec::new());
        SourceInput::new("com/gen/T1.java", tree)
    }

    fn translate(&self, order: &[TypeHash]) -> TranslationOutput {
        Translator::new(Options::default(), &self.env).translate(vec![self.input(order)])
    }
}

fn implementation(output: &TranslationOutput) -> &str {
    assert!(output.is_success(), "{:?}", output.failures);
    &output.outputs[0].implementation
}

// =============================================================================
// Dependency Resolution
// =============================================================================

#[test]
fn test_includes_and_forward_declarations_are_minimal() {
    let types = Types::new();
    let output = types.translate(&[types.t1, types.t2, types.t3]);
    let text = implementation(&output);

    assert!(text.contains(
        "#include \"J2ObjC_source.h\"\n#include \"com/gen/T1.h\"\n#include \"org/ext/T4.h\"\n"
    ));
    assert!(text.contains("\n@class ComGenT2;\n@class ComGenT3;\n"));
    assert!(!text.contains("@class ComGenT1;"));
    assert!(!text.contains("@class OrgExtT4;"));
    assert_eq!(text.matches("@class ").count(), 2);
}

#[test]
fn test_types_emitted_earlier_are_not_forward_declared() {
    let types = Types::new();
    let output = types.translate(&[types.t3, types.t2, types.t1]);
    let text = implementation(&output);

    assert!(!text.contains("@class "));
    assert!(text.contains("#include \"org/ext/T4.h\"\n"));
}

#[test]
fn test_output_is_deterministic() {
    let types = Types::new();
    let first = types.translate(&[types.t1, types.t2, types.t3]);
    let second = types.translate(&[types.t1, types.t2, types.t3]);
    assert_eq!(first.outputs, second.outputs);
}

#[test]
fn test_header_declares_public_types_only() {
    let types = Types::new();
    let output = types.translate(&[types.t1, types.t2, types.t3]);
    let header = &output.outputs[0].header;

    assert!(header.contains("#ifndef com_gen_T1_H\n#define com_gen_T1_H\n"));
    assert!(header.contains("#include \"J2ObjC_header.h\"\n"));
    assert!(header.contains("@interface ComGenT1 : NSObject\n"));
    assert!(!header.contains("ComGenT2"));
    assert!(!header.contains("ComGenT3"));
}

// =============================================================================
// String Pool
// =============================================================================

#[test]
fn test_repeated_literal_shares_one_slot() {
    let mut env = SymbolEnvironment::new();
    let ty = env
        .register_type(TypeBinding::class(QualifiedName::from_dotted("com.gen.S")))
        .unwrap();
    let s = env
        .add_variable(VariableBinding::local("s", TypeRef::Id))
        .unwrap();

    let mut tree = Tree::new();
    let statements = (0..3)
        .map(|_| {
            let target = tree.variable_name("s", s, Span::default());
            let value = tree.literal(Literal::String("ok".into()), Span::default());
            let assign = tree.assignment(AssignOp::Assign, target, value);
            tree.expression_statement(assign)
        })
        .collect();
    let body = tree.block(statements);
    let method = tree.method_decl(
        method_ref(ty, "greet"),
        Vec::new(),
        Some(body),
        Span::default(),
    );
    let decl = tree.type_decl(ty, vec![method], Span::default());
    tree.compilation_unit("com/gen/S.java", vec![decl], Vec::new());

    let output = Translator::new(Options::default(), &env)
        .translate(vec![SourceInput::new("com/gen/S.java", tree)]);
    let text = implementation(&output);

    assert_eq!(text.matches("static NSString *_string_0;").count(), 1);
    assert_eq!(
        text.matches("_string_0 = JreStringConstant(@\"ok\");").count(),
        1
    );
    assert!(!text.contains("_string_1"));
    assert_eq!(text.matches("  s = _string_0;\n").count(), 3);
    assert!(output
        .diagnostics
        .iter()
        .any(|d| d.message == "pooled 1 string constant(s)"));
}

// =============================================================================
// Static State
// =============================================================================

fn static_state_output(options: Options) -> TranslationOutput {
    let mut env = SymbolEnvironment::new();
    let ty = env
        .register_type(TypeBinding::class(QualifiedName::from_dotted("com.gen.Holder")))
        .unwrap();
    let count = env
        .add_variable(VariableBinding::field(ty, "count", int()).with_static())
        .unwrap();
    let label = env
        .add_variable(VariableBinding::field(ty, "label", TypeRef::Id).with_static())
        .unwrap();

    let mut tree = Tree::new();
    let seven = tree.int_literal(7);
    let count_decl = tree.field_decl(count, Some(seven), Span::default());
    let label_decl = tree.field_decl(label, None, Span::default());
    let decl = tree.type_decl(ty, vec![count_decl, label_decl], Span::default());
    tree.compilation_unit("com/gen/Holder.java", vec![decl], Vec::new());

    Translator::new(options, &env).translate(vec![SourceInput::new("com/gen/Holder.java", tree)])
}

#[test]
fn test_static_fields_get_storage_initializer_and_accessors() {
    let output = static_state_output(Options::default());
    let text = implementation(&output);

    assert!(text.contains("jint ComGenHolder_count;\n"));
    assert!(text.contains("static _Atomic(jboolean) ComGenHolder__initialized;\n"));
    assert!(text.contains("static _Thread_local jboolean ComGenHolder__initializing;\n"));
    assert!(text.contains("static void ComGenHolder_clinit(void) {\n  ComGenHolder_count = 7;\n}\n"));
    assert!(text.contains("void ComGenHolder_initialize(void) {\n"));
    assert!(text.contains("dispatch_once(&once, ^{"));
    assert!(text.contains(
        "jint ComGenHolder_get_count(void) {\n  ComGenHolder_initialize();\n  return ComGenHolder_count;\n}\n"
    ));
    assert!(text.contains(
        "jint *ComGenHolder_getRef_count(void) {\n  ComGenHolder_initialize();\n  return &ComGenHolder_count;\n}\n"
    ));
    assert!(text.contains("return JreStrongAssign(&ComGenHolder_label, value);"));
    assert!(!text.contains("ComGenHolder_set_count"));

    let header = &output.outputs[0].header;
    assert!(header.contains("FOUNDATION_EXPORT jint ComGenHolder_count;"));
    assert!(header.contains("FOUNDATION_EXPORT id ComGenHolder_set_label(id value);"));
    assert!(header.contains("FOUNDATION_EXPORT void ComGenHolder_initialize(void);"));
}

#[test]
fn test_setter_assigns_directly_under_arc() {
    let output = static_state_output(
        Options::default().with_memory_management(MemoryManagement::Arc),
    );
    let text = implementation(&output);
    assert!(text.contains("return ComGenHolder_label = value;"));
    assert!(!text.contains("JreStrongAssign"));
}

// =============================================================================
// Memory Management and Pragmas
// =============================================================================

fn abstract_output(options: Options) -> TranslationOutput {
    let mut env = SymbolEnvironment::new();
    let protocol = env
        .register_type(TypeBinding::interface(QualifiedName::from_dotted("com.gen.Shape")))
        .unwrap();
    let ty = env
        .register_type(
            TypeBinding::class(QualifiedName::from_dotted("com.gen.Base"))
                .with_modifiers(Modifiers::ABSTRACT)
                .with_interface(protocol),
        )
        .unwrap();
    let mut tree = Tree::new();
    let decl = tree.type_decl(ty, Vec::new(), Span::default());
    tree.compilation_unit("com/gen/Base.java", vec![decl], Vec::new());
    Translator::new(options, &env).translate(vec![SourceInput::new("com/gen/Base.java", tree)])
}

#[test]
fn test_memory_management_prologue_per_mode() {
    let manual = abstract_output(Options::default());
    assert!(implementation(&manual).contains(
        "#if !J2OBJC_USE_GC && __has_feature(objc_arc)\n#error \"com/gen/Base must not be compiled with ARC (-fobjc-arc)\"\n#endif\n"
    ));

    let arc = abstract_output(Options::default().with_memory_management(MemoryManagement::Arc));
    assert!(implementation(&arc).contains(
        "#if !__has_feature(objc_arc)\n#error \"com/gen/Base must be compiled with ARC (-fobjc-arc)\"\n#endif\n"
    ));

    let gc = abstract_output(Options::default().with_memory_management(MemoryManagement::Gc));
    assert!(!implementation(&gc).contains("#error"));

    let legacy = abstract_output(Options::default().with_legacy_gc(true));
    assert!(!implementation(&legacy).contains("#error"));
}

#[test]
fn test_abstract_type_with_protocol_suppresses_both_warnings() {
    let output = abstract_output(Options::default());
    let text = implementation(&output);
    assert!(text.contains(
        "\n#pragma clang diagnostic ignored \"-Wprotocol\"\n#pragma clang diagnostic ignored \"-Wincomplete-implementation\"\n"
    ));
    let pop = text.find("#pragma clang diagnostic pop").unwrap();
    let push = text.find("#pragma clang diagnostic push").unwrap();
    assert!(push < pop);
    assert!(output.outputs[0].header.contains("@interface ComGenBase : NSObject <ComGenShape>"));
}
