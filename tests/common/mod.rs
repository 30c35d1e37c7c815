//! Shared fixture for the integration tests.
//!
//! Two types in `com.example`: the public `A` and the package-private `B`,
//! each with a handful of static fields, plus two locals. `B.HOLDER` holds an
//! `A`, whose instance field `inner` can be reached through it.

#![allow(dead_code)]

use objlower::{
    ConstantValue, MethodRef, NodeId, PrimitiveKind, QualifiedName, Span, SymbolEnvironment,
    Tree, TypeBinding, TypeHash, TypeRef, VarId, VariableBinding, Visibility,
};
use objlower_ast::Renderer;

pub fn int() -> TypeRef {
    TypeRef::Primitive(PrimitiveKind::Int)
}

pub fn void() -> TypeRef {
    TypeRef::Primitive(PrimitiveKind::Void)
}

/// Instance method `name` of `owner` returning void.
pub fn method_ref(owner: TypeHash, name: &str) -> MethodRef {
    MethodRef {
        name: name.to_string(),
        declaring_type: owner,
        return_type: void(),
        is_static: false,
    }
}

pub struct Fixture {
    pub env: SymbolEnvironment,
    pub a: TypeHash,
    pub b: TypeHash,
    /// `A.FLAG`: private static int.
    pub flag: VarId,
    /// `A.snapshot`: static int.
    pub snapshot: VarId,
    /// `B.COUNT`: static int.
    pub count: VarId,
    /// `B.MAX`: constant 10.
    pub max: VarId,
    /// `B.NAME`: static object.
    pub name: VarId,
    /// `B.mode`: static int.
    pub mode: VarId,
    /// Local `B other`.
    pub other: VarId,
    /// Local `int local`.
    pub local: VarId,
    /// `B.HOLDER`: static `A`.
    pub holder: VarId,
    /// `A.inner`: instance int.
    pub inner: VarId,
}

impl Fixture {
    pub fn new() -> Self {
        let mut env = SymbolEnvironment::new();
        let a = env
            .register_type(TypeBinding::class(QualifiedName::from_dotted("com.example.A")))
            .unwrap();
        let b = env
            .register_type(
                TypeBinding::class(QualifiedName::from_dotted("com.example.B"))
                    .with_visibility(Visibility::Package),
            )
            .unwrap();

        let flag = env
            .add_variable(
                VariableBinding::field(a, "FLAG", int())
                    .with_static()
                    .with_visibility(Visibility::Private),
            )
            .unwrap();
        let snapshot = env
            .add_variable(VariableBinding::field(a, "snapshot", int()).with_static())
            .unwrap();
        let count = env
            .add_variable(VariableBinding::field(b, "COUNT", int()).with_static())
            .unwrap();
        let max = env
            .add_variable(
                VariableBinding::field(b, "MAX", int()).with_constant(ConstantValue::Int(10)),
            )
            .unwrap();
        let name = env
            .add_variable(VariableBinding::field(b, "NAME", TypeRef::Id).with_static())
            .unwrap();
        let mode = env
            .add_variable(VariableBinding::field(b, "mode", int()).with_static())
            .unwrap();
        let other = env
            .add_variable(VariableBinding::local("other", TypeRef::Declared(b)))
            .unwrap();
        let local = env
            .add_variable(VariableBinding::local("local", int()))
            .unwrap();
        let holder = env
            .add_variable(VariableBinding::field(b, "HOLDER", TypeRef::Declared(a)).with_static())
            .unwrap();
        let inner = env
            .add_variable(VariableBinding::field(a, "inner", int()))
            .unwrap();

        Self {
            env,
            a,
            b,
            flag,
            snapshot,
            count,
            max,
            name,
            mode,
            other,
            local,
            holder,
            inner,
        }
    }

    /// A simple name bound to `var`.
    pub fn simple_name(&self, tree: &mut Tree, var: VarId) -> NodeId {
        let text = self.env.variable(var).unwrap().name.clone();
        tree.variable_name(text, var, Span::default())
    }

    /// `Owner.field`, qualified by the declaring type's simple name.
    pub fn qualified(&self, tree: &mut Tree, var: VarId) -> NodeId {
        let binding = self.env.variable(var).unwrap();
        let owner = binding.declaring_type.unwrap();
        let owner_name = self.env.get_type(owner).unwrap().name.simple_name().to_string();
        let qualifier = tree.type_name(owner_name, owner, Span::default());
        let name = self.simple_name(tree, var);
        tree.qualified_name(qualifier, name)
    }

    /// Wrap `statements` in a method of `owner` declared by the only type
    /// of the tree, and make that the tree root. Returns the method body.
    pub fn in_method(&self, tree: &mut Tree, owner: TypeHash, statements: Vec<NodeId>) -> NodeId {
        let body = tree.block(statements);
        let method = tree.method_decl(method_ref(owner, "run"), Vec::new(), Some(body), Span::default());
        let decl = tree.type_decl(owner, vec![method], Span::default());
        tree.compilation_unit("com/example/A.java", vec![decl], Vec::new());
        body
    }

    pub fn render(&self, tree: &Tree, statement: NodeId) -> String {
        Renderer::new(tree, &self.env).statement(statement, 0).unwrap()
    }
}
