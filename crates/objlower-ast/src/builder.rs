//! Shorthand constructors used by the front end, passes and tests.

use objlower_core::{Binding, FunctionRef, MethodRef, Span, TypeHash, VarId};

use crate::node::{Literal, NodeId, NodeKind};
use crate::ops::{AssignOp, BinaryOp, PostfixOp, UnaryOp};
use crate::tree::Tree;

impl Tree {
    /// Add the compilation unit node and make it the root.
    pub fn compilation_unit(
        &mut self,
        source_name: impl Into<String>,
        types: Vec<NodeId>,
        native_blocks: Vec<String>,
    ) -> NodeId {
        let id = self.alloc(
            NodeKind::CompilationUnit {
                source_name: source_name.into(),
                types,
                native_blocks,
            },
            Span::default(),
        );
        self.set_root(id);
        id
    }

    pub fn type_decl(&mut self, binding: TypeHash, members: Vec<NodeId>, span: Span) -> NodeId {
        self.alloc(
            NodeKind::TypeDecl {
                binding: Some(binding),
                members,
            },
            span,
        )
    }

    pub fn field_decl(&mut self, var: VarId, initializer: Option<NodeId>, span: Span) -> NodeId {
        self.alloc(NodeKind::FieldDecl { var, initializer }, span)
    }

    pub fn method_decl(
        &mut self,
        method: MethodRef,
        params: Vec<VarId>,
        body: Option<NodeId>,
        span: Span,
    ) -> NodeId {
        self.alloc(
            NodeKind::MethodDecl {
                method,
                params,
                body,
            },
            span,
        )
    }

    pub fn block(&mut self, statements: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::Block { statements }, Span::default())
    }

    pub fn expression_statement(&mut self, expr: NodeId) -> NodeId {
        let span = self.span(expr);
        self.alloc(NodeKind::ExpressionStatement { expr }, span)
    }

    pub fn local_variable(&mut self, var: VarId, initializer: Option<NodeId>, span: Span) -> NodeId {
        self.alloc(NodeKind::LocalVariable { var, initializer }, span)
    }

    pub fn return_statement(&mut self, expr: Option<NodeId>, span: Span) -> NodeId {
        self.alloc(NodeKind::Return { expr }, span)
    }

    pub fn switch(&mut self, expr: NodeId, statements: Vec<NodeId>, span: Span) -> NodeId {
        self.alloc(NodeKind::Switch { expr, statements }, span)
    }

    pub fn switch_case(&mut self, expr: Option<NodeId>, span: Span) -> NodeId {
        self.alloc(NodeKind::SwitchCase { expr }, span)
    }

    pub fn break_statement(&mut self) -> NodeId {
        self.alloc(NodeKind::Break, Span::default())
    }

    pub fn simple_name(
        &mut self,
        name: impl Into<String>,
        binding: Option<Binding>,
        span: Span,
    ) -> NodeId {
        self.alloc(
            NodeKind::SimpleName {
                name: name.into(),
                binding,
            },
            span,
        )
    }

    /// A simple name bound to a variable.
    pub fn variable_name(&mut self, name: impl Into<String>, var: VarId, span: Span) -> NodeId {
        self.simple_name(name, Some(Binding::Variable(var)), span)
    }

    /// A simple name bound to a type.
    pub fn type_name(&mut self, name: impl Into<String>, ty: TypeHash, span: Span) -> NodeId {
        self.simple_name(name, Some(Binding::Type(ty)), span)
    }

    pub fn qualified_name(&mut self, qualifier: NodeId, name: NodeId) -> NodeId {
        let span = self.span(qualifier);
        self.alloc(NodeKind::QualifiedName { qualifier, name }, span)
    }

    pub fn field_access(&mut self, expr: NodeId, name: NodeId) -> NodeId {
        let span = self.span(expr);
        self.alloc(NodeKind::FieldAccess { expr, name }, span)
    }

    pub fn method_invocation(
        &mut self,
        method: MethodRef,
        receiver: Option<NodeId>,
        args: Vec<NodeId>,
        span: Span,
    ) -> NodeId {
        self.alloc(
            NodeKind::MethodInvocation {
                method,
                receiver,
                args,
            },
            span,
        )
    }

    pub fn function_invocation(
        &mut self,
        function: FunctionRef,
        args: Vec<NodeId>,
        span: Span,
    ) -> NodeId {
        self.alloc(NodeKind::FunctionInvocation { function, args }, span)
    }

    pub fn assignment(&mut self, op: AssignOp, lhs: NodeId, rhs: NodeId) -> NodeId {
        let span = self.span(lhs);
        self.alloc(NodeKind::Assignment { op, lhs, rhs }, span)
    }

    pub fn prefix(&mut self, op: UnaryOp, operand: NodeId) -> NodeId {
        let span = self.span(operand);
        self.alloc(NodeKind::Prefix { op, operand }, span)
    }

    /// `*operand`
    pub fn deref(&mut self, operand: NodeId) -> NodeId {
        self.prefix(UnaryOp::Deref, operand)
    }

    pub fn postfix(&mut self, op: PostfixOp, operand: NodeId) -> NodeId {
        let span = self.span(operand);
        self.alloc(NodeKind::Postfix { op, operand }, span)
    }

    /// `(expr)`
    pub fn parenthesized(&mut self, expr: NodeId) -> NodeId {
        let span = self.span(expr);
        self.alloc(NodeKind::Parenthesized { expr }, span)
    }

    pub fn infix(&mut self, op: BinaryOp, lhs: NodeId, rhs: NodeId) -> NodeId {
        let span = self.span(lhs);
        self.alloc(NodeKind::Infix { op, lhs, rhs }, span)
    }

    pub fn literal(&mut self, literal: Literal, span: Span) -> NodeId {
        self.alloc(NodeKind::Literal(literal), span)
    }

    pub fn int_literal(&mut self, value: i64) -> NodeId {
        self.literal(Literal::Int(value), Span::default())
    }

    pub fn string_literal(&mut self, value: impl Into<String>) -> NodeId {
        self.literal(Literal::String(value.into()), Span::default())
    }

    pub fn this(&mut self) -> NodeId {
        self.alloc(NodeKind::This, Span::default())
    }
}
