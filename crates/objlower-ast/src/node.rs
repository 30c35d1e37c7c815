//! Node kinds of the lowering tree.
//!
//! The tree is a closed set of node kinds. Every pass matches on
//! [`NodeKind`] exhaustively, so adding a kind forces each pass and the
//! renderer to decide how to treat it.

use objlower_core::{Binding, FunctionRef, MethodRef, Span, TypeHash, VarId};
use ordered_float::OrderedFloat;

use crate::ops::{AssignOp, BinaryOp, PostfixOp, UnaryOp};

/// Stable index of a node in its [`Tree`](crate::Tree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Literal values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    Int(i64),
    Double(OrderedFloat<f64>),
    Bool(bool),
    Char(u16),
    String(String),
    Null,
}

/// A node of the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    /// Back-reference to the owning node; `None` for the root and for
    /// detached nodes.
    pub parent: Option<NodeId>,
    pub span: Span,
    /// The front end determined this expression needs a nil check.
    pub nil_check: bool,
}

/// All node kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    // ------------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------------
    /// Root of one input file.
    CompilationUnit {
        source_name: String,
        types: Vec<NodeId>,
        /// Verbatim native code spliced into the implementation file.
        native_blocks: Vec<String>,
    },
    /// A class, interface or enum. Nested types appear as separate
    /// declarations of the compilation unit.
    TypeDecl {
        binding: Option<TypeHash>,
        members: Vec<NodeId>,
    },
    FieldDecl {
        var: VarId,
        initializer: Option<NodeId>,
    },
    MethodDecl {
        method: MethodRef,
        params: Vec<VarId>,
        body: Option<NodeId>,
    },

    // ------------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------------
    Block {
        statements: Vec<NodeId>,
    },
    ExpressionStatement {
        expr: NodeId,
    },
    LocalVariable {
        var: VarId,
        initializer: Option<NodeId>,
    },
    Return {
        expr: Option<NodeId>,
    },
    If {
        condition: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
    },
    /// Case labels and the statements they guard are siblings in
    /// `statements`.
    Switch {
        expr: NodeId,
        statements: Vec<NodeId>,
    },
    /// `case expr:`, or `default:` when `expr` is `None`.
    SwitchCase {
        expr: Option<NodeId>,
    },
    Break,

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------
    Assignment {
        op: AssignOp,
        lhs: NodeId,
        rhs: NodeId,
    },
    SimpleName {
        name: String,
        binding: Option<Binding>,
    },
    /// `qualifier.name`, where `qualifier` is itself a name and `name` is a
    /// [`NodeKind::SimpleName`] carrying the binding of the whole.
    QualifiedName {
        qualifier: NodeId,
        name: NodeId,
    },
    /// `expr.name`, where `name` is a [`NodeKind::SimpleName`].
    FieldAccess {
        expr: NodeId,
        name: NodeId,
    },
    MethodInvocation {
        method: MethodRef,
        receiver: Option<NodeId>,
        args: Vec<NodeId>,
    },
    /// Call of a synthesized free function.
    FunctionInvocation {
        function: FunctionRef,
        args: Vec<NodeId>,
    },
    Prefix {
        op: UnaryOp,
        operand: NodeId,
    },
    Postfix {
        op: PostfixOp,
        operand: NodeId,
    },
    Infix {
        op: BinaryOp,
        lhs: NodeId,
        rhs: NodeId,
    },
    Literal(Literal),
    Parenthesized {
        expr: NodeId,
    },
    This,
}

impl NodeKind {
    /// Short name of the kind, for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::CompilationUnit { .. } => "CompilationUnit",
            NodeKind::TypeDecl { .. } => "TypeDecl",
            NodeKind::FieldDecl { .. } => "FieldDecl",
            NodeKind::MethodDecl { .. } => "MethodDecl",
            NodeKind::Block { .. } => "Block",
            NodeKind::ExpressionStatement { .. } => "ExpressionStatement",
            NodeKind::LocalVariable { .. } => "LocalVariable",
            NodeKind::Return { .. } => "Return",
            NodeKind::If { .. } => "If",
            NodeKind::Switch { .. } => "Switch",
            NodeKind::SwitchCase { .. } => "SwitchCase",
            NodeKind::Break => "Break",
            NodeKind::Assignment { .. } => "Assignment",
            NodeKind::SimpleName { .. } => "SimpleName",
            NodeKind::QualifiedName { .. } => "QualifiedName",
            NodeKind::FieldAccess { .. } => "FieldAccess",
            NodeKind::MethodInvocation { .. } => "MethodInvocation",
            NodeKind::FunctionInvocation { .. } => "FunctionInvocation",
            NodeKind::Prefix { .. } => "Prefix",
            NodeKind::Postfix { .. } => "Postfix",
            NodeKind::Infix { .. } => "Infix",
            NodeKind::Literal(_) => "Literal",
            NodeKind::Parenthesized { .. } => "Parenthesized",
            NodeKind::This => "This",
        }
    }

    /// Child nodes in source order.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::CompilationUnit { types, .. } => types.clone(),
            NodeKind::TypeDecl { members, .. } => members.clone(),
            NodeKind::FieldDecl { initializer, .. }
            | NodeKind::LocalVariable { initializer, .. } => initializer.iter().copied().collect(),
            NodeKind::MethodDecl { body, .. } => body.iter().copied().collect(),
            NodeKind::Block { statements } => statements.clone(),
            NodeKind::ExpressionStatement { expr } | NodeKind::Parenthesized { expr } => vec![*expr],
            NodeKind::Return { expr } | NodeKind::SwitchCase { expr } => {
                expr.iter().copied().collect()
            }
            NodeKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let mut out = vec![*condition, *then_branch];
                out.extend(else_branch.iter().copied());
                out
            }
            NodeKind::Switch { expr, statements } => {
                let mut out = vec![*expr];
                out.extend(statements.iter().copied());
                out
            }
            NodeKind::Assignment { lhs, rhs, .. } | NodeKind::Infix { lhs, rhs, .. } => {
                vec![*lhs, *rhs]
            }
            NodeKind::QualifiedName { qualifier, name } => vec![*qualifier, *name],
            NodeKind::FieldAccess { expr, name } => vec![*expr, *name],
            NodeKind::MethodInvocation { receiver, args, .. } => {
                let mut out: Vec<NodeId> = receiver.iter().copied().collect();
                out.extend(args.iter().copied());
                out
            }
            NodeKind::FunctionInvocation { args, .. } => args.clone(),
            NodeKind::Prefix { operand, .. } | NodeKind::Postfix { operand, .. } => vec![*operand],
            NodeKind::SimpleName { .. }
            | NodeKind::Break
            | NodeKind::Literal(_)
            | NodeKind::This => Vec::new(),
        }
    }

    /// Point the slot holding `old` at `new`. Returns `false` if no slot
    /// holds `old`.
    pub(crate) fn replace_child(&mut self, old: NodeId, new: NodeId) -> bool {
        fn swap(slot: &mut NodeId, old: NodeId, new: NodeId) -> bool {
            if *slot == old {
                *slot = new;
                true
            } else {
                false
            }
        }

        fn swap_opt(slot: &mut Option<NodeId>, old: NodeId, new: NodeId) -> bool {
            match slot {
                Some(id) => swap(id, old, new),
                None => false,
            }
        }

        fn swap_vec(slots: &mut [NodeId], old: NodeId, new: NodeId) -> bool {
            slots.iter_mut().any(|slot| swap(slot, old, new))
        }

        match self {
            NodeKind::CompilationUnit { types, .. } => swap_vec(types, old, new),
            NodeKind::TypeDecl { members, .. } => swap_vec(members, old, new),
            NodeKind::FieldDecl { initializer, .. }
            | NodeKind::LocalVariable { initializer, .. } => swap_opt(initializer, old, new),
            NodeKind::MethodDecl { body, .. } => swap_opt(body, old, new),
            NodeKind::Block { statements } => swap_vec(statements, old, new),
            NodeKind::ExpressionStatement { expr } | NodeKind::Parenthesized { expr } => {
                swap(expr, old, new)
            }
            NodeKind::Return { expr } | NodeKind::SwitchCase { expr } => swap_opt(expr, old, new),
            NodeKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                swap(condition, old, new)
                    || swap(then_branch, old, new)
                    || swap_opt(else_branch, old, new)
            }
            NodeKind::Switch { expr, statements } => {
                swap(expr, old, new) || swap_vec(statements, old, new)
            }
            NodeKind::Assignment { lhs, rhs, .. } | NodeKind::Infix { lhs, rhs, .. } => {
                swap(lhs, old, new) || swap(rhs, old, new)
            }
            NodeKind::QualifiedName { qualifier, name } => {
                swap(qualifier, old, new) || swap(name, old, new)
            }
            NodeKind::FieldAccess { expr, name } => swap(expr, old, new) || swap(name, old, new),
            NodeKind::MethodInvocation { receiver, args, .. } => {
                swap_opt(receiver, old, new) || swap_vec(args, old, new)
            }
            NodeKind::FunctionInvocation { args, .. } => swap_vec(args, old, new),
            NodeKind::Prefix { operand, .. } | NodeKind::Postfix { operand, .. } => {
                swap(operand, old, new)
            }
            NodeKind::SimpleName { .. }
            | NodeKind::Break
            | NodeKind::Literal(_)
            | NodeKind::This => false,
        }
    }

    /// Whether this kind is an expression.
    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            NodeKind::Assignment { .. }
                | NodeKind::SimpleName { .. }
                | NodeKind::QualifiedName { .. }
                | NodeKind::FieldAccess { .. }
                | NodeKind::MethodInvocation { .. }
                | NodeKind::FunctionInvocation { .. }
                | NodeKind::Prefix { .. }
                | NodeKind::Postfix { .. }
                | NodeKind::Infix { .. }
                | NodeKind::Literal(_)
                | NodeKind::Parenthesized { .. }
                | NodeKind::This
        )
    }
}
