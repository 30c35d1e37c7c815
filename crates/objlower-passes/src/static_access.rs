//! Static-Access Rewrite Pass - route cross-type static field access through
//! accessor functions.
//!
//! The generated code has no guarantee that another type's static
//! initializer ran before its storage is touched. Accessors call the
//! declaring type's one-time initializer first, so every read or write of
//! another type's static state goes through one.
//!
//! ## Rules
//!
//! Applied to the first matching role of each node:
//!
//! 1. `X = v` on an object field: the assignment becomes `T_set_X(v)`;
//!    `v` is still rewritten.
//! 2. Any other assignment to a field: the left side becomes
//!    `*T_getRef_X()`, the operator is kept.
//! 3. A read of `X`: becomes `T_get_X()`. When `X` qualifies a longer
//!    qualified name, that name is first turned into a member access so the
//!    call can stand as its base.
//! 4. `X++`, `X--`, `++X`, `--X`: the operand becomes `*T_getRef_X()`.
//! 5. Case labels are never rewritten.
//!
//! Parentheses around an assigned or incremented field are dropped with it,
//! so `(X) += 1` is handled like `X += 1`.
//!
//! Fields that are primitive compile-time constants, and fields of the type
//! that owns the accessing code, are accessed directly.

use objlower_ast::{AssignOp, NodeId, NodeKind, Tree};
use objlower_core::{
    AstError, FunctionRef, PassError, SymbolEnvironment, TypeHash, VariableBinding, mangle,
};

use crate::pass::Pass;
use crate::visitor::{Descend, TreeVisitor, walk};

/// Whether code owned by `context` must reach `var` through an accessor.
pub fn needs_accessor(context: Option<TypeHash>, var: &VariableBinding) -> bool {
    match var.declaring_type {
        Some(owner) => {
            var.is_field()
                && var.is_static()
                && !var.is_primitive_constant()
                && context != Some(owner)
        }
        None => false,
    }
}

/// The Static-Access Rewrite Pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticAccessPass;

impl Pass for StaticAccessPass {
    fn name(&self) -> &'static str {
        "static-access"
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    fn run(&self, tree: &mut Tree, env: &SymbolEnvironment) -> Result<usize, PassError> {
        let Some(root) = tree.root() else {
            return Ok(0);
        };
        let mut rewriter = StaticAccessRewriter { env, rewrites: 0 };
        walk(tree, root, &mut rewriter).map_err(|err| PassError::structural(self.name(), err))?;
        Ok(rewriter.rewrites)
    }
}

/// A static field that needs an accessor, with its declaring type.
struct Target<'env> {
    var: &'env VariableBinding,
    owner: TypeHash,
    owner_name: String,
}

/// Syntactic role of a visited node.
enum Role {
    Assignment {
        op: AssignOp,
        lhs: NodeId,
        rhs: NodeId,
    },
    Name,
    IncDec {
        operand: NodeId,
    },
    CaseLabel,
    Other,
}

struct StaticAccessRewriter<'env> {
    env: &'env SymbolEnvironment,
    rewrites: usize,
}

impl<'env> StaticAccessRewriter<'env> {
    /// The field `expr` refers to, if code at `context` needs an accessor
    /// for it. Missing bindings mean no rewrite.
    fn target(&self, tree: &Tree, context: NodeId, expr: NodeId) -> Option<Target<'env>> {
        let var = tree.resolve_variable(expr, self.env)?;
        if !needs_accessor(tree.owning_type(context), var) {
            return None;
        }
        let owner = var.declaring_type?;
        let owner_name = self.env.full_name(owner)?;
        Some(Target {
            var,
            owner,
            owner_name,
        })
    }

    fn visit_assignment(
        &mut self,
        tree: &mut Tree,
        node: NodeId,
        op: AssignOp,
        lhs: NodeId,
        rhs: NodeId,
    ) -> Result<Descend, AstError> {
        let field = tree.strip_parentheses(lhs);
        let Some(target) = self.target(tree, node, field) else {
            return Ok(Descend::Children);
        };

        if op.is_simple() && !target.var.ty.is_primitive() {
            let setter = FunctionRef {
                name: mangle::setter_name(&target.owner_name, &target.var.name),
                declaring_type: target.owner,
                return_type: target.var.ty.clone(),
                params: vec![target.var.ty.clone()],
            };
            let span = tree.span(node);
            let call = tree.function_invocation(setter, vec![rhs], span);
            tree.replace(node, call)?;
            self.rewrites += 1;
            walk(tree, rhs, self)?;
            return Ok(Descend::Skip);
        }

        let getter = self.getter_invocation(tree, field, &target, true)?;
        tree.replace(lhs, getter)?;
        self.rewrites += 1;
        Ok(Descend::Children)
    }

    fn visit_name(&mut self, tree: &mut Tree, node: NodeId) -> Result<Descend, AstError> {
        let Some(target) = self.target(tree, node, node) else {
            return Ok(Descend::Children);
        };

        if let Some(parent) = tree.parent(node) {
            if let Some(NodeKind::QualifiedName { qualifier, .. }) = tree.kind(parent) {
                if *qualifier == node {
                    tree.convert_to_field_access(parent)?;
                }
            }
        }

        let getter = self.getter_invocation(tree, node, &target, false)?;
        tree.replace(node, getter)?;
        self.rewrites += 1;
        Ok(Descend::Skip)
    }

    fn visit_inc_dec(
        &mut self,
        tree: &mut Tree,
        node: NodeId,
        operand: NodeId,
    ) -> Result<Descend, AstError> {
        let field = tree.strip_parentheses(operand);
        let Some(target) = self.target(tree, node, field) else {
            return Ok(Descend::Children);
        };
        let getter = self.getter_invocation(tree, field, &target, true)?;
        tree.replace(operand, getter)?;
        self.rewrites += 1;
        Ok(Descend::Skip)
    }

    /// `T_get_X()`, or `*T_getRef_X()` when the result must be assignable.
    /// The replacement inherits the nil check of `expr`.
    fn getter_invocation(
        &self,
        tree: &mut Tree,
        expr: NodeId,
        target: &Target<'env>,
        assignable: bool,
    ) -> Result<NodeId, AstError> {
        let (name, return_type) = if assignable {
            (
                mangle::ref_getter_name(&target.owner_name, &target.var.name),
                target.var.ty.clone().pointer_to(),
            )
        } else {
            (
                mangle::getter_name(&target.owner_name, &target.var.name),
                target.var.ty.clone(),
            )
        };
        let getter = FunctionRef {
            name,
            declaring_type: target.owner,
            return_type,
            params: Vec::new(),
        };

        let span = tree.span(expr);
        let call = tree.function_invocation(getter, Vec::new(), span);
        let replacement = if assignable { tree.deref(call) } else { call };
        if tree.has_nil_check(expr) {
            tree.set_nil_check(replacement, true)?;
        }
        Ok(replacement)
    }
}

impl TreeVisitor for StaticAccessRewriter<'_> {
    fn visit(&mut self, tree: &mut Tree, node: NodeId) -> Result<Descend, AstError> {
        let role = match &tree.node(node)?.kind {
            NodeKind::Assignment { op, lhs, rhs } => Role::Assignment {
                op: *op,
                lhs: *lhs,
                rhs: *rhs,
            },
            NodeKind::SimpleName { .. }
            | NodeKind::QualifiedName { .. }
            | NodeKind::FieldAccess { .. } => Role::Name,
            NodeKind::Postfix { operand, .. } => Role::IncDec { operand: *operand },
            NodeKind::Prefix { op, operand } if op.is_inc_or_dec() => {
                Role::IncDec { operand: *operand }
            }
            NodeKind::SwitchCase { .. } => Role::CaseLabel,
            _ => Role::Other,
        };

        match role {
            Role::Assignment { op, lhs, rhs } => self.visit_assignment(tree, node, op, lhs, rhs),
            Role::Name => self.visit_name(tree, node),
            Role::IncDec { operand } => self.visit_inc_dec(tree, node, operand),
            Role::CaseLabel => Ok(Descend::Skip),
            Role::Other => Ok(Descend::Children),
        }
    }
}
