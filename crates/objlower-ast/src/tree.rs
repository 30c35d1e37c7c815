//! Arena storage for one compilation unit's tree.
//!
//! Nodes are addressed by [`NodeId`] and never move. A node's parent is
//! just another index, so replacing a subtree rewrites one slot of the
//! parent and the new node's parent link. Replaced nodes stay in the arena,
//! detached, and are unreachable from the root.

use objlower_core::{AstError, Binding, Span, SymbolEnvironment, TypeHash, VarId, VariableBinding};

use crate::node::{Node, NodeId, NodeKind};

/// An index-addressed tree with parent links.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and link its children to it.
    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        for child in kind.children() {
            if let Some(node) = self.nodes.get_mut(child.index()) {
                node.parent = Some(id);
            }
        }
        self.nodes.push(Node {
            kind,
            parent: None,
            span,
            nil_check: false,
        });
        id
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Look up a node, failing for indices outside the arena.
    pub fn node(&self, id: NodeId) -> Result<&Node, AstError> {
        self.nodes
            .get(id.index())
            .ok_or(AstError::InvalidNode { node: id.0 })
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, AstError> {
        self.nodes
            .get_mut(id.index())
            .ok_or(AstError::InvalidNode { node: id.0 })
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.get(id).map(|node| &node.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.get(id).map(|node| node.span).unwrap_or_default()
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.kind(id).map(NodeKind::children).unwrap_or_default()
    }

    pub fn has_nil_check(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|node| node.nil_check)
    }

    pub fn set_nil_check(&mut self, id: NodeId, nil_check: bool) -> Result<(), AstError> {
        self.node_mut(id)?.nil_check = nil_check;
        Ok(())
    }

    /// Replace `old` with `new` in `old`'s parent.
    ///
    /// Afterwards `new` is linked to that parent and `old` is detached.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> Result<(), AstError> {
        let old_node = self.node(old)?;
        let span = old_node.span;
        let parent = old_node.parent.ok_or(AstError::DetachedNode { node: old.0, span })?;
        self.node(new)?;

        if !self.node_mut(parent)?.kind.replace_child(old, new) {
            return Err(AstError::BrokenParentLink {
                node: old.0,
                parent: parent.0,
                span,
            });
        }
        self.node_mut(new)?.parent = Some(parent);
        self.node_mut(old)?.parent = None;
        Ok(())
    }

    /// Rewrite a qualified name into an explicit member access with the same
    /// qualifier and member, keeping its id, span and parent.
    ///
    /// A qualifier must stay a name, so every enclosing qualified name that
    /// `id` qualifies, directly or through converted ancestors, is rewritten
    /// too.
    pub fn convert_to_field_access(&mut self, id: NodeId) -> Result<(), AstError> {
        self.convert_one_to_field_access(id)?;
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            match self.kind(parent) {
                Some(NodeKind::QualifiedName { qualifier, .. }) if *qualifier == current => {
                    self.convert_one_to_field_access(parent)?;
                    current = parent;
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn convert_one_to_field_access(&mut self, id: NodeId) -> Result<(), AstError> {
        let node = self.node(id)?;
        let span = node.span;
        let (qualifier, name) = match &node.kind {
            NodeKind::QualifiedName { qualifier, name } => (*qualifier, *name),
            other => {
                return Err(AstError::UnexpectedNode {
                    expected: "QualifiedName",
                    found: other.name(),
                    span,
                });
            }
        };
        match &self.node(name)?.kind {
            NodeKind::SimpleName { .. } => {}
            other => {
                return Err(AstError::UnexpectedNode {
                    expected: "SimpleName",
                    found: other.name(),
                    span: self.span(name),
                });
            }
        }
        self.node_mut(id)?.kind = NodeKind::FieldAccess {
            expr: qualifier,
            name,
        };
        Ok(())
    }

    /// `id` with any enclosing `Parenthesized` wrappers removed.
    pub fn strip_parentheses(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(NodeKind::Parenthesized { expr }) = self.kind(current) {
            current = *expr;
        }
        current
    }

    /// Binding of the variable a name or member access refers to.
    pub fn variable_binding(&self, id: NodeId) -> Option<VarId> {
        match self.kind(id)? {
            NodeKind::SimpleName {
                binding: Some(Binding::Variable(var)),
                ..
            } => Some(*var),
            NodeKind::QualifiedName { name, .. } | NodeKind::FieldAccess { name, .. } => {
                self.variable_binding(*name)
            }
            _ => None,
        }
    }

    /// Resolved variable a name or member access refers to.
    pub fn resolve_variable<'env>(
        &self,
        id: NodeId,
        env: &'env SymbolEnvironment,
    ) -> Option<&'env VariableBinding> {
        self.variable_binding(id).and_then(|var| env.variable(var))
    }

    /// Type whose declaration lexically encloses `id`.
    pub fn owning_type(&self, id: NodeId) -> Option<TypeHash> {
        let mut current = Some(id);
        while let Some(node) = current {
            if let Some(NodeKind::TypeDecl { binding, .. }) = self.kind(node) {
                return *binding;
            }
            current = self.parent(node);
        }
        None
    }

    /// Nodes reachable from `id` in pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            let children = self.children(node);
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Type declarations of the root compilation unit, in order.
    pub fn type_decls(&self) -> Vec<NodeId> {
        match self.root.and_then(|root| self.kind(root)) {
            Some(NodeKind::CompilationUnit { types, .. }) => types.clone(),
            _ => Vec::new(),
        }
    }

    /// Native blocks attached to the root compilation unit.
    pub fn native_blocks(&self) -> &[String] {
        match self.root.and_then(|root| self.kind(root)) {
            Some(NodeKind::CompilationUnit { native_blocks, .. }) => native_blocks,
            _ => &[],
        }
    }

    /// Check that every node reachable from the root is linked to the node
    /// holding it.
    pub fn verify_links(&self) -> Result<(), AstError> {
        let Some(root) = self.root else {
            return Ok(());
        };
        for node in self.descendants(root) {
            for child in self.children(node) {
                if self.parent(child) != Some(node) {
                    return Err(AstError::BrokenParentLink {
                        node: child.0,
                        parent: node.0,
                        span: self.span(child),
                    });
                }
            }
        }
        Ok(())
    }
}
