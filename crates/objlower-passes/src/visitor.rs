//! Pre-order traversal with pruning.
//!
//! A visitor sees each node before its children and decides whether the
//! walk descends into it. A visitor may replace the visited node or any of
//! its descendants; children are read after the visit, so the walk always
//! follows the current shape of the tree.
//!
//! ```text
//! walk(n):
//!     visit(n) == Descend::Children  =>  walk(c) for c in children(n)
//!     visit(n) == Descend::Skip      =>  stop
//! ```

use objlower_ast::{NodeId, Tree};
use objlower_core::AstError;

/// Whether the walk enters the children of the visited node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descend {
    Children,
    /// Prune the subtree. Returned after replacing the visited node, or to
    /// protect a subtree from rewriting.
    Skip,
}

/// A tree visitor that may rewrite the tree it visits.
pub trait TreeVisitor {
    fn visit(&mut self, tree: &mut Tree, node: NodeId) -> Result<Descend, AstError>;
}

/// Walk the subtree rooted at `node` in pre-order.
pub fn walk<V: TreeVisitor + ?Sized>(
    tree: &mut Tree,
    node: NodeId,
    visitor: &mut V,
) -> Result<(), AstError> {
    if visitor.visit(tree, node)? == Descend::Skip {
        return Ok(());
    }
    for child in tree.children(node) {
        // Skip children that an earlier sibling's rewrite moved elsewhere.
        if tree.parent(child) == Some(node) {
            walk(tree, child, visitor)?;
        }
    }
    Ok(())
}
