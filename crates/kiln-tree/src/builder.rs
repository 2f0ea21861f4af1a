//! Scope-tracking construction of a [`Tree`].

use tracing::trace;

use crate::{NodeData, NodeId, NodeKind as _, Tree};

/// Builds a [`Tree`] while tracking the node new children attach to.
///
/// Grammar rules call [`enter_scope`](Self::enter_scope) when they open a
/// composite node and [`exit_scope`](Self::exit_scope) when they close it. A
/// rule that returns early with `?` leaves the scope unbalanced, which is fine:
/// the whole parse is abandoned along with the builder.
pub struct TreeBuilder<N> {
    tree: Tree<N>,
    scope: NodeId<N>,
    depth: usize,
}

impl<N: NodeData> TreeBuilder<N> {
    pub fn new(root: N) -> Self {
        let tree = Tree::new(root);
        let scope = tree.root_id();
        Self { tree, scope, depth: 0 }
    }

    /// The node that [`add_to_scope`](Self::add_to_scope) attaches to.
    #[inline]
    pub fn scope(&self) -> NodeId<N> {
        self.scope
    }

    /// Number of scopes entered and not yet exited.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn tree(&self) -> &Tree<N> {
        &self.tree
    }

    /// Attaches `data` under an explicit `parent`.
    pub fn add(&mut self, parent: NodeId<N>, data: N) -> NodeId<N> {
        self.tree.add(parent, data)
    }

    /// Attaches a leaf to the current scope.
    pub fn add_to_scope(&mut self, data: N) -> NodeId<N> {
        self.tree.add(self.scope, data)
    }

    /// Attaches a node to the current scope and makes it the new scope.
    pub fn enter_scope(&mut self, data: N) -> NodeId<N> {
        trace!(kind = data.kind().name(), depth = self.depth, "enter scope");

        self.scope = self.tree.add(self.scope, data);
        self.depth += 1;
        self.scope
    }

    /// Returns to the parent of the current scope.
    ///
    /// # Panics
    ///
    /// When the current scope is the root, which means the grammar exited
    /// more scopes than it entered.
    #[track_caller]
    pub fn exit_scope(&mut self) -> NodeId<N> {
        let Some(parent) = self.tree.parent(self.scope) else {
            panic!("`exit_scope` called at the root scope");
        };

        self.depth -= 1;
        trace!(kind = self.tree.data(self.scope).kind().name(), depth = self.depth, "exit scope");

        self.scope = parent;
        parent
    }

    /// Mutable access to an attached node, typically the current scope
    /// before it is exited.
    pub fn data_mut(&mut self, id: NodeId<N>) -> &mut N {
        self.tree.data_mut(id)
    }

    /// Hands over the tree once every entered scope has been exited.
    ///
    /// # Panics
    ///
    /// When a scope is still open.
    #[track_caller]
    pub fn finish(self) -> Tree<N> {
        assert!(
            self.scope == self.tree.root_id(),
            "unbalanced scopes: {} still open on finish",
            self.depth
        );
        self.tree
    }
}
