use std::slice;

use crate::tree::{NodeId, NodeRef};

/// Preorder traversal emitting an event on entering and on leaving each node.
pub struct Preorder<'t, N> {
    stack: Vec<(NodeRef<'t, N>, slice::Iter<'t, NodeId<N>>)>,
    root: Option<NodeRef<'t, N>>,
}

impl<'t, N> Preorder<'t, N> {
    #[inline]
    pub(crate) fn new(start: NodeRef<'t, N>) -> Self {
        Self { stack: Vec::with_capacity(32), root: Some(start) }
    }

    /// Skips the children of the node entered last.
    #[inline]
    pub fn skip_subtree(&mut self) {
        if let Some((_, children)) = self.stack.last_mut() {
            *children = Default::default();
        }
    }
}

impl<N> Clone for Preorder<'_, N> {
    fn clone(&self) -> Self {
        Self { stack: self.stack.clone(), root: self.root }
    }
}

impl<'t, N> Iterator for Preorder<'t, N> {
    type Item = WalkEvent<'t, N>;

    fn next(&mut self) -> Option<Self::Item> {
        let Some((node, children)) = self.stack.last_mut() else {
            let root = self.root.take()?;
            self.stack.push((root, root.tree().children(root.id()).iter()));
            return Some(WalkEvent::Enter(root));
        };
        let tree = node.tree();

        match children.next() {
            Some(&id) => {
                let child = tree.node(id);
                self.stack.push((child, tree.children(id).iter()));
                Some(WalkEvent::Enter(child))
            }
            None => {
                let (exited, _) = self.stack.pop()?;
                Some(WalkEvent::Leave(exited))
            }
        }
    }
}

/// Preorder walk event.
pub enum WalkEvent<'t, N> {
    Enter(NodeRef<'t, N>),
    Leave(NodeRef<'t, N>),
}

impl<N> Clone for WalkEvent<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for WalkEvent<'_, N> {}

impl<N> PartialEq for WalkEvent<'_, N> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Enter(a), Self::Enter(b)) | (Self::Leave(a), Self::Leave(b)) => a == b,
            _ => false,
        }
    }
}

impl<N: crate::NodeData> std::fmt::Debug for WalkEvent<'_, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enter(node) => f.debug_tuple("Enter").field(node).finish(),
            Self::Leave(node) => f.debug_tuple("Leave").field(node).finish(),
        }
    }
}

/// Lazy preorder walk over a subtree, the start node first.
pub struct Walk<'t, N> {
    inner: Preorder<'t, N>,
}

impl<'t, N> Walk<'t, N> {
    #[inline]
    pub(crate) fn new(start: NodeRef<'t, N>) -> Self {
        Self { inner: Preorder::new(start) }
    }
}

impl<N> Clone for Walk<'_, N> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<'t, N> Iterator for Walk<'t, N> {
    type Item = NodeRef<'t, N>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(|event| match event {
            WalkEvent::Enter(node) => Some(node),
            WalkEvent::Leave(_) => None,
        })
    }
}
