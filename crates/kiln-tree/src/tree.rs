use std::fmt;

use kiln_errors::QueryError;
use la_arena::{Arena, Idx};

use crate::walk::{Preorder, Walk};
use crate::{NodeData, NodeKind as _, Query};

/// Arena slot of a node: its payload and its links.
pub struct Entry<N> {
    data: N,
    parent: Option<NodeId<N>>,
    children: Vec<NodeId<N>>,
}

pub type NodeId<N> = Idx<Entry<N>>;

/// A rooted tree owning every node it contains.
///
/// Nodes are only ever appended, never detached, so children keep their
/// insertion order and every non-root node has exactly one parent.
pub struct Tree<N> {
    nodes: Arena<Entry<N>>,
    root: NodeId<N>,
}

impl<N> Tree<N> {
    pub fn new(root: N) -> Self {
        let mut nodes = Arena::new();
        let root = nodes.alloc(Entry { data: root, parent: None, children: Vec::new() });
        Self { nodes, root }
    }

    #[inline]
    pub fn root_id(&self) -> NodeId<N> {
        self.root
    }

    #[inline]
    pub fn root(&self) -> NodeRef<'_, N> {
        self.node(self.root)
    }

    #[inline]
    pub fn node(&self, id: NodeId<N>) -> NodeRef<'_, N> {
        NodeRef { tree: self, id }
    }

    /// Appends a new child to `parent` and returns it.
    pub fn add(&mut self, parent: NodeId<N>, data: N) -> NodeId<N> {
        let child = self.nodes.alloc(Entry { data, parent: Some(parent), children: Vec::new() });
        self.nodes[parent].children.push(child);
        child
    }

    #[inline]
    pub fn data(&self, id: NodeId<N>) -> &N {
        &self.nodes[id].data
    }

    #[inline]
    pub fn data_mut(&mut self, id: NodeId<N>) -> &mut N {
        &mut self.nodes[id].data
    }

    #[inline]
    pub fn parent(&self, id: NodeId<N>) -> Option<NodeId<N>> {
        self.nodes[id].parent
    }

    #[inline]
    pub fn children(&self, id: NodeId<N>) -> &[NodeId<N>] {
        &self.nodes[id].children
    }

    /// Number of nodes, root included.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

impl<N: NodeData> fmt::Debug for Tree<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("root", &self.root().kind())
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

/// Borrowed handle to one node of a [`Tree`].
pub struct NodeRef<'t, N> {
    tree: &'t Tree<N>,
    id: NodeId<N>,
}

impl<N> Clone for NodeRef<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for NodeRef<'_, N> {}

impl<N> PartialEq for NodeRef<'_, N> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl<N> Eq for NodeRef<'_, N> {}

impl<N: NodeData> fmt::Debug for NodeRef<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeRef").field(&self.kind()).field(&self.id.into_raw()).finish()
    }
}

impl<'t, N> NodeRef<'t, N> {
    #[inline]
    pub fn id(self) -> NodeId<N> {
        self.id
    }

    #[inline]
    pub fn tree(self) -> &'t Tree<N> {
        self.tree
    }

    #[inline]
    pub fn data(self) -> &'t N {
        self.tree.data(self.id)
    }

    pub fn parent(self) -> Option<Self> {
        self.tree.parent(self.id).map(|id| self.tree.node(id))
    }

    pub fn is_root(self) -> bool {
        self.id == self.tree.root
    }

    pub fn children(
        self,
    ) -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator + use<'t, N> {
        let tree = self.tree;
        tree.children(self.id).iter().map(move |&id| tree.node(id))
    }

    pub fn child_count(self) -> usize {
        self.tree.children(self.id).len()
    }

    /// Enter and leave events over the subtree rooted here.
    pub fn preorder(self) -> Preorder<'t, N> {
        Preorder::new(self)
    }

    /// This node, then each child's walk in order.
    pub fn walk(self) -> Walk<'t, N> {
        Walk::new(self)
    }
}

impl<'t, N: NodeData> NodeRef<'t, N> {
    #[inline]
    pub fn kind(self) -> N::Kind {
        self.data().kind()
    }

    pub fn attribute(self, name: &str) -> Option<crate::Value> {
        self.data().attribute(name)
    }

    /// First immediate child of `kind`.
    pub fn find(self, kind: N::Kind) -> Option<Self> {
        self.children().find(|child| child.kind() == kind)
    }

    /// Every immediate child of `kind`, in order.
    pub fn find_all(self, kind: N::Kind) -> Vec<Self> {
        self.children().filter(|child| child.kind() == kind).collect()
    }

    /// First node of `kind` in preorder, this node included.
    pub fn find_nested(self, kind: N::Kind) -> Option<Self> {
        self.walk().find(|node| node.kind() == kind)
    }

    /// Every node of `kind` in preorder, this node included.
    pub fn find_all_nested(self, kind: N::Kind) -> Vec<Self> {
        self.walk().filter(|node| node.kind() == kind).collect()
    }

    /// Evaluates a path query such as `List/ListItem/Text[text in ["a", "b"]]`
    /// against the children of this node.
    pub fn find_path(self, path: &str) -> Result<Vec<Self>, QueryError> {
        let query: Query = path.parse()?;
        Ok(query.select(self))
    }

    pub fn select(self, query: &Query) -> Vec<Self> {
        query.select(self)
    }

    /// Indented outline of the subtree, optionally with attributes.
    pub fn dump(self, properties: bool) -> Dump<'t, N> {
        Dump { node: self, properties }
    }
}

/// Display adapter returned by [`NodeRef::dump`].
pub struct Dump<'t, N> {
    node: NodeRef<'t, N>,
    properties: bool,
}

impl<N: NodeData> fmt::Display for Dump<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut depth = 0usize;

        for event in self.node.preorder() {
            let node = match event {
                crate::WalkEvent::Enter(node) => node,
                crate::WalkEvent::Leave(_) => {
                    depth -= 1;
                    continue;
                }
            };

            let indent = depth * 2;
            writeln!(f, "{:indent$}{}", "", node.kind().name())?;
            if self.properties {
                for (name, value) in node.data().attributes() {
                    writeln!(f, "{:indent$}- {name} {value}", "", indent = indent + 2)?;
                }
            }
            depth += 1;
        }

        Ok(())
    }
}
