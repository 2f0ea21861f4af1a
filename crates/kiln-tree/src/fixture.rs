use crate::{FxHasher, NodeData, NodeKind, Tree, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Kind {
    Root,
    A,
    B,
    C,
}

impl NodeKind for Kind {
    fn name(self) -> &'static str {
        match self {
            Self::Root => "Root",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Node {
    Root,
    A,
    B { x: i64 },
    C { text: String },
}

impl NodeData for Node {
    type Kind = Kind;

    fn kind(&self) -> Kind {
        match self {
            Self::Root => Kind::Root,
            Self::A => Kind::A,
            Self::B { .. } => Kind::B,
            Self::C { .. } => Kind::C,
        }
    }

    fn tweak(&self, hasher: &mut FxHasher) {
        use std::hash::Hash as _;

        if let Self::C { text } = self {
            text.hash(hasher);
        }
    }

    fn attributes(&self) -> Vec<(&'static str, Value)> {
        match self {
            Self::B { x } => vec![("x", Value::Int(*x))],
            Self::C { text } => vec![("text", Value::Str(text.clone()))],
            Self::Root | Self::A => Vec::new(),
        }
    }
}

/// ```text
/// Root
///   A
///     B x=1
///     B x=2
///   A
///     B x=3
///   C text="hello"
/// ```
pub(crate) fn sample() -> Tree<Node> {
    let mut tree = Tree::new(Node::Root);
    let root = tree.root_id();

    let first = tree.add(root, Node::A);
    tree.add(first, Node::B { x: 1 });
    tree.add(first, Node::B { x: 2 });

    let second = tree.add(root, Node::A);
    tree.add(second, Node::B { x: 3 });

    tree.add(root, Node::C { text: "hello".to_owned() });
    tree
}
