//! Output tree shared by every kiln grammar.
//!
//! A [`Tree`] owns its nodes in an arena; parent links are plain indices. A
//! grammar describes its node variants with one closed enum implementing
//! [`NodeData`], builds the tree through a [`TreeBuilder`], and hands out
//! [`NodeRef`] handles for lookup, traversal, hashing and path queries.

mod builder;
#[cfg(test)]
mod fixture;
mod hash;
mod query;
mod tree;
mod value;
mod walk;

use std::fmt::Debug;

pub use rustc_hash::FxHasher;

pub use builder::TreeBuilder;
pub use hash::Fingerprint;
pub use query::{Op, Predicate, Query, Segment};
pub use tree::{Dump, Entry, NodeId, NodeRef, Tree};
pub use value::{MAX_LITERAL_DEPTH, Value};
pub use walk::{Preorder, Walk, WalkEvent};

/// Tag identifying the variant of a node.
///
/// The name is what path queries match against and what the structural hash
/// consumes, so it has to stay stable.
pub trait NodeKind: Copy + Eq + Debug {
    fn name(self) -> &'static str;
}

/// Payload of a tree node.
pub trait NodeData {
    type Kind: NodeKind;

    fn kind(&self) -> Self::Kind;

    /// Feeds node-specific content (a path, raw bytes, token text) into the
    /// structural hash.
    fn tweak(&self, _hasher: &mut FxHasher) {}

    /// Named values visible to path-query predicates and dumps.
    fn attributes(&self) -> Vec<(&'static str, Value)> {
        Vec::new()
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes().into_iter().find(|(key, _)| *key == name).map(|(_, value)| value)
    }
}
