use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash as _, Hasher as _};

use rustc_hash::FxHasher;

use crate::{NodeData, NodeKind as _, NodeRef};

/// Structural hash of a subtree.
///
/// Deterministic for identical trees built by the same binary; not suited for
/// persistence or adversarial inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint(pub u64);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl<N: NodeData> NodeRef<'_, N> {
    /// Structural hash over kind names, node content and children.
    pub fn hash(self) -> Fingerprint {
        fingerprint(self, untweaked)
    }

    /// Like [`hash`](Self::hash), with `tweak` feeding extra input for this
    /// node only. Children contribute their plain [`hash`](Self::hash).
    pub fn hash_with(self, tweak: impl FnOnce(&mut FxHasher)) -> Fingerprint {
        fingerprint(self, tweak)
    }
}

fn untweaked(_: &mut FxHasher) {}

fn fingerprint<N: NodeData>(
    node: NodeRef<'_, N>,
    tweak: impl FnOnce(&mut FxHasher),
) -> Fingerprint {
    let mut hasher = FxHasher::default();

    node.kind().name().hash(&mut hasher);
    node.data().tweak(&mut hasher);
    tweak(&mut hasher);

    hasher.write_u64(node.child_count() as u64);

    // Sorted by name so the outcome depends on which kinds occur, not on
    // their order.
    let kinds: BTreeSet<&'static str> = node.children().map(|child| child.kind().name()).collect();
    kinds.hash(&mut hasher);

    for child in node.children() {
        hasher.write_u64(fingerprint(child, untweaked).0);
    }

    Fingerprint(hasher.finish())
}
