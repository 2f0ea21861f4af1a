use camino::Utf8Path;
use kiln_errors::Result;
use kiln_tree::{NodeData, TreeBuilder};

use crate::{BinaryParser, TextParser};

/// A grammar over lexed text.
///
/// `'a` is the lifetime of the source, so nodes may borrow token text.
pub trait TextFormat<'a> {
    type Node: NodeData;

    /// Root node of every tree this grammar builds. `path` is the origin the
    /// parser was created from, if any.
    fn root(&self, path: Option<&Utf8Path>) -> Self::Node;

    /// Consumes the input and attaches nodes below `tree`'s root. Every scope
    /// entered has to be exited before returning `Ok`.
    fn parse_format(
        &mut self,
        parser: &mut TextParser<'a>,
        tree: &mut TreeBuilder<Self::Node>,
    ) -> Result<()>;
}

/// A grammar over raw bytes.
pub trait BinaryFormat<'a> {
    type Node: NodeData;

    fn root(&self, path: Option<&Utf8Path>) -> Self::Node;

    fn parse_format(
        &mut self,
        parser: &mut BinaryParser<'a>,
        tree: &mut TreeBuilder<Self::Node>,
    ) -> Result<()>;
}
