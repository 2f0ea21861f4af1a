//! Recursive-descent drivers for text and binary grammars.
//!
//! A grammar implements [`TextFormat`] or [`BinaryFormat`] and pulls input
//! from a [`TextParser`] or a [`BinaryParser`]. Both parsers are cursors with
//! a collection point: rules consume the elements of a node, collect them,
//! and attach the node to a [`TreeBuilder`](kiln_tree::TreeBuilder).

mod binary;
mod boundary;
mod decode;
mod format;
mod payload;
mod text;

use kiln_errors::Result;
use kiln_tree::Tree;

pub use binary::BinaryParser;
pub use boundary::Boundary;
pub use decode::{Decode, Encoding, Endian};
pub use format::{BinaryFormat, TextFormat};
pub use payload::{Binary, Document, Lexical};
pub use text::{DEFAULT_WINDOW, Lexeme, TextParser};

/// Lexes `text` and runs `format` over it.
pub fn parse_text<'a, F: TextFormat<'a>>(text: &'a str, format: &mut F) -> Result<Tree<F::Node>> {
    TextParser::new(text)?.parse(format)
}

/// Runs `format` over `bytes`.
pub fn parse_binary<'a, F: BinaryFormat<'a>>(
    bytes: &'a [u8],
    format: &mut F,
) -> Result<Tree<F::Node>> {
    BinaryParser::new(bytes)?.parse(format)
}
