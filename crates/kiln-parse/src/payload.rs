//! Payloads most grammars need: where a parse started, the tokens a node was
//! built from, and the bytes a binary node covers.
//!
//! A grammar embeds them in its node enum and forwards
//! [`NodeData::tweak`](kiln_tree::NodeData::tweak) and
//! [`NodeData::attributes`](kiln_tree::NodeData::attributes) to them.

use std::hash::Hash as _;

use camino::{Utf8Path, Utf8PathBuf};
use kiln_lexer::Token;
use kiln_tree::{FxHasher, Value};

use crate::Lexeme;

/// Root payload remembering the path a parse started from.
///
/// The path takes part in the hash, so equal content read from two files
/// gives two fingerprints.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    pub path: Option<Utf8PathBuf>,
}

impl Document {
    pub fn new(path: Option<&Utf8Path>) -> Self {
        Self { path: path.map(Utf8Path::to_path_buf) }
    }

    pub fn tweak(&self, hasher: &mut FxHasher) {
        self.path.as_deref().map(Utf8Path::as_str).hash(hasher);
    }

    pub fn attributes(&self) -> Vec<(&'static str, Value)> {
        self.path.iter().map(|path| ("path", Value::from(path.as_str()))).collect()
    }
}

/// Tokens collected for one node, see
/// [`TextParser::collect_lexical`](crate::TextParser::collect_lexical).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lexical<'a> {
    pub tokens: Vec<Token<'a>>,
    pub lexeme: Lexeme<'a>,
}

impl<'a> Lexical<'a> {
    /// Source text spanned by the tokens, separators between them included.
    #[inline]
    pub fn raw(&self) -> &'a str {
        self.lexeme.text
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tweak(&self, hasher: &mut FxHasher) {
        self.raw().hash(hasher);
    }

    pub fn attributes(&self) -> Vec<(&'static str, Value)> {
        vec![("raw", Value::from(self.raw()))]
    }
}

/// Bytes collected for one node, see
/// [`BinaryParser::collect_binary`](crate::BinaryParser::collect_binary).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Binary<'a> {
    pub bytes: &'a [u8],
    pub offset: usize,
}

impl Binary<'_> {
    pub fn tweak(&self, hasher: &mut FxHasher) {
        self.bytes.hash(hasher);
    }

    pub fn attributes(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("offset", Value::Int(i64::try_from(self.offset).unwrap_or(i64::MAX))),
            ("len", Value::Int(i64::try_from(self.bytes.len()).unwrap_or(i64::MAX))),
        ]
    }
}
