//! A toolkit for hand-written recursive-descent parsers.
//!
//! Text is split into [`Token`]s by the [`Lexer`]; a grammar implementing
//! [`TextFormat`] (or [`BinaryFormat`] for byte input) consumes them through a
//! [`TextParser`] and builds a [`Tree`]. Trees can be walked, hashed and
//! queried with path expressions such as `Section/List/*[level != 0]`.

pub use kiln_cursor::{Checkpoint, Cursor, Matcher, SliceCursor};
pub use kiln_errors::{
    Error, Excerpt, MEMORY_ORIGIN, QueryError, Renderer, Result, UnexpectedElement,
};
pub use kiln_lexer::{Lexer, Token, TokenKind, TokenSet};
pub use kiln_parse::{
    Binary, BinaryFormat, BinaryParser, Boundary, DEFAULT_WINDOW, Decode, Document, Encoding,
    Endian, Lexeme, Lexical, TextFormat, TextParser, parse_binary, parse_text,
};
pub use kiln_tree::{
    Dump, Fingerprint, FxHasher, MAX_LITERAL_DEPTH, NodeData, NodeId, NodeKind, NodeRef, Op,
    Predicate, Preorder, Query, Segment, Tree, TreeBuilder, Value, Walk, WalkEvent,
};
