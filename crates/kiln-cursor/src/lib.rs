//! Positional cursors over finite, in-memory sequences.
//!
//! Every stage of a kiln grammar walks a buffer with the same set of
//! operations: the lexer walks characters, the text parser walks tokens and the
//! binary parser walks bytes. [`Cursor`] provides those operations once on top
//! of three required accessors.

mod cursor;
mod matcher;

/// Cursor trait, the borrowed slice cursor, and saved positions.
pub use cursor::{Checkpoint, Cursor, SliceCursor};
/// Element predicates accepted by the consumption helpers.
pub use matcher::Matcher;
