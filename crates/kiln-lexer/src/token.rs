use kiln_cursor::Matcher;
use text_size::{TextRange, TextSize};

use crate::{TokenKind, TokenSet};

/// A lexed run of characters.
///
/// `row` and `col` are zero-based and locate the first character: `row`
/// counts preceding line feeds, `col` counts characters since the last one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Token<'a> {
    pub range: TextRange,
    pub row: u32,
    pub col: u32,
    pub kind: TokenKind,
    pub text: &'a str,
}

impl Token<'_> {
    #[inline]
    pub fn start(&self) -> TextSize {
        self.range.start()
    }

    #[inline]
    pub fn end(&self) -> TextSize {
        self.range.end()
    }
}

impl Matcher<Token<'_>> for TokenKind {
    #[inline]
    fn matches(&self, token: &Token<'_>) -> bool {
        token.kind == *self
    }
}

impl Matcher<Token<'_>> for TokenSet {
    #[inline]
    fn matches(&self, token: &Token<'_>) -> bool {
        self.contains(token.kind)
    }
}
