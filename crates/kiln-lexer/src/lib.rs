//! Character classification into typed tokens.

mod token;
mod token_kind;
mod token_set;

use std::fmt::Display;

use camino::{Utf8Path, Utf8PathBuf};
use kiln_cursor::{Cursor, Matcher};
use kiln_errors::{Error, Excerpt, Result, UnexpectedElement, origin_path, position};
use text_size::{TextRange, TextSize};
use tracing::{debug, error};

pub use token::Token;
pub use token_kind::TokenKind;
use token_kind::TokenKind::*;
use token_kind::is_word_continue;
pub use token_set::TokenSet;

/// Splits a text into a flat, gap-free sequence of [`Token`]s.
///
/// Lexing never fails on unrecognized input: characters without a registered
/// kind become one-character `SYMBOL` tokens. The lexer is also a character
/// [`Cursor`], so a grammar can scan raw characters with [`TokenKind`]
/// classes before (or instead of) tokenizing.
pub struct Lexer<'a> {
    text: &'a str,
    path: Option<Utf8PathBuf>,
    chars: Vec<char>,
    pos: usize,
    offset: TextSize,
    row: u32,
    col: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Result<Self> {
        Self::with_path(None, text)
    }

    /// Like [`new`](Self::new), naming `path` as the origin in diagnostics.
    pub fn from_source(path: impl Into<Utf8PathBuf>, text: &'a str) -> Result<Self> {
        Self::with_path(Some(path.into()), text)
    }

    fn with_path(path: Option<Utf8PathBuf>, text: &'a str) -> Result<Self> {
        if text.is_empty() {
            return Err(Error::empty_input(path.as_deref()));
        }

        Ok(Self {
            text,
            path,
            chars: text.chars().collect(),
            pos: 0,
            offset: TextSize::new(0),
            row: 0,
            col: 0,
        })
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn path(&self) -> Option<&Utf8Path> {
        self.path.as_deref()
    }

    /// Lexes the whole input, from the first character regardless of where
    /// the cursor was left.
    pub fn tokenize(mut self) -> Vec<Token<'a>> {
        self.pos = 0;
        self.offset = TextSize::new(0);
        self.row = 0;
        self.col = 0;

        let mut tokens = Vec::with_capacity(self.chars.len() / 2 + 1);

        while let Some(&c) = self.get() {
            let start = self.pos;

            let kind = TokenKind::classify(c);
            match kind {
                NUMBER => {
                    self.skip_while(char::is_ascii_digit);
                }
                WORD => {
                    self.skip_while(|&c| is_word_continue(c));
                }
                _ => {
                    self.next();
                }
            }

            tokens.push(self.make_token(start, kind));
        }

        debug!(tokens = tokens.len(), bytes = self.text.len(), "tokenized");
        tokens
    }

    fn make_token(&mut self, start: usize, kind: TokenKind) -> Token<'a> {
        let chars = &self.chars[start..self.pos];
        let len: TextSize = chars.iter().map(|&c| TextSize::of(c)).sum();
        let range = TextRange::at(self.offset, len);
        let text = self.text;

        let token = Token { range, row: self.row, col: self.col, kind, text: &text[range] };

        for &c in chars {
            if c == '\n' {
                self.row += 1;
                self.col = 0;
            } else {
                self.col += 1;
            }
        }
        self.offset = range.end();

        token
    }

    /// Steps over the current character if it belongs to `expected`, fails
    /// otherwise.
    pub fn consume_strict<M>(&mut self, expected: M) -> Result<()>
    where
        M: Matcher<char> + Display,
    {
        if self.consume_if(|c| expected.matches(c)) {
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// The error for meeting the current character where `expected` was
    /// required.
    pub fn unexpected(&self, expected: impl Display) -> Error {
        let before = &self.chars[..self.pos];
        let row = before.iter().filter(|&&c| c == '\n').count();
        let col = before.iter().rev().take_while(|&&c| c != '\n').count();

        let offset: usize = before.iter().map(|c| c.len_utf8()).sum();
        let (actual, caret) = match self.get() {
            Some(c) => (c.to_string(), offset..offset + c.len_utf8()),
            None => ("end of input".to_owned(), offset..offset),
        };

        let element = UnexpectedElement {
            path: origin_path(self.path()),
            row: position(row),
            col: position(col),
            expected: expected.to_string(),
            actual,
            excerpt: Excerpt::lines(self.text, offset, caret),
            recent: Vec::new(),
        };

        error!(
            path = %element.path,
            row = element.row,
            col = element.col,
            expected = %element.expected,
            actual = %element.actual,
            "unexpected character"
        );
        element.into()
    }
}

impl Cursor for Lexer<'_> {
    type Item = char;

    #[inline]
    fn buffer(&self) -> &[char] {
        &self.chars
    }

    #[inline]
    fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    fn set_pos(&mut self, pos: usize) {
        debug_assert!(pos <= self.chars.len());
        self.pos = pos;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    const SIMPLE: &str = " bli kla dub ";
    const COMPLEX: &str = r#"def func(self, name: str = "okay"): print(name) exit(1)"#;

    fn kinds(text: &str) -> Vec<TokenKind> {
        Lexer::new(text).unwrap().tokenize().iter().map(|token| token.kind).collect()
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(Lexer::new(""), Err(Error::EmptyInput { path: None })));
    }

    #[test]
    fn whitespace() {
        assert_eq!(kinds(" "), vec![SPACE]);
        assert_eq!(kinds("\r\n\t\x0B"), vec![CARRIAGE_RETURN, LINE_FEED, HORIZONTAL_TAB, VERTICAL_TAB]);
    }

    #[test]
    fn simple_words() {
        assert_eq!(kinds(SIMPLE), vec![SPACE, WORD, SPACE, WORD, SPACE, WORD, SPACE]);
    }

    #[test]
    fn complex_line() {
        assert_eq!(
            kinds(COMPLEX),
            vec![
                WORD, SPACE, WORD, LEFT_PAREN, WORD, SYMBOL, // def func(self,
                SPACE, WORD, COLON, SPACE, WORD, SPACE, EQUAL_SIGN, //  name: str =
                SPACE, QUOTATION_MARK, WORD, QUOTATION_MARK, RIGHT_PAREN, // "okay")
                COLON, SPACE, WORD, LEFT_PAREN, WORD, RIGHT_PAREN, // : print(name)
                SPACE, WORD, LEFT_PAREN, NUMBER, RIGHT_PAREN, // exit(1)
            ]
        );
    }

    #[test]
    fn runs_are_maximal() {
        let tokens = Lexer::new("abc_12 0042x").unwrap().tokenize();
        let texts: Vec<_> = tokens.iter().map(|token| (token.kind, token.text)).collect();

        assert_eq!(
            texts,
            vec![(WORD, "abc_12"), (SPACE, " "), (NUMBER, "0042"), (WORD, "x")]
        );
    }

    #[test]
    fn rows_and_columns() {
        let tokens = Lexer::new("x 12\n\ty").unwrap().tokenize();
        let positions: Vec<_> = tokens.iter().map(|token| (token.text, token.row, token.col)).collect();

        assert_eq!(
            positions,
            vec![("x", 0, 0), (" ", 0, 1), ("12", 0, 2), ("\n", 0, 4), ("\t", 1, 0), ("y", 1, 1)]
        );
    }

    #[test]
    fn non_ascii_becomes_symbol() {
        let tokens = Lexer::new("é1").unwrap().tokenize();

        assert_eq!(tokens[0].kind, SYMBOL);
        assert_eq!(tokens[0].range, TextRange::new(0.into(), 2.into()));
        assert_eq!(tokens[1].kind, NUMBER);
        assert_eq!(tokens[1].col, 1);
    }

    #[test]
    fn strict_character_mismatch() {
        let mut lexer = Lexer::new("ab\ncd").unwrap();
        let error = lexer.consume_strict(NUMBER).unwrap_err();
        let element = error.as_unexpected().unwrap();

        assert_eq!((element.row, element.col), (0, 0));
        assert_eq!(element.expected, "digit");
        assert_eq!(element.actual, "a");
        assert_eq!(element.path.as_str(), kiln_errors::MEMORY_ORIGIN);
        assert_eq!(lexer.pos(), 0);
    }

    #[test]
    fn strict_character_scan() {
        let mut lexer = Lexer::from_source("notes.txt", "ab\ncd").unwrap();

        lexer.consume_while(WORD);
        lexer.consume_strict(LINE_FEED).unwrap();
        lexer.consume_strict(WORD).unwrap();

        let element = lexer.consume_strict(COLON).unwrap_err();
        let element = element.as_unexpected().unwrap();
        assert_eq!((element.row, element.col), (1, 1));
        assert_eq!(element.actual, "d");
        assert_eq!(element.excerpt.source, "cd");
        assert_eq!(element.excerpt.first_line, 2);
        assert!(element.path.ends_with("notes.txt"));

        lexer.advance(1);
        let element = lexer.unexpected(NUMBER);
        let element = element.as_unexpected().unwrap();
        assert_eq!(element.actual, "end of input");
        assert_eq!((element.row, element.col), (1, 2));
    }

    #[test]
    fn empty_source_names_path() {
        let error = Lexer::from_source("empty.md", "").err().unwrap();
        assert_eq!(error.to_string(), "no input given to empty.md");
    }

    #[test]
    fn tokenize_ignores_cursor_position() {
        let mut lexer = Lexer::new("ab").unwrap();
        lexer.next();

        let tokens = lexer.tokenize();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "ab");
    }

    proptest! {
        #[test]
        fn tokens_cover_input(text in "\\PC{1,64}") {
            let tokens = Lexer::new(&text).unwrap().tokenize();

            let mut end = TextSize::new(0);
            for token in &tokens {
                prop_assert_eq!(token.start(), end);
                end = token.end();
            }
            prop_assert_eq!(usize::from(end), text.len());

            let joined: String = tokens.iter().map(|token| token.text).collect();
            prop_assert_eq!(joined, text);
        }
    }
}
