use std::fmt::{self, Display};
use std::ops::Range;

use camino::{Utf8Path, Utf8PathBuf};
use kiln_cursor::{Cursor, Matcher};
use kiln_errors::{Error, Excerpt, MEMORY_ORIGIN, Result, UnexpectedElement, origin_path};
use kiln_lexer::{Lexer, Token, TokenKind};
use kiln_tree::{Tree, TreeBuilder};
use text_size::{TextRange, TextSize};
use tracing::{debug, error};

use crate::{Boundary, Lexical, TextFormat};

/// Number of tokens listed in unexpected-element diagnostics.
pub const DEFAULT_WINDOW: usize = 8;

/// Recursive-descent driver over the tokens of one text.
///
/// The parser is a [`Cursor`] over [`Token`]s, so every consumption helper
/// takes a [`TokenKind`] or a [`TokenSet`](kiln_lexer::TokenSet). On top of
/// that it keeps a [`Boundary`]: grammar rules consume the tokens of a node
/// and then collect everything since the previous collection as its payload.
pub struct TextParser<'a> {
    source: &'a str,
    path: Option<Utf8PathBuf>,
    tokens: Vec<Token<'a>>,
    pos: usize,
    boundary: Boundary,
    window: usize,
}

impl<'a> TextParser<'a> {
    /// Lexes `text` and positions the parser on its first token.
    pub fn new(text: &'a str) -> Result<Self> {
        let tokens = Lexer::new(text)?.tokenize();
        Ok(Self::from_parts(text, None, tokens))
    }

    /// Like [`new`](Self::new), naming `path` as the origin in diagnostics.
    pub fn from_source(path: impl Into<Utf8PathBuf>, text: &'a str) -> Result<Self> {
        let path = path.into();
        let tokens = Lexer::from_source(path.clone(), text)?.tokenize();
        Ok(Self::from_parts(text, Some(path), tokens))
    }

    /// Parses tokens lexed elsewhere. `source` is the text they slice.
    pub fn from_tokens(source: &'a str, tokens: Vec<Token<'a>>) -> Result<Self> {
        if tokens.is_empty() {
            return Err(Error::empty_input(None));
        }
        Ok(Self::from_parts(source, None, tokens))
    }

    fn from_parts(source: &'a str, path: Option<Utf8PathBuf>, tokens: Vec<Token<'a>>) -> Self {
        Self {
            source,
            path,
            tokens,
            pos: 0,
            boundary: Boundary::default(),
            window: DEFAULT_WINDOW,
        }
    }

    /// Limits how many recent tokens a diagnostic lists.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn path(&self) -> Option<&Utf8Path> {
        self.path.as_deref()
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    pub fn current_kind(&self) -> Option<TokenKind> {
        self.get().map(|token| token.kind)
    }

    /// Whether the current token matches, without consuming it.
    pub fn at<M: Matcher<Token<'a>>>(&self, matcher: M) -> bool {
        self.get().is_some_and(|token| matcher.matches(token))
    }

    /// Steps over the current token if it matches `expected`, fails
    /// otherwise.
    pub fn consume_strict<M>(&mut self, expected: M) -> Result<()>
    where
        M: Matcher<Token<'a>> + Display,
    {
        if self.consume_if(|token| expected.matches(token)) {
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Tokens consumed since the last collection, then moves the collection
    /// point to the cursor.
    pub fn collect_tokens(&mut self) -> &[Token<'a>] {
        let span = self.boundary.collect(self.pos);
        &self.tokens[span]
    }

    /// Source text covered by the tokens [`collect_tokens`](Self::collect_tokens)
    /// would return.
    pub fn collect_text(&mut self) -> &'a str {
        self.collect_lexeme().text
    }

    pub fn collect_lexeme(&mut self) -> Lexeme<'a> {
        let span = self.boundary.collect(self.pos);
        self.lexeme(span)
    }

    /// Collects into an owned [`Lexical`] payload.
    pub fn collect_lexical(&mut self) -> Lexical<'a> {
        let span = self.boundary.collect(self.pos);
        Lexical { tokens: self.tokens[span.clone()].to_vec(), lexeme: self.lexeme(span) }
    }

    /// Steps over the current token and collects.
    pub fn discard(&mut self) -> &[Token<'a>] {
        self.next();
        self.collect_tokens()
    }

    /// Tokens consumed since the last collection.
    pub fn pending(&self) -> &[Token<'a>] {
        &self.tokens[self.boundary.pending(self.pos)]
    }

    pub fn pending_len(&self) -> usize {
        self.boundary.pending(self.pos).len()
    }

    pub fn pending_text(&self) -> &'a str {
        self.lexeme(self.boundary.pending(self.pos)).text
    }

    fn lexeme(&self, span: Range<usize>) -> Lexeme<'a> {
        let start = self.offset_of(span.start);
        let end = match span.end.checked_sub(1) {
            Some(last) if !span.is_empty() => self.tokens[last].end(),
            _ => start,
        };
        let range = TextRange::new(start, end);
        let (row, col) = self.position_of(span.start);

        Lexeme { text: &self.source[range], range, row, col }
    }

    /// Byte offset where the token at `index` starts, or the end of the
    /// source past the last token.
    fn offset_of(&self, index: usize) -> TextSize {
        match (self.tokens.get(index), self.tokens.last()) {
            (Some(token), _) => token.start(),
            (None, Some(last)) => last.end(),
            (None, None) => TextSize::new(0),
        }
    }

    fn position_of(&self, index: usize) -> (u32, u32) {
        if let Some(token) = self.tokens.get(index) {
            return (token.row, token.col);
        }

        let Some(last) = self.tokens.last() else {
            return (0, 0);
        };
        last.text.chars().fold((last.row, last.col), |(row, col), c| {
            if c == '\n' { (row + 1, 0) } else { (row, col + 1) }
        })
    }

    /// The error for meeting the current token where `expected` was required.
    ///
    /// The excerpt spans from the pending tokens to the offending one, whole
    /// lines, with the offending token underlined.
    pub fn unexpected(&self, expected: impl Display) -> Error {
        let (row, col) = self.position_of(self.pos);
        let pending = self.boundary.pending(self.pos);

        let offset = usize::from(self.offset_of(self.pos));
        let (actual, caret) = match self.get() {
            Some(token) => (token.text.to_owned(), Range::<usize>::from(token.range)),
            None => ("end of input".to_owned(), offset..offset),
        };
        let from = usize::from(self.offset_of(pending.start));

        let shown = &self.tokens[pending.start..(self.pos + 1).min(self.tokens.len())];
        let skip = shown.len().saturating_sub(self.window);
        let recent = shown[skip..].iter().map(|token| token.text.to_owned()).collect();

        let element = UnexpectedElement {
            path: origin_path(self.path()),
            row,
            col,
            expected: expected.to_string(),
            actual,
            excerpt: Excerpt::lines(self.source, from, caret),
            recent,
        };

        error!(
            path = %element.path,
            row = element.row,
            col = element.col,
            expected = %element.expected,
            actual = %element.actual,
            "unexpected token"
        );
        element.into()
    }

    /// Runs `format` over the whole input and returns the finished tree.
    pub fn parse<F: TextFormat<'a>>(mut self, format: &mut F) -> Result<Tree<F::Node>> {
        debug!(
            origin = self.path().map_or(MEMORY_ORIGIN, Utf8Path::as_str),
            tokens = self.tokens.len(),
            "parsing"
        );

        let mut tree = TreeBuilder::new(format.root(self.path()));
        format.parse_format(&mut self, &mut tree)?;
        Ok(tree.finish())
    }
}

impl<'a> Cursor for TextParser<'a> {
    type Item = Token<'a>;

    #[inline]
    fn buffer(&self) -> &[Token<'a>] {
        &self.tokens
    }

    #[inline]
    fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    fn set_pos(&mut self, pos: usize) {
        debug_assert!(pos <= self.tokens.len());
        self.pos = pos;
    }
}

/// A collected slice of the source with the location of its first token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Lexeme<'a> {
    pub text: &'a str,
    pub range: TextRange,
    pub row: u32,
    pub col: u32,
}

impl Lexeme<'_> {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl Display for Lexeme<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}

#[cfg(test)]
mod tests {
    use kiln_lexer::TokenKind::*;
    use kiln_lexer::TokenSet;
    use pretty_assertions::assert_eq;

    use super::*;

    fn texts<'a>(tokens: &[Token<'a>]) -> Vec<&'a str> {
        tokens.iter().map(|token| token.text).collect()
    }

    #[test]
    fn empty_input() {
        assert!(matches!(TextParser::new(""), Err(Error::EmptyInput { path: None })));
        assert!(matches!(
            TextParser::from_source("a.md", ""),
            Err(Error::EmptyInput { path: Some(path) }) if path.as_str() == "a.md"
        ));
        assert!(TextParser::from_tokens("", Vec::new()).is_err());
    }

    #[test]
    fn strict_mismatch_reports_location() {
        let mut parser = TextParser::new("ab\ncd").unwrap();

        let error = parser.consume_strict(NUMBER).unwrap_err();
        let element = error.as_unexpected().unwrap();

        assert_eq!((element.row, element.col), (0, 0));
        assert_eq!(element.expected, "digit");
        assert_eq!(element.actual, "ab");
        assert_eq!(element.path.as_str(), MEMORY_ORIGIN);
        assert_eq!(parser.pos(), 0);
    }

    #[test]
    fn diagnostic_spans_pending_lines() {
        let mut parser = TextParser::from_source("doc.txt", "key: value\nnext = 1").unwrap();

        parser.consume_strict(WORD).unwrap();
        parser.consume_strict(COLON).unwrap();
        parser.collect_tokens();
        parser.consume_while(TokenSet::new([SPACE, WORD, LINE_FEED]));

        let error = parser.consume_strict(COLON).unwrap_err();
        let element = error.as_unexpected().unwrap();

        assert_eq!((element.row, element.col), (1, 5));
        assert_eq!(element.actual, "=");
        assert_eq!(element.excerpt.source, "key: value\nnext = 1");
        assert_eq!(element.excerpt.first_line, 1);
        assert_eq!(&element.excerpt.source[element.excerpt.caret.clone()], "=");
        assert_eq!(element.recent, vec![" ", "value", "\n", "next", " ", "="]);
        assert!(element.path.is_absolute());

        let message = error.to_string();
        assert!(message.contains("doc.txt"), "{message}");
        assert!(message.contains("expected `:`"), "{message}");
    }

    #[test]
    fn recent_window_is_bounded() {
        let mut parser = TextParser::new("a b c d e").unwrap().with_window(3);
        parser.consume_while(TokenSet::new([WORD, SPACE]));

        let error = parser.unexpected(NUMBER);
        let element = error.as_unexpected().unwrap();

        assert_eq!(element.actual, "end of input");
        assert_eq!((element.row, element.col), (0, 9));
        assert_eq!(element.recent, vec!["d", " ", "e"]);
        assert_eq!(element.excerpt.caret, 9..9);
    }

    #[test]
    fn collection_points() {
        let mut parser = TextParser::new("fun caller end").unwrap();

        parser.consume_strict(WORD).unwrap();
        assert_eq!(parser.pending_text(), "fun");
        assert_eq!(texts(parser.collect_tokens()), vec!["fun"]);

        parser.consume(SPACE);
        parser.consume(WORD);
        let name = parser.collect_lexeme();
        assert_eq!(name.text, " caller");
        assert_eq!((name.row, name.col), (0, 3));
        assert_eq!(name.range, TextRange::new(3.into(), 10.into()));

        assert!(parser.collect_lexeme().is_empty());

        assert_eq!(texts(parser.discard()), vec![" "]);
        assert_eq!(parser.pending_len(), 0);
        parser.consume(WORD);
        assert_eq!(parser.collect_text(), "end");
        assert!(parser.is_eof());

        let tail = parser.collect_lexeme();
        assert_eq!(tail.range, TextRange::empty(14.into()));
        assert_eq!((tail.row, tail.col), (0, 14));
    }

    #[test]
    fn rewind_behind_collection_point() {
        let mut parser = TextParser::new("a b").unwrap();
        let start = parser.checkpoint();

        parser.advance(2);
        parser.collect_tokens();
        parser.rewind(start);

        assert!(parser.pending().is_empty());
        assert!(parser.collect_tokens().is_empty());
        parser.next();
        assert_eq!(parser.collect_text(), "a");
    }

    #[test]
    fn set_consumption() {
        const TEXT: TokenSet = TokenSet::new([WORD, NUMBER, SPACE]);
        let mut parser = TextParser::new("abc 12 x\n# h").unwrap();

        assert!(parser.at(TEXT));
        parser.consume_while(TEXT);
        assert_eq!(parser.current_kind(), Some(LINE_FEED));
        assert_eq!(parser.collect_text(), "abc 12 x");

        parser.consume_until(NUMBER_SIGN);
        parser.consume_strict(NUMBER_SIGN).unwrap();
        assert!(parser.consume_any(&[SPACE, HORIZONTAL_TAB]));

        let error = parser.consume_strict(TokenSet::new([NUMBER, COLON])).unwrap_err();
        let element = error.as_unexpected().unwrap();
        assert_eq!(element.expected, "one of `:`, `digit`");
        assert_eq!(element.actual, "h");
    }

    #[test]
    fn tokens_from_elsewhere() {
        let text = "x y";
        let tokens = Lexer::new(text).unwrap().tokenize();
        let mut parser = TextParser::from_tokens(text, tokens).unwrap();

        parser.consume_until(SPACE);
        assert_eq!(parser.collect_text(), "x");
    }
}
