use std::fmt;

use kiln_cursor::Matcher;

/// Kinds of tokens produced by the [`Lexer`](crate::Lexer).
///
/// Every registered single character has its own kind. `SYMBOL`, `NUMBER` and
/// `WORD` are synthetic: the lexer emits them for unregistered characters,
/// digit runs and identifier runs.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[repr(u8)]
pub enum TokenKind {
    UNDEFINED,

    LINE_FEED,
    CARRIAGE_RETURN,
    SPACE,
    HORIZONTAL_TAB,
    VERTICAL_TAB,

    EXCLAMATION_MARK,
    QUOTATION_MARK,
    NUMBER_SIGN,
    LEFT_PAREN,
    RIGHT_PAREN,
    ASTERISK,
    MINUS,
    PERIOD,
    SLASH,
    COLON,
    SEMICOLON,
    EQUAL_SIGN,
    LEFT_BRACKET,
    BACKSLASH,
    RIGHT_BRACKET,
    BACKTICK,
    LEFT_BRACE,
    VERTICAL_BAR,
    RIGHT_BRACE,

    SYMBOL,
    NUMBER,
    WORD,
}

use TokenKind::*;

impl TokenKind {
    /// Looks up the kind registered for `c`, or `UNDEFINED`.
    pub const fn from_char(c: char) -> Self {
        match c {
            '\n' => LINE_FEED,
            '\r' => CARRIAGE_RETURN,
            ' ' => SPACE,
            '\t' => HORIZONTAL_TAB,
            '\x0B' => VERTICAL_TAB,
            '!' => EXCLAMATION_MARK,
            '"' => QUOTATION_MARK,
            '#' => NUMBER_SIGN,
            '(' => LEFT_PAREN,
            ')' => RIGHT_PAREN,
            '*' => ASTERISK,
            '-' => MINUS,
            '.' => PERIOD,
            '/' => SLASH,
            ':' => COLON,
            ';' => SEMICOLON,
            '=' => EQUAL_SIGN,
            '[' => LEFT_BRACKET,
            '\\' => BACKSLASH,
            ']' => RIGHT_BRACKET,
            '`' => BACKTICK,
            '{' => LEFT_BRACE,
            '|' => VERTICAL_BAR,
            '}' => RIGHT_BRACE,
            _ => UNDEFINED,
        }
    }

    /// The kind of token that `c` starts.
    pub const fn classify(c: char) -> Self {
        match Self::from_char(c) {
            UNDEFINED if c.is_ascii_digit() => NUMBER,
            UNDEFINED if is_word_start(c) => WORD,
            UNDEFINED => SYMBOL,
            kind => kind,
        }
    }

    /// The character this kind is registered for. Synthetic kinds have none.
    pub const fn as_char(self) -> Option<char> {
        let c = match self {
            LINE_FEED => '\n',
            CARRIAGE_RETURN => '\r',
            SPACE => ' ',
            HORIZONTAL_TAB => '\t',
            VERTICAL_TAB => '\x0B',
            EXCLAMATION_MARK => '!',
            QUOTATION_MARK => '"',
            NUMBER_SIGN => '#',
            LEFT_PAREN => '(',
            RIGHT_PAREN => ')',
            ASTERISK => '*',
            MINUS => '-',
            PERIOD => '.',
            SLASH => '/',
            COLON => ':',
            SEMICOLON => ';',
            EQUAL_SIGN => '=',
            LEFT_BRACKET => '[',
            BACKSLASH => '\\',
            RIGHT_BRACKET => ']',
            BACKTICK => '`',
            LEFT_BRACE => '{',
            VERTICAL_BAR => '|',
            RIGHT_BRACE => '}',
            UNDEFINED | SYMBOL | NUMBER | WORD => return None,
        };
        Some(c)
    }

    pub const fn is_whitespace(self) -> bool {
        matches!(self, LINE_FEED | CARRIAGE_RETURN | SPACE | HORIZONTAL_TAB | VERTICAL_TAB)
    }

    /// Kinds that only the lexer produces, never [`from_char`](Self::from_char).
    pub const fn is_synthetic(self) -> bool {
        matches!(self, SYMBOL | NUMBER | WORD)
    }

    fn description(self) -> &'static str {
        match self {
            UNDEFINED => "undefined",
            LINE_FEED => "line feed",
            CARRIAGE_RETURN => "carriage return",
            SPACE => "space",
            HORIZONTAL_TAB => "tab",
            VERTICAL_TAB => "vertical tab",
            SYMBOL => "symbol",
            NUMBER => "digit",
            WORD => "word",
            _ => "",
        }
    }
}

/// Character classes: `NUMBER` accepts digits, `WORD` any character that may
/// continue a word, `SYMBOL` any unregistered non-word character.
impl Matcher<char> for TokenKind {
    fn matches(&self, &c: &char) -> bool {
        match *self {
            UNDEFINED => false,
            NUMBER => c.is_ascii_digit(),
            WORD => is_word_continue(c),
            SYMBOL => matches!(Self::classify(c), SYMBOL),
            kind => matches!(kind.as_char(), Some(registered) if registered == c),
        }
    }
}

pub(crate) const fn is_word_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

pub(crate) const fn is_word_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_char() {
            Some(c) if !self.is_whitespace() => write!(f, "{c}"),
            _ => f.write_str(self.description()),
        }
    }
}
