//! Attribute values and the literal grammar used by path-query predicates.

use std::fmt;

use kiln_cursor::{Cursor as _, SliceCursor};
use kiln_errors::QueryError;

/// A node attribute or a literal from a query predicate.
#[derive(Clone, Debug)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Written `[..]` or `(..)`.
    List(Vec<Value>),
    /// Written `{..}`. Equality ignores order.
    Set(Vec<Value>),
}

impl Value {
    /// Parses a complete literal such as `42`, `-1.5e3`, `'it\'s'`, `true` or
    /// `["a", ("b", 2)]`.
    pub fn parse(text: &str) -> Result<Self, QueryError> {
        let chars: Vec<char> = text.chars().collect();
        let mut cursor = SliceCursor::new(&chars);

        let value = parse_value(&mut cursor)?;
        skip_ws(&mut cursor);
        if cursor.is_active() {
            return Err(QueryError::new(cursor.pos(), "unexpected trailing input"));
        }
        Ok(value)
    }

    /// Membership in a list or set, or substring of a string. `None` when
    /// `self` cannot contain anything.
    pub fn contains(&self, needle: &Self) -> Option<bool> {
        match (self, needle) {
            (Self::List(items) | Self::Set(items), _) => Some(items.contains(needle)),
            (Self::Str(haystack), Self::Str(needle)) => Some(haystack.contains(needle.as_str())),
            (Self::Str(_), _) => Some(false),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(text) => Some(text),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (&Self::Int(a), &Self::Float(b)) | (&Self::Float(b), &Self::Int(a)) => a as f64 == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Set(a), Self::Set(b)) => {
                a.iter().all(|item| b.contains(item)) && b.iter().all(|item| a.contains(item))
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value:?}"),
            Self::Str(value) => write!(f, "\"{}\"", value.escape_debug()),
            Self::List(items) => write_items(f, '[', items, ']'),
            Self::Set(items) => write_items(f, '{', items, '}'),
        }
    }
}

fn write_items(
    f: &mut fmt::Formatter<'_>,
    open: char,
    items: &[Value],
    close: char,
) -> fmt::Result {
    write!(f, "{open}")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "{close}")
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

pub(crate) fn skip_ws(cursor: &mut SliceCursor<'_, char>) {
    cursor.skip_while(|c| c.is_whitespace());
}

/// Deepest nesting of list and set literals.
pub const MAX_LITERAL_DEPTH: usize = 64;

/// Parses one literal starting at the cursor, leading whitespace allowed.
pub(crate) fn parse_value(cursor: &mut SliceCursor<'_, char>) -> Result<Value, QueryError> {
    parse_nested(cursor, 0)
}

fn parse_nested(cursor: &mut SliceCursor<'_, char>, depth: usize) -> Result<Value, QueryError> {
    skip_ws(cursor);
    let start = cursor.pos();

    if depth > MAX_LITERAL_DEPTH {
        let message = format!("literal nested deeper than {MAX_LITERAL_DEPTH}");
        return Err(QueryError::new(start, message));
    }

    match cursor.get().copied() {
        None => Err(QueryError::new(start, "expected a value")),
        Some('"' | '\'') => parse_string(cursor).map(Value::Str),
        Some('[') => parse_items(cursor, ']', depth).map(Value::List),
        Some('(') => parse_items(cursor, ')', depth).map(Value::List),
        Some('{') => {
            let mut items = parse_items(cursor, '}', depth)?;
            dedup(&mut items);
            Ok(Value::Set(items))
        }
        Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => parse_number(cursor),
        Some(c) if c.is_alphabetic() => {
            cursor.skip_while(|c| c.is_alphanumeric() || *c == '_');
            let word: String = cursor.buffer()[start..cursor.pos()].iter().collect();
            match word.as_str() {
                "true" | "True" => Ok(Value::Bool(true)),
                "false" | "False" => Ok(Value::Bool(false)),
                _ => Err(QueryError::new(start, format!("unknown literal `{word}`"))),
            }
        }
        Some(c) => Err(QueryError::new(start, format!("unexpected `{c}`, expected a value"))),
    }
}

fn parse_string(cursor: &mut SliceCursor<'_, char>) -> Result<String, QueryError> {
    let start = cursor.pos();
    let Some(&quote) = cursor.get() else {
        return Err(QueryError::new(start, "expected a string"));
    };
    cursor.next();

    let mut text = String::new();
    loop {
        let Some(&c) = cursor.get() else {
            return Err(QueryError::new(start, "unterminated string"));
        };
        cursor.next();

        match c {
            _ if c == quote => return Ok(text),
            '\\' => {
                let Some(&escaped) = cursor.get() else {
                    return Err(QueryError::new(start, "unterminated string"));
                };
                cursor.next();
                match escaped {
                    'n' => text.push('\n'),
                    't' => text.push('\t'),
                    'r' => text.push('\r'),
                    '0' => text.push('\0'),
                    '\\' | '\'' | '"' => text.push(escaped),
                    other => {
                        text.push('\\');
                        text.push(other);
                    }
                }
            }
            _ => text.push(c),
        }
    }
}

fn parse_number(cursor: &mut SliceCursor<'_, char>) -> Result<Value, QueryError> {
    let start = cursor.pos();
    let mut float = false;

    cursor.consume_any(&['-', '+']);
    let digits = cursor.skip_while(char::is_ascii_digit);
    let mut fraction = 0;
    if cursor.consume('.') {
        float = true;
        fraction = cursor.skip_while(char::is_ascii_digit);
    }
    if digits + fraction == 0 {
        return Err(QueryError::new(start, "expected digits"));
    }

    let exponent = cursor.checkpoint();
    if cursor.consume_any(&['e', 'E']) {
        cursor.consume_any(&['-', '+']);
        if cursor.skip_while(char::is_ascii_digit) == 0 {
            cursor.rewind(exponent);
        } else {
            float = true;
        }
    }

    let text: String = cursor.buffer()[start..cursor.pos()].iter().collect();
    let parsed = if float {
        text.parse().map(Value::Float).ok()
    } else {
        text.parse().map(Value::Int).ok()
    };
    parsed.ok_or_else(|| QueryError::new(start, format!("number `{text}` out of range")))
}

fn parse_items(
    cursor: &mut SliceCursor<'_, char>,
    close: char,
    depth: usize,
) -> Result<Vec<Value>, QueryError> {
    let open = cursor.pos();
    cursor.next();

    let mut items = Vec::new();
    loop {
        skip_ws(cursor);
        if cursor.consume(close) {
            return Ok(items);
        }

        items.push(parse_nested(cursor, depth + 1)?);

        skip_ws(cursor);
        if cursor.consume(',') {
            continue;
        }
        if cursor.consume(close) {
            return Ok(items);
        }
        return Err(match cursor.get() {
            None => QueryError::new(open, format!("unclosed literal, expected `{close}`")),
            Some(c) => QueryError::new(
                cursor.pos(),
                format!("unexpected `{c}`, expected `,` or `{close}`"),
            ),
        });
    }
}

fn dedup(items: &mut Vec<Value>) {
    let mut unique: Vec<Value> = Vec::with_capacity(items.len());
    for item in items.drain(..) {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    *items = unique;
}
