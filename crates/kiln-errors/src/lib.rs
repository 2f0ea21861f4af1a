//! Error types shared by the kiln lexer, parsers and tree queries.

use std::fmt::{self, Display};
use std::ops::Range;

pub use annotate_snippets::Renderer;
use annotate_snippets::{Level, Snippet};
use camino::{Utf8Path, Utf8PathBuf};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure of a lexing or parsing attempt. Every variant is terminal: there is
/// no recovery and no partial tree.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no input given to {}", origin(.path.as_deref()))]
    EmptyInput { path: Option<Utf8PathBuf> },

    #[error(transparent)]
    UnexpectedElement(Box<UnexpectedElement>),

    #[error("buffer underrun at offset {offset}: {needed} bytes needed, {remaining} remaining")]
    BufferUnderrun { offset: usize, needed: usize, remaining: usize },

    #[error("invalid {encoding} string of {len} bytes at offset {offset}")]
    Decode { offset: usize, len: usize, encoding: &'static str },
}

impl Error {
    pub fn empty_input(path: Option<&Utf8Path>) -> Self {
        Self::EmptyInput { path: path.map(Utf8Path::to_path_buf) }
    }

    /// The unexpected-element details, if this is a strict-consumption failure.
    pub fn as_unexpected(&self) -> Option<&UnexpectedElement> {
        match self {
            Self::UnexpectedElement(element) => Some(element),
            _ => None,
        }
    }
}

impl From<UnexpectedElement> for Error {
    fn from(element: UnexpectedElement) -> Self {
        Self::UnexpectedElement(Box::new(element))
    }
}

/// Name used for inputs that were not loaded from a path.
pub const MEMORY_ORIGIN: &str = "<memory>";

fn origin(path: Option<&Utf8Path>) -> &str {
    path.map_or(MEMORY_ORIGIN, Utf8Path::as_str)
}

/// The path diagnostics report for an input: absolute when it can be made
/// so, [`MEMORY_ORIGIN`] when there is none.
pub fn origin_path(path: Option<&Utf8Path>) -> Utf8PathBuf {
    let Some(path) = path else {
        return Utf8PathBuf::from(MEMORY_ORIGIN);
    };

    std::path::absolute(path)
        .ok()
        .and_then(|absolute| Utf8PathBuf::from_path_buf(absolute).ok())
        .unwrap_or_else(|| path.to_path_buf())
}

/// A row or column for [`UnexpectedElement`], saturating at `u32::MAX`.
pub fn position(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Source lines around an offending element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excerpt {
    pub source: String,
    /// One-based line number of the first line of `source`.
    pub first_line: usize,
    /// Byte range inside `source` to underline.
    pub caret: Range<usize>,
}

impl Excerpt {
    /// Cuts the whole lines of `text` spanning from `from` to the end of
    /// `caret`, both given as byte offsets into `text`.
    pub fn lines(text: &str, from: usize, caret: Range<usize>) -> Self {
        let from = from.min(caret.start);
        let start = text[..from].rfind('\n').map_or(0, |newline| newline + 1);
        let end = text[caret.end..].find('\n').map_or(text.len(), |newline| caret.end + newline);

        Self {
            source: text[start..end].to_owned(),
            first_line: text[..start].matches('\n').count() + 1,
            caret: caret.start - start..caret.end.min(end) - start,
        }
    }
}

/// A strict consumption met an element of the wrong kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnexpectedElement {
    pub path: Utf8PathBuf,
    /// Zero-based row of the offending element.
    pub row: u32,
    /// Zero-based column of the offending element.
    pub col: u32,
    pub expected: String,
    pub actual: String,
    pub excerpt: Excerpt,
    /// Text of the elements consumed since the last collection point.
    pub recent: Vec<String>,
}

impl UnexpectedElement {
    pub fn render<'a>(&'a self, renderer: &'a Renderer) -> impl Display + 'a {
        Rendered { element: self, renderer }
    }
}

impl Display for UnexpectedElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(&Renderer::plain()).fmt(f)
    }
}

impl std::error::Error for UnexpectedElement {}

struct Rendered<'a> {
    element: &'a UnexpectedElement,
    renderer: &'a Renderer,
}

impl Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let element = self.element;
        let title = format!(
            "unexpected `{}` at row {}, col {}: expected `{}`",
            element.actual.escape_debug(),
            element.row,
            element.col,
            element.expected,
        );
        let label = format!("expected `{}`", element.expected);
        let recent = format!("last tokens: {:?}", element.recent);

        let mut message = Level::Error.title(&title).snippet(
            Snippet::source(&element.excerpt.source)
                .line_start(element.excerpt.first_line)
                .origin(element.path.as_str())
                .annotation(Level::Error.span(element.excerpt.caret.clone()).label(&label)),
        );
        if !element.recent.is_empty() {
            message = message.footer(Level::Note.title(&recent));
        }

        write!(f, "{}", self.renderer.render(message))
    }
}

/// A path query that does not follow the query grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid path query at offset {offset}: {message}")]
pub struct QueryError {
    pub offset: usize,
    pub message: String,
}

impl QueryError {
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        Self { offset, message: message.into() }
    }
}
