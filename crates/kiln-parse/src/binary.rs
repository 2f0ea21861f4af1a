use std::fmt::{Display, Write as _};

use camino::{Utf8Path, Utf8PathBuf};
use kiln_cursor::Cursor;
use kiln_errors::{
    Error, Excerpt, MEMORY_ORIGIN, Result, UnexpectedElement, origin_path, position,
};
use kiln_tree::{Tree, TreeBuilder};
use tracing::{debug, error};

use crate::text::DEFAULT_WINDOW;
use crate::{Binary, BinaryFormat, Boundary, Decode, Encoding, Endian};

/// Recursive-descent driver over a byte buffer.
///
/// Reads never truncate: when fewer bytes remain than a read needs it fails
/// with [`Error::BufferUnderrun`] and the cursor stays where it was.
pub struct BinaryParser<'a> {
    bytes: &'a [u8],
    path: Option<Utf8PathBuf>,
    pos: usize,
    boundary: Boundary,
    window: usize,
}

impl<'a> BinaryParser<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        Self::with_path(None, bytes)
    }

    /// Like [`new`](Self::new), naming `path` as the origin in diagnostics.
    pub fn from_source(path: impl Into<Utf8PathBuf>, bytes: &'a [u8]) -> Result<Self> {
        Self::with_path(Some(path.into()), bytes)
    }

    fn with_path(path: Option<Utf8PathBuf>, bytes: &'a [u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::empty_input(path.as_deref()));
        }
        Ok(Self { bytes, path, pos: 0, boundary: Boundary::default(), window: DEFAULT_WINDOW })
    }

    /// Limits how many recent bytes a diagnostic shows.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn path(&self) -> Option<&Utf8Path> {
        self.path.as_deref()
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// Steps over the current byte if it equals `expected`, fails otherwise.
    pub fn consume_strict(&mut self, expected: u8) -> Result<()> {
        if self.consume(expected) {
            Ok(())
        } else {
            Err(self.unexpected(format_args!("{expected:#04x}")))
        }
    }

    /// Steps over `expected` if the input continues with it.
    pub fn consume_bytes(&mut self, expected: &[u8]) -> bool {
        let matched = self.peek_bytes(expected.len()) == Some(expected);
        if matched {
            self.advance(expected.len());
        }
        matched
    }

    /// Like [`consume_bytes`](Self::consume_bytes), failing at the first byte
    /// that differs.
    pub fn consume_strict_bytes(&mut self, expected: &[u8]) -> Result<()> {
        if self.consume_bytes(expected) {
            return Ok(());
        }

        let start = self.checkpoint();
        let same = expected.iter().zip(self.rest()).take_while(|(a, b)| a == b).count();
        self.advance(same);
        let error = self.unexpected(format_args!("{:#04x}", expected[same]));
        self.rewind(start);
        Err(error)
    }

    /// Steps over `n` bytes.
    pub fn consume_n(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    /// Steps over `n` bytes and returns them.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(n).ok_or_else(|| self.underrun(n))?;
        self.advance(n);
        Ok(bytes)
    }

    /// The bytes from the cursor to the end.
    pub fn rest(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    fn peek_bytes(&self, n: usize) -> Option<&'a [u8]> {
        self.bytes.get(self.pos..self.pos.checked_add(n)?)
    }

    fn underrun(&self, needed: usize) -> Error {
        Error::BufferUnderrun { offset: self.pos, needed, remaining: self.remaining() }
    }

    /// Bytes consumed since the last collection, then moves the collection
    /// point to the cursor.
    pub fn collect_bytes(&mut self) -> &'a [u8] {
        let span = self.boundary.collect(self.pos);
        &self.bytes[span]
    }

    /// Collects into a [`Binary`] payload remembering where the bytes start.
    pub fn collect_binary(&mut self) -> Binary<'a> {
        let span = self.boundary.collect(self.pos);
        Binary { offset: span.start, bytes: &self.bytes[span] }
    }

    /// Steps over the current byte and collects.
    pub fn discard(&mut self) -> &'a [u8] {
        self.next();
        self.collect_bytes()
    }

    /// Bytes consumed since the last collection.
    pub fn pending(&self) -> &'a [u8] {
        &self.bytes[self.boundary.pending(self.pos)]
    }

    pub fn read<T: Decode>(&mut self, endian: Endian) -> Result<T> {
        let value = self.peek_bytes(T::WIDTH).and_then(|bytes| T::decode(bytes, endian));
        let value = value.ok_or_else(|| self.underrun(T::WIDTH))?;
        self.advance(T::WIDTH);
        Ok(value)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.read(Endian::Little)
    }

    pub fn read_u16(&mut self, endian: Endian) -> Result<u16> {
        self.read(endian)
    }

    pub fn read_i16(&mut self, endian: Endian) -> Result<i16> {
        self.read(endian)
    }

    pub fn read_u32(&mut self, endian: Endian) -> Result<u32> {
        self.read(endian)
    }

    pub fn read_i32(&mut self, endian: Endian) -> Result<i32> {
        self.read(endian)
    }

    pub fn read_u64(&mut self, endian: Endian) -> Result<u64> {
        self.read(endian)
    }

    pub fn read_i64(&mut self, endian: Endian) -> Result<i64> {
        self.read(endian)
    }

    pub fn read_f32(&mut self, endian: Endian) -> Result<f32> {
        self.read(endian)
    }

    pub fn read_f64(&mut self, endian: Endian) -> Result<f64> {
        self.read(endian)
    }

    /// Reads a string stored in `len` bytes.
    pub fn read_string(&mut self, len: usize, encoding: Encoding) -> Result<String> {
        let bytes = self.peek_bytes(len).ok_or_else(|| self.underrun(len))?;
        let text = encoding.decode(bytes).ok_or(Error::Decode {
            offset: self.pos,
            len,
            encoding: encoding.name(),
        })?;
        self.advance(len);
        Ok(text)
    }

    /// The error for meeting the current byte where `expected` was required.
    ///
    /// Rows do not exist in binary input: the row is always 0 and the column
    /// is the byte offset. The excerpt is a hex dump of the pending bytes.
    pub fn unexpected(&self, expected: impl Display) -> Error {
        let pending = self.boundary.pending(self.pos);
        let from = pending.start.max(self.pos.saturating_sub(self.window));
        let shown = &self.bytes[from..(self.pos + 1).min(self.bytes.len())];

        let mut dump = String::with_capacity(shown.len() * 3);
        for (i, byte) in shown.iter().enumerate() {
            if i > 0 {
                dump.push(' ');
            }
            let _ = write!(dump, "{byte:02x}");
        }

        let (actual, caret) = match self.get() {
            Some(byte) => {
                let start = (self.pos - from) * 3;
                (format!("{byte:#04x}"), start..start + 2)
            }
            None => ("end of input".to_owned(), dump.len()..dump.len()),
        };

        let element = UnexpectedElement {
            path: origin_path(self.path()),
            row: 0,
            col: position(self.pos),
            expected: expected.to_string(),
            actual,
            excerpt: Excerpt { source: dump, first_line: 1, caret },
            recent: shown.iter().map(|byte| format!("{byte:02x}")).collect(),
        };

        error!(
            path = %element.path,
            offset = self.pos,
            expected = %element.expected,
            actual = %element.actual,
            "unexpected byte"
        );
        element.into()
    }

    /// Runs `format` over the whole input and returns the finished tree.
    pub fn parse<F: BinaryFormat<'a>>(mut self, format: &mut F) -> Result<Tree<F::Node>> {
        debug!(
            origin = self.path().map_or(MEMORY_ORIGIN, Utf8Path::as_str),
            bytes = self.bytes.len(),
            "parsing"
        );

        let mut tree = TreeBuilder::new(format.root(self.path()));
        format.parse_format(&mut self, &mut tree)?;
        Ok(tree.finish())
    }
}

impl Cursor for BinaryParser<'_> {
    type Item = u8;

    #[inline]
    fn buffer(&self) -> &[u8] {
        self.bytes
    }

    #[inline]
    fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    fn set_pos(&mut self, pos: usize) {
        debug_assert!(pos <= self.bytes.len());
        self.pos = pos;
    }
}
