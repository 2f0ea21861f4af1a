use std::ops::Range;

/// The collection point of a parser: the span handed out by the last
/// collection ends at `end`, and the next one starts there.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Boundary {
    begin: usize,
    end: usize,
}

impl Boundary {
    /// Start of the last collected span.
    #[inline]
    pub fn begin(&self) -> usize {
        self.begin
    }

    /// End of the last collected span, start of the pending one.
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Closes the pending span at `pos` and returns it. After a rewind to
    /// before the collection point the span is empty.
    pub fn collect(&mut self, pos: usize) -> Range<usize> {
        let begin = self.end.min(pos);
        self.begin = begin;
        self.end = pos;
        begin..pos
    }

    /// Span between the collection point and `pos`, without moving.
    pub fn pending(&self, pos: usize) -> Range<usize> {
        self.end.min(pos)..pos
    }
}
