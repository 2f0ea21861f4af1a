use crate::Matcher;

/// A saved cursor position, see [`Cursor::checkpoint`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Checkpoint(usize);

impl Checkpoint {
    pub fn pos(self) -> usize {
        self.0
    }
}

/// Read-only position cursor over a finite buffer.
///
/// The position ranges over `0..=len`; `len` itself is the end sentinel where
/// [`get`](Cursor::get) returns `None`. Movement is clamped to that range, so
/// stepping past either end is never an error.
pub trait Cursor {
    type Item;

    /// The whole underlying buffer.
    fn buffer(&self) -> &[Self::Item];

    /// Current position.
    fn pos(&self) -> usize;

    /// Moves to `pos`. Callers keep `pos <= len`.
    fn set_pos(&mut self, pos: usize);

    #[inline]
    fn len(&self) -> usize {
        self.buffer().len()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.buffer().is_empty()
    }

    /// `true` while the cursor is inside the buffer.
    #[inline]
    fn is_active(&self) -> bool {
        self.pos() < self.len()
    }

    #[inline]
    fn is_eof(&self) -> bool {
        !self.is_active()
    }

    /// Number of elements from the current one to the end.
    #[inline]
    fn remaining(&self) -> usize {
        self.len().saturating_sub(self.pos())
    }

    #[inline]
    fn get(&self) -> Option<&Self::Item> {
        self.buffer().get(self.pos())
    }

    fn next(&mut self) -> Option<&Self::Item> {
        let pos = self.pos();
        if pos < self.len() {
            self.set_pos(pos + 1);
        }
        self.get()
    }

    fn prev(&mut self) -> Option<&Self::Item> {
        let pos = self.pos();
        if pos > 0 {
            self.set_pos(pos - 1);
        }
        self.get()
    }

    /// Moves `distance` elements forward and returns the element landed on.
    fn advance(&mut self, distance: usize) -> Option<&Self::Item> {
        let pos = self.pos().saturating_add(distance).min(self.len());
        self.set_pos(pos);
        self.get()
    }

    /// The element `distance` positions ahead, without moving.
    #[inline]
    fn peek(&self, distance: usize) -> Option<&Self::Item> {
        self.pos().checked_add(distance).and_then(|pos| self.buffer().get(pos))
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.pos())
    }

    /// Returns to a position saved with [`checkpoint`](Cursor::checkpoint).
    fn rewind(&mut self, checkpoint: Checkpoint) {
        let pos = checkpoint.0.min(self.len());
        self.set_pos(pos);
    }

    /// Whether the cursor moved forward since `checkpoint`.
    ///
    /// Grammar loops use this to assert that every iteration consumes input.
    fn made_progress(&self, checkpoint: Checkpoint) -> bool {
        self.pos() > checkpoint.0
    }

    /// Steps over the current element if `predicate` accepts it.
    fn consume_if(&mut self, mut predicate: impl FnMut(&Self::Item) -> bool) -> bool {
        let matched = self.get().is_some_and(|item| predicate(item));
        if matched {
            self.next();
        }
        matched
    }

    /// Steps over elements while `predicate` accepts them, returning how many.
    fn skip_while(&mut self, mut predicate: impl FnMut(&Self::Item) -> bool) -> usize {
        let start = self.pos();
        while self.get().is_some_and(|item| predicate(item)) {
            self.next();
        }
        self.pos() - start
    }

    /// Steps over elements until `predicate` accepts one or the end is hit.
    fn skip_until(&mut self, mut predicate: impl FnMut(&Self::Item) -> bool) -> usize {
        self.skip_while(|item| !predicate(item))
    }

    fn consume<M: Matcher<Self::Item>>(&mut self, matcher: M) -> bool {
        self.consume_if(|item| matcher.matches(item))
    }

    fn consume_any<M: Matcher<Self::Item>>(&mut self, set: &[M]) -> bool {
        self.consume(set)
    }

    fn consume_while<M: Matcher<Self::Item>>(&mut self, matcher: M) {
        self.skip_while(|item| matcher.matches(item));
    }

    fn consume_while_any<M: Matcher<Self::Item>>(&mut self, set: &[M]) {
        self.consume_while(set);
    }

    fn consume_until<M: Matcher<Self::Item>>(&mut self, matcher: M) {
        self.skip_until(|item| matcher.matches(item));
    }

    fn consume_until_any<M: Matcher<Self::Item>>(&mut self, set: &[M]) {
        self.consume_until(set);
    }
}

/// Cursor over a borrowed slice.
#[derive(Debug, Clone)]
pub struct SliceCursor<'a, T> {
    buffer: &'a [T],
    pos: usize,
}

impl<'a, T> SliceCursor<'a, T> {
    pub fn new(buffer: &'a [T]) -> Self {
        Self { buffer, pos: 0 }
    }

    /// The unconsumed tail of the buffer.
    pub fn rest(&self) -> &'a [T] {
        &self.buffer[self.pos..]
    }
}

impl<'a, T> From<&'a [T]> for SliceCursor<'a, T> {
    fn from(buffer: &'a [T]) -> Self {
        Self::new(buffer)
    }
}

impl<T> Cursor for SliceCursor<'_, T> {
    type Item = T;

    #[inline]
    fn buffer(&self) -> &[T] {
        self.buffer
    }

    #[inline]
    fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    fn set_pos(&mut self, pos: usize) {
        debug_assert!(pos <= self.buffer.len());
        self.pos = pos;
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    #[test]
    fn empty_buffer() {
        let mut cursor = SliceCursor::<char>::new(&[]);

        assert!(!cursor.is_active());
        assert_eq!(cursor.get(), None);
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.prev(), None);
        assert_eq!(cursor.peek(0), None);
        assert!(!cursor.consume('a'));
    }

    #[test]
    fn active_until_past_last_element() {
        let buffer = ['a'];
        let mut cursor = SliceCursor::new(&buffer);

        assert!(cursor.is_active());
        cursor.next();
        assert!(!cursor.is_active());
        assert!(cursor.is_eof());
    }

    #[test]
    fn simple_buffer() {
        let buffer = chars("bli kla dub");
        let mut cursor = SliceCursor::new(&buffer);

        assert_eq!(cursor.get(), Some(&'b'));
        assert_eq!(cursor.next(), Some(&'l'));
        assert_eq!(cursor.prev(), Some(&'b'));
        assert_eq!(cursor.advance(2), Some(&'i'));
        assert_eq!(cursor.peek(2), Some(&'k'));
        assert!(cursor.consume('i'));
        assert!(cursor.consume_any(&[' ']));
        assert_eq!(cursor.get(), Some(&'k'));
    }

    #[test]
    fn movement_is_clamped() {
        let buffer = chars("ab");
        let mut cursor = SliceCursor::new(&buffer);

        assert_eq!(cursor.prev(), Some(&'a'));
        assert_eq!(cursor.pos(), 0);

        assert_eq!(cursor.advance(10), None);
        assert_eq!(cursor.pos(), 2);
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.pos(), 2);

        assert_eq!(cursor.prev(), Some(&'b'));
    }

    #[test]
    fn peek_out_of_range() {
        let buffer = chars("ab");
        let cursor = SliceCursor::new(&buffer);

        assert_eq!(cursor.peek(1), Some(&'b'));
        assert_eq!(cursor.peek(2), None);
        assert_eq!(cursor.peek(usize::MAX), None);
    }

    #[test]
    fn consume_until_stops_at_end() {
        let buffer = chars("abc");
        let mut cursor = SliceCursor::new(&buffer);

        cursor.consume_until('z');
        assert!(cursor.is_eof());

        cursor.consume_until('a');
        cursor.consume_while('a');
        assert!(cursor.is_eof());
    }

    #[test]
    fn consume_runs() {
        let buffer = chars("  \tword;");
        let mut cursor = SliceCursor::new(&buffer);

        cursor.consume_while_any(&[' ', '\t']);
        assert_eq!(cursor.get(), Some(&'w'));

        cursor.consume_until_any(&[';', ',']);
        assert_eq!(cursor.get(), Some(&';'));
        assert_eq!(cursor.rest(), &[';']);
    }

    #[test]
    fn skip_counts_elements() {
        let buffer = b"0012x";
        let mut cursor = SliceCursor::new(buffer);

        assert_eq!(cursor.skip_while(u8::is_ascii_digit), 4);
        assert_eq!(cursor.skip_until(|&b| b == b'x'), 0);
        assert_eq!(cursor.remaining(), 1);
    }

    #[test]
    fn checkpoints_rewind() {
        let buffer = chars("abc");
        let mut cursor = SliceCursor::new(&buffer);

        let start = cursor.checkpoint();
        assert!(!cursor.made_progress(start));

        cursor.advance(2);
        assert!(cursor.made_progress(start));

        cursor.rewind(start);
        assert_eq!(cursor.get(), Some(&'a'));
    }

    proptest! {
        #[test]
        fn consume_while_any_stops_outside_set(
            buffer in proptest::collection::vec(
                prop_oneof![Just(b' '), Just(b'\t'), Just(b'a'), Just(b'\n')],
                0..64,
            ),
            start in 0usize..64,
        ) {
            let set = [b' ', b'\t'];
            let mut cursor = SliceCursor::new(&buffer);
            cursor.advance(start);
            let before = cursor.pos();

            cursor.consume_while_any(&set);

            prop_assert!(cursor.pos() >= before);
            match cursor.get() {
                None => prop_assert!(cursor.is_eof()),
                Some(item) => prop_assert!(!set.contains(item)),
            }
        }
    }
}
