/// Decides whether a single element of a buffer is accepted.
///
/// Arrays and slices of matchers accept an element if any of their members
/// does, so `['a', 'b']` reads as "one of `a` or `b`".
pub trait Matcher<T> {
    fn matches(&self, item: &T) -> bool;
}

impl Matcher<char> for char {
    #[inline]
    fn matches(&self, item: &char) -> bool {
        self == item
    }
}

impl Matcher<u8> for u8 {
    #[inline]
    fn matches(&self, item: &u8) -> bool {
        self == item
    }
}

impl<T, M: Matcher<T>, const N: usize> Matcher<T> for [M; N] {
    #[inline]
    fn matches(&self, item: &T) -> bool {
        self.iter().any(|matcher| matcher.matches(item))
    }
}

impl<T, M: Matcher<T>> Matcher<T> for &[M] {
    #[inline]
    fn matches(&self, item: &T) -> bool {
        self.iter().any(|matcher| matcher.matches(item))
    }
}
