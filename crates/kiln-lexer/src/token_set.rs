use std::fmt;

use crate::TokenKind::{self, *};

const SIZE: usize = 1;

/// Compact set of [`TokenKind`]s.
///
/// Grammars define their composite sets as constants, e.g.
/// `const TEXT: TokenSet = TokenSet::new([WORD, NUMBER, SPACE]);`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenSet {
    bits: [u64; SIZE],
}

const ALL_KINDS: [TokenKind; 28] = [
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
];

impl TokenSet {
    pub const EMPTY: Self = Self { bits: [0; SIZE] };
    const BITS_PER_SLOT: u16 = u64::BITS as u16;

    pub const WHITESPACE: Self =
        Self::new([LINE_FEED, CARRIAGE_RETURN, SPACE, HORIZONTAL_TAB, VERTICAL_TAB]);

    /// All registered single-character symbols.
    pub const SYMBOLS: Self = Self::new([
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
    ]);

    const fn from_kind(kind: TokenKind) -> Self {
        let kind = kind as u16;

        let slot_index = (kind / Self::BITS_PER_SLOT) as usize;

        debug_assert!(
            slot_index < Self::EMPTY.bits.len(),
            "Index out of bounds. Increase the size of the bitset array."
        );

        let bit_index = kind % Self::BITS_PER_SLOT;
        let mask = 1 << bit_index;

        let mut bits = Self::EMPTY.bits;
        bits[slot_index] = mask;

        Self { bits }
    }

    pub const fn union(mut self, other: &Self) -> Self {
        let mut i = 0;

        while i < self.bits.len() {
            self.bits[i] |= other.bits[i];
            i += 1;
        }

        self
    }

    pub const fn new<const N: usize>(kinds: [TokenKind; N]) -> Self {
        let mut set = Self::EMPTY;

        let mut i = 0;
        while i < kinds.len() {
            set = set.union(&Self::from_kind(kinds[i]));
            i += 1;
        }

        set
    }

    pub const fn with(self, kind: TokenKind) -> Self {
        self.union(&Self::from_kind(kind))
    }

    pub const fn without(mut self, kind: TokenKind) -> Self {
        let removed = Self::from_kind(kind);
        let mut i = 0;

        while i < self.bits.len() {
            self.bits[i] &= !removed.bits[i];
            i += 1;
        }

        self
    }

    pub const fn contains(&self, kind: TokenKind) -> bool {
        let kind = kind as u16;
        let slot_index = (kind / Self::BITS_PER_SLOT) as usize;
        let bit_index = kind % Self::BITS_PER_SLOT;
        let mask = 1 << bit_index;

        self.bits[slot_index] & mask != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&slot| slot == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = TokenKind> + '_ {
        ALL_KINDS.into_iter().filter(|&kind| self.contains(kind))
    }
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("one of ")?;
        for (i, kind) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "`{kind}`")?;
        }
        Ok(())
    }
}
