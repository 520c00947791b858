use std::fmt;
use std::ops::{BitAnd, BitOr, Sub};

/// number of lowercase english letters
pub const ALPHABET_LENGTH: usize = 26;

/// a set of lowercase english letters stored as a 26-bit mask
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
pub struct LetterSet {
    bits: u32,
}

impl LetterSet {
    pub const EMPTY: LetterSet = LetterSet { bits: 0 };

    /// bit index of a lowercase ascii letter, None for anything else
    #[inline(always)]
    pub fn index_of(c: char) -> Option<u32> {
        if c.is_ascii_lowercase() {
            Some(c as u32 - 'a' as u32)
        } else {
            None
        }
    }

    /// collect the lowercase letters of `word`, ignoring everything else
    pub fn from_word(word: &str) -> Self {
        word.chars().collect()
    }

    #[inline(always)]
    pub fn contains(&self, c: char) -> bool {
        match Self::index_of(c) {
            Some(idx) => self.bits & (1 << idx) != 0,
            None => false,
        }
    }

    /// returns true iff the letter was not already present
    #[inline(always)]
    pub fn insert(&mut self, c: char) -> bool {
        match Self::index_of(c) {
            Some(idx) => {
                let was_present = self.bits & (1 << idx) != 0;
                self.bits |= 1 << idx;
                !was_present
            }
            None => false,
        }
    }

    #[inline(always)]
    pub fn remove(&mut self, c: char) -> bool {
        match Self::index_of(c) {
            Some(idx) => {
                let was_present = self.bits & (1 << idx) != 0;
                self.bits &= !(1 << idx);
                was_present
            }
            None => false,
        }
    }

    #[inline(always)]
    pub fn is_superset(&self, other: &LetterSet) -> bool {
        self.bits & other.bits == other.bits
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// letters in alphabetical order
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        (0..ALPHABET_LENGTH as u32)
            .filter(|idx| self.bits & (1 << idx) != 0)
            .map(|idx| (b'a' + idx as u8) as char)
    }
}

impl FromIterator<char> for LetterSet {
    fn from_iter<T: IntoIterator<Item = char>>(iter: T) -> Self {
        let mut set = LetterSet::EMPTY;
        for c in iter {
            set.insert(c);
        }
        set
    }
}

impl BitOr for LetterSet {
    type Output = LetterSet;
    fn bitor(self, rhs: Self) -> Self::Output {
        LetterSet {
            bits: self.bits | rhs.bits,
        }
    }
}

impl BitAnd for LetterSet {
    type Output = LetterSet;
    fn bitand(self, rhs: Self) -> Self::Output {
        LetterSet {
            bits: self.bits & rhs.bits,
        }
    }
}

impl Sub for LetterSet {
    type Output = LetterSet;
    fn sub(self, rhs: Self) -> Self::Output {
        LetterSet {
            bits: self.bits & !rhs.bits,
        }
    }
}

impl fmt::Display for LetterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters: String = self.iter().collect();
        write!(f, "{}", letters)
    }
}
