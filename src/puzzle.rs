use crate::letter_set::{LetterSet, ALPHABET_LENGTH};
use std::fmt;

/// number of sides on the box
pub const SIDE_COUNT: usize = 4;

/// number of letters on each side
pub const SIDE_LENGTH: usize = 3;

/// number of letters in the superset
pub const SUPERSET_LENGTH: usize = SIDE_COUNT * SIDE_LENGTH;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InvalidPuzzleError {
    #[display("puzzle needs 4 sides but {count} were given")]
    WrongSideCount { count: usize },
    #[display("side {side:?} has {len} letters instead of 3")]
    WrongSideLength {
        side: String,
        len: usize,
    },
    #[display("side {side:?} contains {letter:?}, which is not a lowercase english letter")]
    InvalidLetter {
        side: String,
        letter: char,
    },
    #[display("letter {letter:?} appears more than once across the sides")]
    DuplicateLetter { letter: char },
}

/// one side of the box: three distinct letters
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Side {
    letters: [char; SIDE_LENGTH],
}

impl Side {
    pub fn letters(&self) -> &[char; SIDE_LENGTH] {
        &self.letters
    }

    pub fn contains(&self, c: char) -> bool {
        self.letters.contains(&c)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side: String = self.letters.iter().collect();
        write!(f, "{}", side)
    }
}

/// the four sides of a puzzle and the twelve letter superset they form.
/// immutable once constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Puzzle {
    sides: [Side; SIDE_COUNT],
    /// concatenation of the sides in order
    superset: String,
    superset_letters: LetterSet,
    /// side index for each letter of the alphabet
    side_of: [Option<u8>; ALPHABET_LENGTH],
}

impl Puzzle {
    pub fn new<S: AsRef<str>>(sides: &[S]) -> Result<Self, InvalidPuzzleError> {
        if sides.len() != SIDE_COUNT {
            return Err(InvalidPuzzleError::WrongSideCount { count: sides.len() });
        }

        let mut parsed = [Side {
            letters: ['a'; SIDE_LENGTH],
        }; SIDE_COUNT];
        let mut side_of = [None; ALPHABET_LENGTH];
        let mut superset = String::with_capacity(SUPERSET_LENGTH);
        let mut superset_letters = LetterSet::EMPTY;

        for (side_idx, side) in sides.iter().enumerate() {
            let side = side.as_ref();
            let letters: Vec<char> = side.chars().collect();
            if letters.len() != SIDE_LENGTH {
                return Err(InvalidPuzzleError::WrongSideLength {
                    side: side.to_owned(),
                    len: letters.len(),
                });
            }

            for (letter_idx, &letter) in letters.iter().enumerate() {
                let Some(alphabet_idx) = LetterSet::index_of(letter) else {
                    return Err(InvalidPuzzleError::InvalidLetter {
                        side: side.to_owned(),
                        letter,
                    });
                };
                if !superset_letters.insert(letter) {
                    return Err(InvalidPuzzleError::DuplicateLetter { letter });
                }
                side_of[alphabet_idx as usize] = Some(side_idx as u8);
                parsed[side_idx].letters[letter_idx] = letter;
                superset.push(letter);
            }
        }

        Ok(Self {
            sides: parsed,
            superset,
            superset_letters,
            side_of,
        })
    }

    pub fn sides(&self) -> &[Side; SIDE_COUNT] {
        &self.sides
    }

    /// the twelve letters in side order
    pub fn superset(&self) -> &str {
        &self.superset
    }

    pub fn superset_letters(&self) -> LetterSet {
        self.superset_letters
    }

    pub fn contains(&self, c: char) -> bool {
        self.superset_letters.contains(c)
    }

    /// index of the side holding `c`, None if `c` is not on the box
    pub fn side_of(&self, c: char) -> Option<usize> {
        LetterSet::index_of(c).and_then(|idx| self.side_of[idx as usize].map(usize::from))
    }

    pub fn is_on_side(&self, side_idx: usize, c: char) -> bool {
        self.sides.get(side_idx).is_some_and(|side| side.contains(c))
    }

    /// two letters may not follow one another in a word if they share a side
    pub fn is_adjacency_forbidden(&self, a: char, b: char) -> bool {
        match (self.side_of(a), self.side_of(b)) {
            (Some(side_a), Some(side_b)) => side_a == side_b,
            _ => false,
        }
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sides: Vec<String> = self.sides.iter().map(Side::to_string).collect();
        write!(f, "[{}]", sides.join(", "))
    }
}
