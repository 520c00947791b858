use crate::letter_set::LetterSet;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum DecodeError {
    #[display("line is not a word list: {_0}")]
    #[from]
    Malformed(serde_json::Error),
    #[display("line decodes to an empty word list")]
    Empty,
}

/// an ordered chain of words. two solutions are equal iff their words are equal in order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Solution {
    words: Vec<String>,
}

impl Solution {
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// number of words in the chain
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// sum of the word lengths
    pub fn total_letters(&self) -> usize {
        self.words.iter().map(String::len).sum()
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// every word starts with the letter that ends the word before it
    pub fn is_linked(&self) -> bool {
        self.words
            .windows(2)
            .all(|pair| pair[0].chars().last() == pair[1].chars().next())
    }

    /// union of the letters of every word
    pub fn letters(&self) -> LetterSet {
        self.words
            .iter()
            .fold(LetterSet::EMPTY, |acc, w| acc | LetterSet::from_word(w))
    }

    /// single-line textual form, e.g. `["fade","echo"]`
    pub fn encode(&self) -> String {
        // serializing a list of strings cannot fail
        serde_json::to_string(&self.words).unwrap_or_default()
    }

    pub fn decode(line: &str) -> Result<Self, DecodeError> {
        let words: Vec<String> = serde_json::from_str(line.trim())?;
        if words.is_empty() {
            return Err(DecodeError::Empty);
        }
        Ok(Self { words })
    }
}

impl From<Vec<String>> for Solution {
    fn from(words: Vec<String>) -> Self {
        Solution::new(words)
    }
}

impl From<Vec<&str>> for Solution {
    fn from(words: Vec<&str>) -> Self {
        Solution::new(words.into_iter().map(str::to_owned).collect())
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}
