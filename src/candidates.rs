use crate::letter_set::LetterSet;
use crate::puzzle::Puzzle;
use log::debug;
use std::collections::HashSet;
use std::fmt;

/// shortest word the game accepts
pub const MIN_WORD_LEN: usize = 3;

/// a word that can legally be played on a puzzle, annotated with the letters it uses
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Candidate {
    word: String,
    letters: LetterSet,
    coverage: u8,
}

impl Candidate {
    fn new(puzzle: &Puzzle, word: String) -> Self {
        let letters = LetterSet::from_word(&word);
        let coverage = (letters & puzzle.superset_letters()).len() as u8;
        Self {
            word,
            letters,
            coverage,
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    /// distinct letters of the word
    pub fn letters(&self) -> LetterSet {
        self.letters
    }

    /// number of distinct superset letters in the word
    pub fn coverage(&self) -> usize {
        self.coverage as usize
    }

    pub fn len(&self) -> usize {
        self.word.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word.is_empty()
    }

    // words are lowercase ascii by construction, so byte indexing is safe
    pub fn first_letter(&self) -> char {
        self.word.as_bytes()[0] as char
    }

    pub fn last_letter(&self) -> char {
        self.word.as_bytes()[self.word.len() - 1] as char
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.word)
    }
}

/// a dictionary word must be lowercase alphabetic and at least MIN_WORD_LEN long
pub fn is_well_formed(word: &str) -> bool {
    word.len() >= MIN_WORD_LEN && word.chars().all(|c| c.is_ascii_lowercase())
}

/// true iff every letter of `word` is on the box and no two consecutive letters
/// share a side
pub fn is_valid_candidate(puzzle: &Puzzle, word: &str) -> bool {
    let mut previous: Option<char> = None;
    for letter in word.chars() {
        if !puzzle.contains(letter) {
            return false;
        }
        if let Some(previous) = previous {
            if puzzle.is_adjacency_forbidden(previous, letter) {
                return false;
            }
        }
        previous = Some(letter);
    }
    true
}

/// count of distinct superset letters present in `word`
pub fn coverage(puzzle: &Puzzle, word: &str) -> usize {
    (LetterSet::from_word(word) & puzzle.superset_letters()).len()
}

/// the legal words for one puzzle, highest coverage first
#[derive(Clone, Debug, Default)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
}

impl CandidateSet {
    /// filter `words` down to the legal candidates for `puzzle`.
    /// malformed, illegal and repeated words are dropped silently.
    pub fn from_words<I, S>(puzzle: &Puzzle, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut candidate_set = Self::default();
        candidate_set.extend(puzzle, words);
        candidate_set
    }

    /// add the legal words of `words` that are not already candidates, returning how many were added
    pub fn extend<I, S>(&mut self, puzzle: &Puzzle, words: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen: HashSet<String> = self.candidates.iter().map(|c| c.word.clone()).collect();
        let before = self.candidates.len();
        let mut rejected = 0usize;

        for word in words {
            let word = word.as_ref();
            if !is_well_formed(word) || !is_valid_candidate(puzzle, word) {
                rejected += 1;
                continue;
            }
            if seen.insert(word.to_owned()) {
                self.candidates.push(Candidate::new(puzzle, word.to_owned()));
            }
        }

        // stable, so equal coverage keeps dictionary order
        self.candidates.sort_by(|a, b| b.coverage.cmp(&a.coverage));

        let added = self.candidates.len() - before;
        debug!(
            "added {} candidate words ({} rejected), {} total",
            added,
            rejected,
            self.candidates.len()
        );
        added
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    pub fn as_slice(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn contains(&self, word: &str) -> bool {
        self.candidates.iter().any(|c| c.word == word)
    }

    /// longest candidate, the first one in candidate order on ties
    pub fn longest_word(&self) -> Option<&Candidate> {
        self.candidates.iter().fold(None, |best, candidate| match best {
            Some(best) if best.len() >= candidate.len() => Some(best),
            _ => Some(candidate),
        })
    }

    /// highest coverage candidate, the first one in candidate order on ties
    pub fn most_covering_word(&self) -> Option<&Candidate> {
        self.candidates.first()
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}
