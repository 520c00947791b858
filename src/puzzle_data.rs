use crate::puzzle::{InvalidPuzzleError, Puzzle};
use crate::solution::Solution;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum PuzzleDataError {
    #[display("could not read puzzle data: {_0}")]
    Io(io::Error),
    #[display("could not parse puzzle data: {_0}")]
    Json(serde_json::Error),
    #[display("puzzle data holds an invalid puzzle: {_0}")]
    InvalidPuzzle(InvalidPuzzleError),
}

/// one day's puzzle as published by the provider
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleData {
    pub sides: Vec<String>,
    /// the provider's list of accepted words
    pub dictionary: Vec<String>,
    pub date: String,
    pub par: usize,
    #[serde(rename = "ourSolution", alias = "officialSolution")]
    pub official_solution: Solution,
}

impl PuzzleData {
    pub fn from_json(json: &str) -> Result<Self, PuzzleDataError> {
        let mut data: Self = serde_json::from_str(json)?;
        data.lowercase();
        Ok(data)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PuzzleDataError> {
        let data = Self::from_json(&fs::read_to_string(path.as_ref())?)?;
        info!(
            "read puzzle for {} from {} ({} dictionary words, par {})",
            data.date,
            path.as_ref().display(),
            data.dictionary.len(),
            data.par
        );
        Ok(data)
    }

    pub fn puzzle(&self) -> Result<Puzzle, PuzzleDataError> {
        Ok(Puzzle::new(&self.sides)?)
    }

    fn lowercase(&mut self) {
        for side in &mut self.sides {
            *side = side.to_lowercase();
        }
        for word in &mut self.dictionary {
            *word = word.to_lowercase();
        }
        self.official_solution = Solution::new(
            self.official_solution
                .words()
                .iter()
                .map(|w| w.to_lowercase())
                .collect(),
        );
    }
}
