use crate::candidates::CandidateSet;
use crate::solution::Solution;
use crate::solution_store::{SolutionStore, StoreError};
use log::info;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// name of the per-run summary written next to the solution files
pub const STATS_FILE_NAME: &str = "stats.txt";

/// shortest chain length the summary reports on
pub const MIN_SUMMARY_LENGTH: usize = 2;

/// the extremes among the solutions of one chain length, by total letter count
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LetterExtremes {
    pub min_letters: usize,
    pub max_letters: usize,
    pub shortest: Solution,
    pub most_verbose: Solution,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LengthStats {
    pub count: usize,
    /// None when there are no solutions of this length
    pub extremes: Option<LetterExtremes>,
}

impl LengthStats {
    /// ties go to the solution found first
    pub fn from_solutions(solutions: &[Solution]) -> Self {
        let mut extremes: Option<LetterExtremes> = None;
        for solution in solutions {
            let letters = solution.total_letters();
            match extremes.as_mut() {
                Some(extremes) => {
                    if letters < extremes.min_letters {
                        extremes.min_letters = letters;
                        extremes.shortest = solution.clone();
                    }
                    if letters > extremes.max_letters {
                        extremes.max_letters = letters;
                        extremes.most_verbose = solution.clone();
                    }
                }
                None => {
                    extremes = Some(LetterExtremes {
                        min_letters: letters,
                        max_letters: letters,
                        shortest: solution.clone(),
                        most_verbose: solution.clone(),
                    })
                }
            }
        }

        Self {
            count: solutions.len(),
            extremes,
        }
    }
}

/// summary of everything persisted for one puzzle
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunStatistics {
    pub date: String,
    pub par: usize,
    pub total_solutions: usize,
    /// (word, length)
    pub longest_word: Option<(String, usize)>,
    /// (word, coverage)
    pub most_covering_word: Option<(String, usize)>,
    pub per_length: BTreeMap<usize, LengthStats>,
}

impl RunStatistics {
    /// recompute the statistics for lengths MIN_SUMMARY_LENGTH..=par from the files in
    /// `store`, independent of any one search
    pub fn aggregate(
        store: &SolutionStore,
        candidates: &CandidateSet,
        date: &str,
        par: usize,
    ) -> Result<Self, StoreError> {
        let mut per_length = BTreeMap::new();
        for len in MIN_SUMMARY_LENGTH..=par {
            let solutions = store.read_length(len)?;
            per_length.insert(len, LengthStats::from_solutions(&solutions));
        }

        Ok(Self {
            date: date.to_owned(),
            par,
            total_solutions: per_length.values().map(|s| s.count).sum(),
            longest_word: candidates
                .longest_word()
                .map(|c| (c.word().to_owned(), c.len())),
            most_covering_word: candidates
                .most_covering_word()
                .map(|c| (c.word().to_owned(), c.coverage())),
            per_length,
        })
    }

    /// write the summary into `directory`, replacing any earlier summary
    pub fn write_summary<P: AsRef<Path>>(&self, directory: P) -> Result<PathBuf, StoreError> {
        let path = directory.as_ref().join(STATS_FILE_NAME);
        fs::write(&path, self.to_string()).map_err(|source| StoreError::Write {
            path: path.clone(),
            source,
        })?;
        info!("wrote run statistics to {}", path.display());
        Ok(path)
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Date: {}", self.date)?;
        writeln!(f, "Par: {}", self.par)?;
        writeln!(f, "Total Solutions: {}", self.total_solutions)?;
        match &self.longest_word {
            Some((word, len)) => writeln!(f, "Longest Word: {} ({} letters)", word, len)?,
            None => writeln!(f, "Longest Word: None")?,
        }
        match &self.most_covering_word {
            Some((word, coverage)) => {
                writeln!(f, "Most Covering Word: {} ({} letters covered)", word, coverage)?
            }
            None => writeln!(f, "Most Covering Word: None")?,
        }
        for (len, stats) in &self.per_length {
            writeln!(f, "Num {}-Solutions: {}", len, stats.count)?;
        }
        for (len, stats) in &self.per_length {
            match &stats.extremes {
                Some(e) => writeln!(
                    f,
                    "Length Range of {}-Solutions: ({}, {})",
                    len, e.min_letters, e.max_letters
                )?,
                None => writeln!(f, "Length Range of {}-Solutions: no data", len)?,
            }
        }
        for (len, stats) in &self.per_length {
            match &stats.extremes {
                Some(e) => writeln!(
                    f,
                    "Shortest & Longest of the {}-Solutions: ({}, {})",
                    len, e.shortest, e.most_verbose
                )?,
                None => writeln!(f, "Shortest & Longest of the {}-Solutions: no data", len)?,
            }
        }
        Ok(())
    }
}
