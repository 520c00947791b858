use crate::solution::Solution;
use crate::solution_store::{SolutionStore, StoreError, MIN_CHAIN_LENGTH};
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

static SOLUTION_FILE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^length_([0-9]+)_solutions\.txt$")
        .unwrap_or_else(|e| panic!("failed to create solution file regex due to error: {e}"))
});

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ArchiveError {
    #[display("no archived puzzle at {}", path.display())]
    MissingDirectory { path: PathBuf },
    #[display("no solution files in {}", path.display())]
    NoSolutionFiles { path: PathBuf },
    #[display("no file for {len}-word solutions in {}", path.display())]
    MissingLength { len: usize, path: PathBuf },
    #[display("{_0}")]
    #[from]
    Store(StoreError),
}

/// read-only view of one archived puzzle, `<root>/<date>/`. solutions are read from disk
/// the first time a length is asked for and served from memory afterwards.
#[derive(Debug)]
pub struct SolutionArchive {
    date: String,
    store: SolutionStore,
    par: usize,
    cache: HashMap<usize, Vec<Solution>>,
}

impl SolutionArchive {
    pub fn open<P: AsRef<Path>>(root: P, date: &str) -> Result<Self, ArchiveError> {
        let directory = root.as_ref().join(date);
        if !directory.is_dir() {
            return Err(ArchiveError::MissingDirectory { path: directory });
        }

        let par = find_par(&directory)?;
        info!("opened archive {} (par {})", directory.display(), par);
        Ok(Self {
            date: date.to_owned(),
            store: SolutionStore::new(directory),
            par,
            cache: HashMap::new(),
        })
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn directory(&self) -> &Path {
        self.store.directory()
    }

    /// longest chain length with a solutions file
    pub fn par(&self) -> usize {
        self.par
    }

    pub fn solutions(&mut self, len: usize) -> Result<&[Solution], ArchiveError> {
        if !self.cache.contains_key(&len) {
            let path = self.store.path_for(len);
            if !path.is_file() {
                return Err(ArchiveError::MissingLength { len, path });
            }
            let solutions = self.store.read_length(len)?;
            debug!("cached {} solutions of length {}", solutions.len(), len);
            self.cache.insert(len, solutions);
        }
        Ok(&self.cache[&len])
    }

    /// every archived solution using `word`, over the lengths from the shortest up to
    /// `stop_length` (par when not given)
    pub fn solutions_with_word(
        &mut self,
        word: &str,
        stop_length: Option<usize>,
    ) -> Result<Vec<Solution>, ArchiveError> {
        let stop_length = stop_length.unwrap_or(self.par).max(MIN_CHAIN_LENGTH);

        let mut found = Vec::new();
        for len in MIN_CHAIN_LENGTH..=stop_length {
            match self.solutions(len) {
                Ok(solutions) => found.extend(
                    solutions
                        .iter()
                        .filter(|s| s.contains_word(word))
                        .cloned(),
                ),
                Err(ArchiveError::MissingLength { .. }) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(found)
    }

    /// forget the cached solutions of one length so the next read sees the file again
    pub fn clear_length(&mut self, len: usize) {
        self.cache.remove(&len);
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

/// the largest N with a `length_N_solutions.txt` in `directory`
pub fn find_par(directory: &Path) -> Result<usize, ArchiveError> {
    let read_error = |source| StoreError::Read {
        path: directory.to_path_buf(),
        source,
    };

    let mut par = None;
    for entry in fs::read_dir(directory).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        let len = SOLUTION_FILE_REGEX
            .captures(file_name)
            .and_then(|captures| captures.get(1))
            .and_then(|len| len.as_str().parse::<usize>().ok());
        if let Some(len) = len {
            par = par.max(Some(len));
        }
    }

    par.ok_or_else(|| ArchiveError::NoSolutionFiles {
        path: directory.to_path_buf(),
    })
}

/// (fewest, most) total letters among `solutions`
pub fn letter_range(solutions: &[Solution]) -> Option<(usize, usize)> {
    let mut letters = solutions.iter().map(Solution::total_letters);
    let first = letters.next()?;
    Some(letters.fold((first, first), |(min, max), n| (min.min(n), max.max(n))))
}

pub fn with_total_letters(solutions: &[Solution], total_letters: usize) -> Vec<&Solution> {
    solutions
        .iter()
        .filter(|s| s.total_letters() == total_letters)
        .collect()
}
