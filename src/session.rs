use crate::candidates::CandidateSet;
use crate::chain_search::{
    ChainSearch, SearchReport, SolveError, SolverConfig, DEFAULT_BREAK_OUT_COUNTER,
    DEFAULT_MAX_BARREN_ATTEMPTS,
};
use crate::puzzle::Puzzle;
use crate::puzzle_data::{PuzzleData, PuzzleDataError};
use crate::run_record::RunRecord;
use crate::solution_store::{SolutionStore, StoreError};
use crate::stats::RunStatistics;
use crate::utilities::read_word_list;
use log::{info, warn};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SessionError {
    #[display("{_0}")]
    #[from]
    PuzzleData(PuzzleDataError),
    #[display("could not read word list {}: {source}", path.display())]
    WordList { path: PathBuf, source: io::Error },
    #[display("{_0}")]
    #[from]
    Solve(SolveError),
    #[display("{_0}")]
    #[from]
    Store(StoreError),
}

/// everything about a session that does not come from the puzzle itself
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// solutions go to `<archive_root>/<date>/`
    pub archive_root: PathBuf,
    /// extra words merged into the provider's dictionary
    pub word_list: Option<PathBuf>,
    /// file the run record is appended to
    pub stats_csv: Option<PathBuf>,
    /// overrides the puzzle's par
    pub par: Option<usize>,
    pub break_out_counter: u64,
    pub max_barren_attempts: u64,
    pub workers: usize,
    pub seed: Option<u64>,
    pub time_limit: Option<Duration>,
    pub terminator: Arc<AtomicBool>,
}

impl SessionOptions {
    pub fn new<P: AsRef<Path>>(archive_root: P) -> Self {
        Self {
            archive_root: archive_root.as_ref().to_path_buf(),
            word_list: None,
            stats_csv: None,
            par: None,
            break_out_counter: DEFAULT_BREAK_OUT_COUNTER,
            max_barren_attempts: DEFAULT_MAX_BARREN_ATTEMPTS,
            workers: 1,
            seed: None,
            time_limit: None,
            terminator: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn solver_config(&self, puzzle_par: usize) -> SolverConfig {
        SolverConfig {
            par: self.par.unwrap_or(puzzle_par),
            break_out_counter: self.break_out_counter,
            max_barren_attempts: self.max_barren_attempts,
            workers: self.workers,
            seed: self.seed,
            time_limit: self.time_limit,
        }
    }
}

/// what a finished session produced
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub report: SearchReport,
    pub statistics: RunStatistics,
}

/// one puzzle taken from its provider payload through search, persistence and statistics
pub struct Session {
    data: PuzzleData,
    puzzle: Puzzle,
    candidates: CandidateSet,
    options: SessionOptions,
}

impl Session {
    pub fn new(data: PuzzleData, options: SessionOptions) -> Result<Self, SessionError> {
        let puzzle = data.puzzle()?;
        let mut candidates = CandidateSet::from_words(&puzzle, &data.dictionary);
        info!(
            "{} of {} dictionary words are candidates for {}",
            candidates.len(),
            data.dictionary.len(),
            puzzle
        );

        if let Some(path) = &options.word_list {
            let words = read_word_list(path).map_err(|source| SessionError::WordList {
                path: path.clone(),
                source,
            })?;
            let added = candidates.extend(&puzzle, &words);
            info!("added {} candidates from {}", added, path.display());
        }

        Ok(Self {
            data,
            puzzle,
            candidates,
            options,
        })
    }

    pub fn data(&self) -> &PuzzleData {
        &self.data
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    pub fn directory(&self) -> PathBuf {
        self.options.archive_root.join(&self.data.date)
    }

    /// search, then merge the results into the archive and summarize it. a search cut
    /// short by the terminator or the time limit still saves what it found.
    pub fn run(&self) -> Result<SessionOutcome, SessionError> {
        let config = self.options.solver_config(self.data.par);
        let search = ChainSearch::new(
            &self.puzzle,
            &self.candidates,
            config.clone(),
            Arc::clone(&self.options.terminator),
        );
        let report = search.solve()?;

        if report.contains(&self.data.official_solution) {
            info!("found the official solution {}", self.data.official_solution);
        } else {
            warn!(
                "the official solution {} was not found",
                self.data.official_solution
            );
        }

        let store = SolutionStore::new(self.directory());
        store.persist(&report.solutions, config.par)?;

        let statistics =
            RunStatistics::aggregate(&store, &self.candidates, &self.data.date, config.par)?;
        statistics.write_summary(store.directory())?;

        if let Some(path) = &self.options.stats_csv {
            RunRecord::new(
                &self.data.date,
                config.par,
                self.puzzle.superset(),
                &self.data.official_solution,
                config.break_out_counter,
                &report,
            )
            .append_to(path)?;
        }

        Ok(SessionOutcome { report, statistics })
    }
}
