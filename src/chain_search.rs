use crate::candidates::CandidateSet;
use crate::puzzle::Puzzle;
use crate::solution::Solution;

use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use search_state::SearchState;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use worker::{lock_state, search_chains, WorkerInformation};

use crossbeam::thread::ScopedJoinHandle;

pub mod chain_builder;
pub mod search_state;
mod worker;

/// default number of consecutive known chains after which the search gives up
pub const DEFAULT_BREAK_OUT_COUNTER: u64 = 50;

/// default number of consecutive attempts without any chain after which the search gives up
pub const DEFAULT_MAX_BARREN_ATTEMPTS: u64 = 100_000;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SolveError {
    #[display("no chain of at most the allowed length was found in {attempts} attempts")]
    NoSolutionSpace { attempts: u64 },
    #[display("the puzzle has no candidate words")]
    NoCandidates,
    #[display("par must be at least 1")]
    InvalidPar,
    #[display("at least one worker is required")]
    NoWorkers,
    #[display("a chain search worker panicked")]
    WorkerPanicked,
}

/// tuning for one search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    /// longest chain accepted as a solution
    pub par: usize,
    /// consecutive known or over-length chains tolerated before stopping
    pub break_out_counter: u64,
    /// consecutive attempts without any chain tolerated before stopping
    pub max_barren_attempts: u64,
    pub workers: usize,
    /// seeds the shuffles for reproducible searches
    pub seed: Option<u64>,
    pub time_limit: Option<Duration>,
}

impl SolverConfig {
    pub fn new(par: usize) -> Self {
        Self {
            par,
            break_out_counter: DEFAULT_BREAK_OUT_COUNTER,
            max_barren_attempts: DEFAULT_MAX_BARREN_ATTEMPTS,
            workers: 1,
            seed: None,
            time_limit: None,
        }
    }
}

/// why a search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum StopReason {
    #[display("break-out counter exceeded")]
    BreakOut,
    #[display("too many attempts without a chain")]
    BarrenCeiling,
    #[display("time limit reached")]
    TimeLimit,
    #[display("terminated")]
    Terminated,
}

/// the outcome of a search
#[derive(Debug, Clone)]
pub struct SearchReport {
    /// distinct solutions in the order they were found
    pub solutions: Vec<Solution>,
    /// solutions of at most two words, fewest letters first
    pub best_solutions: Vec<Solution>,
    pub attempts: u64,
    pub max_streak: u64,
    pub elapsed: Duration,
    pub stop_reason: StopReason,
}

impl SearchReport {
    pub fn best_solution(&self) -> Option<&Solution> {
        self.best_solutions.first()
    }

    pub fn contains(&self, solution: &Solution) -> bool {
        self.solutions.contains(solution)
    }

    pub fn solutions_of_length(&self, len: usize) -> impl Iterator<Item = &Solution> {
        self.solutions.iter().filter(move |s| s.len() == len)
    }
}

/// monte-carlo search for word chains: every attempt shuffles the candidates and builds
/// one chain greedily, and the search ends once enough attempts in a row turn up nothing new
pub struct ChainSearch<'a> {
    puzzle: &'a Puzzle,
    candidates: &'a CandidateSet,
    config: SolverConfig,
    /// set by some outside mechanism (generally a signal handler) to cleanly terminate the
    /// search before its natural completion
    terminator: Arc<AtomicBool>,
}

impl<'a> ChainSearch<'a> {
    pub fn new(
        puzzle: &'a Puzzle,
        candidates: &'a CandidateSet,
        config: SolverConfig,
        terminator: Arc<AtomicBool>,
    ) -> Self {
        Self {
            puzzle,
            candidates,
            config,
            terminator,
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// run attempts until a stop condition is met
    pub fn solve(&self) -> Result<SearchReport, SolveError> {
        if self.config.par == 0 {
            return Err(SolveError::InvalidPar);
        }
        if self.config.workers == 0 {
            return Err(SolveError::NoWorkers);
        }
        if self.candidates.is_empty() {
            return Err(SolveError::NoCandidates);
        }

        info!(
            "starting chain search over {} candidates (par {}, break-out counter {}, {} worker(s))",
            self.candidates.len(),
            self.config.par,
            self.config.break_out_counter,
            self.config.workers
        );

        let start_time = Instant::now();
        let deadline = self.config.time_limit.map(|limit| start_time + limit);
        let state = Mutex::new(SearchState::new());

        if self.config.workers == 1 {
            search_chains(self.worker_information(&state, deadline, 0));
        } else {
            self.spawn_workers(&state, deadline)?;
        }

        let elapsed = start_time.elapsed();
        let state = state
            .into_inner()
            .map_err(|_| SolveError::WorkerPanicked)?;
        let report = state.into_report(elapsed);

        info!(
            "chain search found {} solutions ({} best) in {} attempts over {:.3}s: {}",
            report.solutions.len(),
            report.best_solutions.len(),
            report.attempts,
            report.elapsed.as_secs_f64(),
            report.stop_reason
        );

        if report.stop_reason == StopReason::BarrenCeiling {
            if report.solutions.is_empty() {
                return Err(SolveError::NoSolutionSpace {
                    attempts: report.attempts,
                });
            }
            warn!(
                "chain search stopped after {} attempts in a row without a chain",
                self.config.max_barren_attempts
            );
        }

        Ok(report)
    }

    fn spawn_workers(
        &self,
        state: &Mutex<SearchState>,
        deadline: Option<Instant>,
    ) -> Result<(), SolveError> {
        let all_joined = crossbeam::thread::scope(|s| {
            let mut worker_threads: Vec<ScopedJoinHandle<'_, ()>> = Vec::new();
            for worker_num in 0..self.config.workers {
                let worker_information = self.worker_information(state, deadline, worker_num);
                let handle = s
                    .builder()
                    .name(format!("chain-search-{}", worker_num))
                    .spawn(move |_| search_chains(worker_information));
                match handle {
                    Ok(handle) => worker_threads.push(handle),
                    Err(e) => {
                        // the workers already running will still stop on their own
                        warn!("could not spawn chain search worker {}: {}", worker_num, e);
                        lock_state(state).stop(StopReason::Terminated);
                    }
                }
            }

            let panicked = worker_threads
                .into_iter()
                .map(ScopedJoinHandle::join)
                .filter(Result::is_err)
                .count();
            panicked == 0
        })
        .unwrap_or(false);

        if all_joined {
            Ok(())
        } else {
            Err(SolveError::WorkerPanicked)
        }
    }

    fn worker_information<'s>(
        &'s self,
        state: &'s Mutex<SearchState>,
        deadline: Option<Instant>,
        worker_num: usize,
    ) -> WorkerInformation<'s> {
        let rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(worker_num as u64)),
            None => StdRng::from_os_rng(),
        };
        WorkerInformation::new(
            self.puzzle,
            self.candidates,
            &self.config,
            state,
            &self.terminator,
            deadline,
            rng,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::letter_set::LetterSet;
    use std::sync::atomic::Ordering as MemoryOrdering;

    fn default_puzzle() -> Puzzle {
        Puzzle::new(&["abc", "def", "ghi", "jkl"]).unwrap()
    }

    fn seeded_config(par: usize, break_out_counter: u64) -> SolverConfig {
        SolverConfig {
            break_out_counter,
            seed: Some(7),
            ..SolverConfig::new(par)
        }
    }

    fn assert_valid_solutions(puzzle: &Puzzle, report: &SearchReport, par: usize) {
        for solution in &report.solutions {
            assert!(solution.len() <= par, "{} is too long", solution);
            assert!(solution.is_linked(), "{} does not link", solution);
            assert_eq!(
                solution.letters() & puzzle.superset_letters(),
                puzzle.superset_letters(),
                "{} does not cover the superset",
                solution
            );
            assert_eq!(solution.letters() - puzzle.superset_letters(), LetterSet::EMPTY);
        }
    }

    #[test]
    fn test_single_solution_breaks_out() {
        let puzzle = default_puzzle();
        let candidates = CandidateSet::from_words(&puzzle, ["adgjbehkcfil"]);
        let search = ChainSearch::new(
            &puzzle,
            &candidates,
            seeded_config(3, 5),
            Arc::new(AtomicBool::new(false)),
        );

        let report = search.solve().unwrap();
        assert_eq!(report.solutions, vec![Solution::from(vec!["adgjbehkcfil"])]);
        assert_eq!(report.best_solutions, report.solutions);
        // one discovery then six repeats to exceed the counter of five
        assert_eq!(report.attempts, 7);
        assert_eq!(report.max_streak, 6);
        assert_eq!(report.stop_reason, StopReason::BreakOut);
    }

    #[test]
    fn test_finds_every_reachable_chain() {
        let puzzle = default_puzzle();
        let candidates = CandidateSet::from_words(
            &puzzle,
            ["adgjbehk", "kcfil", "adgjbehkcfil", "kcf", "fil"],
        );
        let search = ChainSearch::new(
            &puzzle,
            &candidates,
            seeded_config(3, 40),
            Arc::new(AtomicBool::new(false)),
        );

        let report = search.solve().unwrap();
        assert_valid_solutions(&puzzle, &report, 3);
        assert_eq!(report.solutions.len(), 2);
        assert!(report.contains(&Solution::from(vec!["adgjbehk", "kcfil"])));
        assert_eq!(
            report.best_solutions,
            vec![
                Solution::from(vec!["adgjbehkcfil"]),
                Solution::from(vec!["adgjbehk", "kcfil"])
            ]
        );
        assert_eq!(report.best_solution().unwrap().total_letters(), 12);
        assert_eq!(report.solutions_of_length(2).count(), 1);
    }

    #[test]
    fn test_parallel_workers_share_one_solution_set() {
        let puzzle = default_puzzle();
        let candidates = CandidateSet::from_words(
            &puzzle,
            ["adgjbehk", "kcfil", "adgjbehkcfil", "kcf", "fil"],
        );
        let config = SolverConfig {
            workers: 4,
            ..seeded_config(3, 40)
        };
        let search = ChainSearch::new(&puzzle, &candidates, config, Arc::new(AtomicBool::new(false)));

        let report = search.solve().unwrap();
        assert_valid_solutions(&puzzle, &report, 3);
        assert_eq!(report.solutions.len(), 2);
        assert_eq!(report.stop_reason, StopReason::BreakOut);
    }

    #[test]
    fn test_no_solution_space_is_an_error() {
        let puzzle = default_puzzle();
        let candidates = CandidateSet::from_words(&puzzle, ["adg", "jad"]);
        let config = SolverConfig {
            max_barren_attempts: 25,
            ..seeded_config(5, 10)
        };
        let search = ChainSearch::new(&puzzle, &candidates, config, Arc::new(AtomicBool::new(false)));
        assert_eq!(
            search.solve().unwrap_err(),
            SolveError::NoSolutionSpace { attempts: 25 }
        );
    }

    #[test]
    fn test_par_bounds_chain_length() {
        let puzzle = default_puzzle();
        let candidates = CandidateSet::from_words(&puzzle, ["adgjbehk", "kcfil"]);
        let config = SolverConfig {
            max_barren_attempts: 50,
            ..seeded_config(1, 10)
        };
        let search = ChainSearch::new(&puzzle, &candidates, config, Arc::new(AtomicBool::new(false)));
        assert!(matches!(
            search.solve(),
            Err(SolveError::NoSolutionSpace { .. })
        ));
    }

    #[test]
    fn test_terminator_stops_search() {
        let puzzle = default_puzzle();
        let candidates = CandidateSet::from_words(&puzzle, ["adgjbehkcfil"]);
        let terminator = Arc::new(AtomicBool::new(false));
        terminator.store(true, MemoryOrdering::SeqCst);
        let search = ChainSearch::new(&puzzle, &candidates, seeded_config(3, 5), terminator);

        let report = search.solve().unwrap();
        assert_eq!(report.attempts, 0);
        assert!(report.solutions.is_empty());
        assert_eq!(report.stop_reason, StopReason::Terminated);
    }

    #[test]
    fn test_time_limit_stops_search() {
        let puzzle = default_puzzle();
        let candidates = CandidateSet::from_words(&puzzle, ["adgjbehkcfil"]);
        let config = SolverConfig {
            time_limit: Some(Duration::ZERO),
            ..seeded_config(3, 5)
        };
        let search = ChainSearch::new(&puzzle, &candidates, config, Arc::new(AtomicBool::new(false)));
        assert_eq!(search.solve().unwrap().stop_reason, StopReason::TimeLimit);
    }

    #[test]
    fn test_invalid_configuration() {
        let puzzle = default_puzzle();
        let candidates = CandidateSet::from_words(&puzzle, ["adgjbehkcfil"]);
        let terminator = Arc::new(AtomicBool::new(false));

        let search = ChainSearch::new(&puzzle, &candidates, SolverConfig::new(0), terminator.clone());
        assert_eq!(search.solve().unwrap_err(), SolveError::InvalidPar);

        let config = SolverConfig {
            workers: 0,
            ..SolverConfig::new(3)
        };
        let search = ChainSearch::new(&puzzle, &candidates, config, terminator.clone());
        assert_eq!(search.solve().unwrap_err(), SolveError::NoWorkers);

        let empty = CandidateSet::default();
        let search = ChainSearch::new(&puzzle, &empty, SolverConfig::new(3), terminator);
        assert_eq!(search.solve().unwrap_err(), SolveError::NoCandidates);
    }
}
