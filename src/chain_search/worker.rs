use super::chain_builder::build_chain;
use super::search_state::SearchState;
use super::{SolverConfig, StopReason};
use crate::candidates::{Candidate, CandidateSet};
use crate::puzzle::Puzzle;
use crate::solution::Solution;
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::sync::atomic::{AtomicBool, Ordering as MemoryOrdering};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Instant;

/// everything a worker needs to run attempts against the shared search state
pub struct WorkerInformation<'a> {
    puzzle: &'a Puzzle,
    /// never mutated - each attempt shuffles its own copy of the references
    candidates: &'a CandidateSet,
    config: &'a SolverConfig,
    state: &'a Mutex<SearchState>,
    /// set by some outside mechanism (generally a signal handler) to end the search early
    terminator: &'a AtomicBool,
    deadline: Option<Instant>,
    /// independent shuffle stream for this worker
    rng: StdRng,
}

impl<'a> WorkerInformation<'a> {
    // this object's constructor is designed to simplify the signature of search_chains
    pub fn new(
        puzzle: &'a Puzzle,
        candidates: &'a CandidateSet,
        config: &'a SolverConfig,
        state: &'a Mutex<SearchState>,
        terminator: &'a AtomicBool,
        deadline: Option<Instant>,
        rng: StdRng,
    ) -> Self {
        Self {
            puzzle,
            candidates,
            config,
            state,
            terminator,
            deadline,
            rng,
        }
    }
}

pub fn lock_state(state: &Mutex<SearchState>) -> MutexGuard<'_, SearchState> {
    state
        .lock()
        .expect("a chain search worker panicked while holding the search state")
}

/// run randomized attempts until the shared state says to stop
pub fn search_chains(worker_information: WorkerInformation) {
    // unpack convenience struct
    let puzzle = worker_information.puzzle;
    let candidates = worker_information.candidates;
    let config = worker_information.config;
    let state = worker_information.state;
    let terminator = worker_information.terminator;
    let deadline = worker_information.deadline;
    let mut rng = worker_information.rng;

    let worker_name = thread::current().name().unwrap_or("main").to_owned();
    let mut pool: Vec<&Candidate> = Vec::with_capacity(candidates.len());

    loop {
        if terminator.load(MemoryOrdering::SeqCst) {
            debug!("worker {} terminated", worker_name);
            lock_state(state).stop(StopReason::Terminated);
            return;
        }
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            debug!("worker {} hit the time limit", worker_name);
            lock_state(state).stop(StopReason::TimeLimit);
            return;
        }

        // fresh full shuffle of the candidates for every attempt
        pool.clear();
        pool.extend(candidates.iter());
        pool.shuffle(&mut rng);

        let chain = build_chain(puzzle, &mut pool, config.par)
            .map(|words| Solution::new(words.iter().map(|c| c.word().to_owned()).collect()));
        if let Some(chain) = &chain {
            trace!("worker {} built chain {}", worker_name, chain);
        }

        let mut guard = lock_state(state);
        if guard.is_stopped() {
            debug!("worker {} stopping", worker_name);
            return;
        }
        if let Some(reason) = guard.record(chain, config) {
            debug!(
                "worker {} stopping after {} attempts: {:?}",
                worker_name,
                guard.attempts(),
                reason
            );
            return;
        }
    }
}
