use super::{SearchReport, SolverConfig, StopReason};
use crate::solution::Solution;
use std::collections::HashSet;
use std::time::Duration;

/// best solutions are the chains of at most this many words
pub const BEST_SOLUTION_MAX_LEN: usize = 2;

/// the state shared by every worker of one search. all updates for a single
/// attempt happen in one call to `record` so that de-duplication and the
/// streak stay consistent under a lock.
#[derive(Debug, Default)]
pub struct SearchState {
    /// distinct solutions in the order they were found
    solutions: Vec<Solution>,
    seen: HashSet<Solution>,
    best_solutions: Vec<Solution>,
    /// consecutive attempts that produced a known or over-length chain
    streak: u64,
    max_streak: u64,
    /// consecutive attempts that produced no chain at all
    barren_streak: u64,
    attempts: u64,
    stop_reason: Option<StopReason>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_stopped(&self) -> bool {
        self.stop_reason.is_some()
    }

    /// the first reason given wins
    pub fn stop(&mut self, reason: StopReason) {
        if self.stop_reason.is_none() {
            self.stop_reason = Some(reason);
        }
    }

    /// fold the outcome of one attempt into the state, returning the reason to stop if
    /// the search is over
    pub fn record(&mut self, chain: Option<Solution>, config: &SolverConfig) -> Option<StopReason> {
        self.attempts += 1;

        match chain {
            None => {
                self.barren_streak += 1;
                if self.barren_streak >= config.max_barren_attempts {
                    self.stop(StopReason::BarrenCeiling);
                }
            }
            Some(solution) => {
                self.barren_streak = 0;
                if solution.len() <= config.par && !self.seen.contains(&solution) {
                    self.seen.insert(solution.clone());
                    if solution.len() <= BEST_SOLUTION_MAX_LEN {
                        self.best_solutions.push(solution.clone());
                    }
                    self.solutions.push(solution);
                    self.streak = 0;
                } else {
                    self.streak += 1;
                    self.max_streak = self.max_streak.max(self.streak);
                    if self.streak > config.break_out_counter {
                        self.stop(StopReason::BreakOut);
                    }
                }
            }
        }

        self.stop_reason
    }

    pub fn solution_count(&self) -> usize {
        self.solutions.len()
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn into_report(self, elapsed: Duration) -> SearchReport {
        let mut best_solutions = self.best_solutions;
        best_solutions.sort_by_key(Solution::total_letters);

        SearchReport {
            solutions: self.solutions,
            best_solutions,
            attempts: self.attempts,
            max_streak: self.max_streak,
            elapsed,
            // a search only ends through `stop`
            stop_reason: self.stop_reason.unwrap_or(StopReason::Terminated),
        }
    }
}
