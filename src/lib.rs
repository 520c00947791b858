pub mod archive;
pub mod candidates;
pub mod chain_search;
pub mod letter_set;
pub mod puzzle;
pub mod puzzle_data;
pub mod run_record;
pub mod session;
pub mod solution;
pub mod solution_store;
pub mod stats;
pub mod utilities;
