use std::path::PathBuf;
use std::process;
use std::sync::atomic::Ordering as MemoryOrdering;
use std::time::Duration;

use clap::{Parser, Subcommand};
use log::{error, warn};

use letterbox_solver::archive::{letter_range, ArchiveError, SolutionArchive};
use letterbox_solver::chain_search::{DEFAULT_BREAK_OUT_COUNTER, DEFAULT_MAX_BARREN_ATTEMPTS};
use letterbox_solver::puzzle_data::PuzzleData;
use letterbox_solver::session::{Session, SessionOptions};
use letterbox_solver::solution_store::MIN_CHAIN_LENGTH;

/// solve letter boxed puzzles and inspect the archived solutions
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// search a puzzle and merge its solutions into the archive
    Solve {
        /// provider payload (json) describing the puzzle
        #[arg(long, value_name = "FILE")]
        puzzle: PathBuf,

        /// root of the solutions archive
        #[arg(long, value_name = "DIR")]
        archive: PathBuf,

        /// extra word list merged into the puzzle's dictionary
        #[arg(long, value_name = "FILE")]
        dictionary: Option<PathBuf>,

        /// consecutive known chains tolerated before the search gives up
        #[arg(short = 'c', long = "counter", default_value_t = DEFAULT_BREAK_OUT_COUNTER)]
        break_out_counter: u64,

        /// longest chain accepted as a solution (defaults to the puzzle's par)
        #[arg(short = 'l', long = "solution-length")]
        solution_length: Option<usize>,

        /// consecutive attempts without any chain tolerated before the search gives up
        #[arg(long, default_value_t = DEFAULT_MAX_BARREN_ATTEMPTS)]
        max_barren_attempts: u64,

        #[arg(long, default_value_t = 1)]
        workers: usize,

        /// seed for reproducible searches
        #[arg(long)]
        seed: Option<u64>,

        /// stop searching after this many seconds
        #[arg(long, value_name = "SECS")]
        time_limit: Option<u64>,

        /// csv file the run record is appended to
        #[arg(long, value_name = "FILE")]
        stats_csv: Option<PathBuf>,
    },
    /// summarize the archived solutions of one puzzle
    Inspect {
        #[arg(long, value_name = "DIR")]
        archive: PathBuf,

        /// puzzle date, as used for its archive directory
        #[arg(long)]
        date: String,

        /// list the solutions using this word
        #[arg(long)]
        word: Option<String>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = match Args::parse().command {
        Command::Solve {
            puzzle,
            archive,
            dictionary,
            break_out_counter,
            solution_length,
            max_barren_attempts,
            workers,
            seed,
            time_limit,
            stats_csv,
        } => {
            let options = SessionOptions {
                word_list: dictionary,
                stats_csv,
                par: solution_length,
                break_out_counter,
                max_barren_attempts,
                workers,
                seed,
                time_limit: time_limit.map(Duration::from_secs),
                ..SessionOptions::new(archive)
            };
            solve(puzzle, options)
        }
        Command::Inspect {
            archive,
            date,
            word,
        } => inspect(archive, &date, word.as_deref()),
    };

    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}

fn solve(puzzle: PathBuf, options: SessionOptions) -> Result<(), Box<dyn std::error::Error>> {
    // set up early termination infrastructure
    let terminator = options.terminator.clone();
    if let Err(e) = ctrlc::set_handler(move || terminator.store(true, MemoryOrdering::SeqCst)) {
        warn!("could not set ctrl-c handler, the search can only stop on its own: {}", e);
    }

    let data = PuzzleData::from_file(puzzle)?;
    let session = Session::new(data, options)?;
    let outcome = session.run()?;
    let report = &outcome.report;

    println!("{}", session.puzzle());
    println!(
        "{} solutions in {} attempts ({:.3}s, {})",
        report.solutions.len(),
        report.attempts,
        report.elapsed.as_secs_f64(),
        report.stop_reason
    );
    match report.best_solution() {
        Some(best) => println!("best solution: {} ({} letters)", best, best.total_letters()),
        None => println!("no solution of two words or fewer"),
    }
    println!(
        "official solution {}: {}",
        session.data().official_solution,
        if report.contains(&session.data().official_solution) {
            "found"
        } else {
            "not found"
        }
    );
    print!("{}", outcome.statistics);
    Ok(())
}

fn inspect(
    archive: PathBuf,
    date: &str,
    word: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut archive = SolutionArchive::open(archive, date)?;
    println!("{} (par {})", archive.directory().display(), archive.par());

    for len in MIN_CHAIN_LENGTH..=archive.par() {
        let solutions = match archive.solutions(len) {
            Ok(solutions) => solutions,
            Err(ArchiveError::MissingLength { .. }) => {
                println!("{}-word solutions: no file", len);
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        match letter_range(solutions) {
            Some((min, max)) => println!(
                "{}-word solutions: {} ({} to {} letters)",
                len,
                solutions.len(),
                min,
                max
            ),
            None => println!("{}-word solutions: 0", len),
        }
    }

    if let Some(word) = word {
        for solution in archive.solutions_with_word(word, None)? {
            println!("{}", solution);
        }
    }
    Ok(())
}
