use crate::chain_search::SearchReport;
use crate::solution::Solution;
use crate::solution_store::StoreError;
use log::debug;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// one line of the cross-run statistics file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    pub date: String,
    pub par: usize,
    pub superset: String,
    pub total_solutions: usize,
    pub best_solution_count: usize,
    pub official_solution: Solution,
    pub official_found: bool,
    pub best_solution: Option<Solution>,
    pub break_out_counter: u64,
    pub solve_time: Duration,
}

impl RunRecord {
    pub fn new(
        date: &str,
        par: usize,
        superset: &str,
        official_solution: &Solution,
        break_out_counter: u64,
        report: &SearchReport,
    ) -> Self {
        Self {
            date: date.to_owned(),
            par,
            superset: superset.to_owned(),
            total_solutions: report.solutions.len(),
            best_solution_count: report.best_solutions.len(),
            official_solution: official_solution.clone(),
            official_found: report.contains(official_solution),
            best_solution: report.best_solution().cloned(),
            break_out_counter,
            solve_time: report.elapsed,
        }
    }

    /// the record as a single csv line, newline included
    pub fn to_csv_line(&self) -> String {
        let best = self
            .best_solution
            .as_ref()
            .map_or_else(|| "None".to_owned(), Solution::encode);
        format!(
            "{},{},{},{},{},{},{},{},{},{:.3}\n",
            quote(&self.date),
            self.par,
            self.superset,
            self.total_solutions,
            self.best_solution_count,
            quote(&self.official_solution.encode()),
            self.official_found,
            quote(&best),
            self.break_out_counter,
            self.solve_time.as_secs_f64()
        )
    }

    /// append the record to `path`, creating the file if needed
    pub fn append_to<P: AsRef<Path>>(&self, path: P) -> Result<(), StoreError> {
        let path = path.as_ref();
        let write_error = |source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(write_error)?;
        file.write_all(self.to_csv_line().as_bytes())
            .map_err(write_error)?;

        debug!("appended run record for {} to {}", self.date, path.display());
        Ok(())
    }
}

/// double embedded quotes so encoded solutions stay one csv field
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
