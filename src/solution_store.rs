use crate::solution::Solution;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// shortest chain that gets its own solutions file
pub const MIN_CHAIN_LENGTH: usize = 1;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum StoreError {
    #[display("could not read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[display("could not write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// one lock per solutions file, shared by every store in the process
static FILE_LOCKS: Lazy<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// the lock guarding read-then-append on the file at `path`
pub fn file_lock(path: &Path) -> Arc<Mutex<()>> {
    let mut locks = FILE_LOCKS
        .lock()
        .expect("a writer panicked while holding the solution file lock table");
    Arc::clone(locks.entry(path.to_path_buf()).or_default())
}

/// name of the file holding the solutions with `len` words
pub fn solution_file_name(len: usize) -> String {
    format!("length_{}_solutions.txt", len)
}

/// the per-length solution files of one puzzle directory. every file holds one encoded
/// solution per line and never holds the same solution twice.
#[derive(Debug, Clone)]
pub struct SolutionStore {
    directory: PathBuf,
}

impl SolutionStore {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn path_for(&self, len: usize) -> PathBuf {
        self.directory.join(solution_file_name(len))
    }

    /// merge `solutions` into the files for lengths `max_len` down to MIN_CHAIN_LENGTH,
    /// returning the number of lines appended to each file
    pub fn persist(
        &self,
        solutions: &[Solution],
        max_len: usize,
    ) -> Result<BTreeMap<usize, usize>, StoreError> {
        fs::create_dir_all(&self.directory).map_err(|source| StoreError::Write {
            path: self.directory.clone(),
            source,
        })?;

        // every spelling of the directory must map to the same locks
        let lock_directory =
            fs::canonicalize(&self.directory).unwrap_or_else(|_| self.directory.clone());

        let mut appended = BTreeMap::new();
        for len in (MIN_CHAIN_LENGTH..=max_len).rev() {
            let of_length: Vec<&Solution> = solutions.iter().filter(|s| s.len() == len).collect();
            let lock = file_lock(&lock_directory.join(solution_file_name(len)));
            let _guard = lock
                .lock()
                .expect("a writer panicked while holding a solution file lock");
            appended.insert(len, self.merge_length(len, &of_length)?);
        }

        info!(
            "persisted {} new solutions to {}",
            appended.values().sum::<usize>(),
            self.directory.display()
        );
        Ok(appended)
    }

    /// must be called with the file's lock held
    fn merge_length(&self, len: usize, solutions: &[&Solution]) -> Result<usize, StoreError> {
        let path = self.path_for(len);

        let existing = match fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(source) => return Err(StoreError::Read { path, source }),
        };

        let mut known: HashSet<String> = existing
            .as_deref()
            .map(|contents| contents.lines().map(|l| l.trim().to_owned()).collect())
            .unwrap_or_default();

        let mut new_lines = String::new();
        let mut new_count = 0;
        for solution in solutions {
            let encoded = solution.encode();
            if known.insert(encoded.clone()) {
                new_lines.push_str(&encoded);
                new_lines.push('\n');
                new_count += 1;
            }
        }

        let write_error = |source| StoreError::Write {
            path: path.clone(),
            source,
        };
        match existing {
            None => {
                fs::write(&path, new_lines).map_err(write_error)?;
                debug!("created {} with {} solutions", path.display(), new_count);
            }
            Some(_) if new_count == 0 => {
                debug!("{} already holds every solution", path.display());
            }
            Some(contents) => {
                let mut file = OpenOptions::new()
                    .append(true)
                    .open(&path)
                    .map_err(write_error)?;
                if !contents.is_empty() && !contents.ends_with('\n') {
                    file.write_all(b"\n").map_err(write_error)?;
                }
                file.write_all(new_lines.as_bytes()).map_err(write_error)?;
                debug!("appended {} solutions to {}", new_count, path.display());
            }
        }

        Ok(new_count)
    }

    /// read the solutions with `len` words. a missing file holds no solutions, and
    /// lines that do not decode are reported and skipped.
    pub fn read_length(&self, len: usize) -> Result<Vec<Solution>, StoreError> {
        let path = self.path_for(len);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no solutions file at {}", path.display());
                return Ok(Vec::new());
            }
            Err(source) => return Err(StoreError::Read { path, source }),
        };

        Ok(decode_lines(&path, &contents))
    }
}

/// decode every non-blank line, skipping the malformed ones
pub fn decode_lines(path: &Path, contents: &str) -> Vec<Solution> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(line_num, line)| match Solution::decode(line) {
            Ok(solution) => Some(solution),
            Err(e) => {
                warn!(
                    "skipping line {} of {} ({:?}): {}",
                    line_num + 1,
                    path.display(),
                    line,
                    e
                );
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utilities::test_utilities::{test_directory, TestCleanup};

    fn lines_of(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn test_persist_creates_files() {
        let dir = test_directory("test_persist_creates_files");
        let _cleanup = TestCleanup::new(dir.clone());
        let store = SolutionStore::new(&dir);

        let solutions = vec![
            Solution::from(vec!["a", "b"]),
            Solution::from(vec!["c", "d", "e"]),
            Solution::from(vec!["f", "g", "h", "i"]),
        ];
        let appended = store.persist(&solutions, 4).unwrap();

        assert_eq!(lines_of(&store.path_for(2)), vec![r#"["a","b"]"#]);
        assert_eq!(lines_of(&store.path_for(3)), vec![r#"["c","d","e"]"#]);
        assert_eq!(lines_of(&store.path_for(4)), vec![r#"["f","g","h","i"]"#]);
        // lengths without solutions still get a file
        assert!(lines_of(&store.path_for(1)).is_empty());
        assert_eq!(
            appended,
            BTreeMap::from([(1, 0), (2, 1), (3, 1), (4, 1)])
        );
    }

    #[test]
    fn test_persist_is_idempotent() {
        let dir = test_directory("test_persist_is_idempotent");
        let _cleanup = TestCleanup::new(dir.clone());
        let store = SolutionStore::new(&dir);

        let solutions = vec![Solution::from(vec!["a", "b"])];
        store.persist(&solutions, 2).unwrap();
        let first = fs::read_to_string(store.path_for(2)).unwrap();

        for _ in 0..10 {
            let appended = store.persist(&solutions, 2).unwrap();
            assert_eq!(appended[&2], 0);
        }
        let after = fs::read_to_string(store.path_for(2)).unwrap();
        assert_eq!(first, after);
        assert_eq!(lines_of(&store.path_for(2)), vec![r#"["a","b"]"#]);
    }

    #[test]
    fn test_persist_appends_only_new_solutions() {
        let dir = test_directory("test_persist_appends_only_new_solutions");
        let _cleanup = TestCleanup::new(dir.clone());
        let store = SolutionStore::new(&dir);

        store
            .persist(&[Solution::from(vec!["a", "b"])], 3)
            .unwrap();
        let length_2_before = fs::read_to_string(store.path_for(2)).unwrap();

        let solutions = vec![
            Solution::from(vec!["a", "b"]),
            Solution::from(vec!["x", "y", "z"]),
        ];
        let appended = store.persist(&solutions, 3).unwrap();

        assert_eq!(appended[&2], 0);
        assert_eq!(appended[&3], 1);
        assert_eq!(
            fs::read_to_string(store.path_for(2)).unwrap(),
            length_2_before
        );
        assert_eq!(lines_of(&store.path_for(3)), vec![r#"["x","y","z"]"#]);
    }

    #[test]
    fn test_persist_repairs_missing_trailing_newline() {
        let dir = test_directory("test_persist_repairs_missing_trailing_newline");
        let _cleanup = TestCleanup::new(dir.clone());
        let store = SolutionStore::new(&dir);

        fs::create_dir_all(&dir).unwrap();
        fs::write(store.path_for(2), r#"["a","b"]"#).unwrap();
        store
            .persist(&[Solution::from(vec!["b", "c"])], 2)
            .unwrap();
        assert_eq!(
            lines_of(&store.path_for(2)),
            vec![r#"["a","b"]"#, r#"["b","c"]"#]
        );
    }

    #[test]
    fn test_read_length_skips_malformed_lines() {
        let dir = test_directory("test_read_length_skips_malformed_lines");
        let _cleanup = TestCleanup::new(dir.clone());
        let store = SolutionStore::new(&dir);

        fs::create_dir_all(&dir).unwrap();
        fs::write(
            store.path_for(2),
            "[\"ab\",\"bc\"]\n['legacy', 'line']\n\nnot a list\n[\"cd\",\"de\"]\n",
        )
        .unwrap();

        assert_eq!(
            store.read_length(2).unwrap(),
            vec![
                Solution::from(vec!["ab", "bc"]),
                Solution::from(vec!["cd", "de"])
            ]
        );
    }

    #[test]
    fn test_file_lock_is_shared_per_path() {
        let path = test_directory("test_file_lock_is_shared_per_path").join(solution_file_name(2));
        assert!(Arc::ptr_eq(&file_lock(&path), &file_lock(&path)));
        assert!(!Arc::ptr_eq(
            &file_lock(&path),
            &file_lock(&path.with_file_name(solution_file_name(3)))
        ));
    }

    #[test]
    fn test_concurrent_stores_on_one_directory() {
        let dir = test_directory("test_concurrent_stores_on_one_directory");
        let _cleanup = TestCleanup::new(dir.clone());
        fs::create_dir_all(&dir).unwrap();

        const WRITERS: usize = 4;
        const ROUNDS: usize = 50;
        crossbeam::thread::scope(|s| {
            for writer in 0..WRITERS {
                // a separate store per writer, one through a relative-looking path
                let store = if writer % 2 == 0 {
                    SolutionStore::new(&dir)
                } else {
                    SolutionStore::new(dir.join(".").join(""))
                };
                s.spawn(move |_| {
                    for round in 0..ROUNDS {
                        // overlapping sets so most rounds race on the same lines
                        let solutions = vec![
                            Solution::from(vec!["shared".to_string(), format!("r{}", round)]),
                            Solution::from(vec![
                                format!("w{}", writer),
                                format!("r{}", round % 5),
                            ]),
                        ];
                        store.persist(&solutions, 2).unwrap();
                    }
                });
            }
        })
        .unwrap();

        let lines = lines_of(&SolutionStore::new(&dir).path_for(2));
        let unique: HashSet<&String> = lines.iter().collect();
        assert_eq!(lines.len(), unique.len());
        assert_eq!(lines.len(), ROUNDS + WRITERS * 5);
    }

    #[test]
    fn test_read_missing_length_is_empty() {
        let dir = test_directory("test_read_missing_length_is_empty");
        let store = SolutionStore::new(&dir);
        assert!(store.read_length(5).unwrap().is_empty());
    }

    #[test]
    fn test_read_back_what_was_persisted() {
        let dir = test_directory("test_read_back_what_was_persisted");
        let _cleanup = TestCleanup::new(dir.clone());
        let store = SolutionStore::new(&dir);

        let solutions = vec![
            Solution::from(vec!["fade", "echo"]),
            Solution::from(vec!["oaf", "fig"]),
        ];
        store.persist(&solutions, 2).unwrap();
        assert_eq!(store.read_length(2).unwrap(), solutions);
    }
}
