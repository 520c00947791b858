use std::fs::remove_dir_all;
use std::path::{Path, PathBuf};

/// a per-test directory under the system temp directory so that tests can run in parallel
pub fn test_directory(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("letterbox-{}-{}", std::process::id(), name))
}

/// convenience struct to ensure that temporary test files get cleaned up
/// even after a panic
pub struct TestCleanup<P: AsRef<Path>> {
    test_dir: Option<P>,
}

impl<P: AsRef<Path>> TestCleanup<P> {
    pub fn new(test_dir: P) -> Self {
        Self {
            test_dir: Some(test_dir),
        }
    }
}

impl<P: AsRef<Path>> Drop for TestCleanup<P> {
    fn drop(&mut self) {
        if let Some(dir) = self.test_dir.take() {
            // the test may have failed before creating its directory
            let _ = remove_dir_all(dir);
        }
    }
}
