#![allow(dead_code, unused_imports)]

pub use gridrun_test_utils::builders;
pub use gridrun_test_utils::fake_launcher::FakeLauncher;
pub use gridrun_test_utils::{init_tracing, with_timeout};

use std::path::Path;

use gridrun::grid::JobSpec;

/// File names (not full paths) of the given jobs, in order.
pub fn file_names(jobs: &[JobSpec]) -> Vec<String> {
    jobs.iter()
        .map(|j| {
            j.output_path()
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
        .collect()
}

/// Read a file to string, panicking with the path on failure.
pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| panic!("reading {path:?}: {e}"))
}
