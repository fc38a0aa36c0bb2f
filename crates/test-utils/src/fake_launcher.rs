use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use gridrun::errors::JobError;
use gridrun::exec::{LaunchFuture, ProcessExit, ProcessLauncher};

/// A fake launcher that:
/// - records every `(command, output)` it was asked to run
/// - tracks how many launches are in flight and the peak of that count
/// - "runs" each command by sleeping for a fixed delay
/// - fails launches for commands containing a marker, and returns configured
///   exit codes for others (0 by default)
/// - panics mid-launch for commands containing a second marker.
#[derive(Debug, Default)]
pub struct FakeLauncher {
    delay: Duration,
    fail_marker: Option<String>,
    panic_marker: Option<String>,
    exit_codes: HashMap<String, i32>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    launched: Mutex<Vec<(String, PathBuf)>>,
}

impl FakeLauncher {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    /// Commands containing `marker` fail with a "not found" launch error.
    pub fn failing_when_contains(mut self, marker: &str) -> Self {
        self.fail_marker = Some(marker.to_string());
        self
    }

    /// Commands containing `marker` make the launcher panic.
    pub fn panicking_when_contains(mut self, marker: &str) -> Self {
        self.panic_marker = Some(marker.to_string());
        self
    }

    /// Exact command `cmd` exits with `code`.
    pub fn exit_code_for(mut self, cmd: &str, code: i32) -> Self {
        self.exit_codes.insert(cmd.to_string(), code);
        self
    }

    /// Highest number of simultaneous launches observed.
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Commands in the order they were launched.
    pub fn launched_commands(&self) -> Vec<String> {
        self.launched
            .lock()
            .unwrap()
            .iter()
            .map(|(cmd, _)| cmd.clone())
            .collect()
    }

    pub fn launched_outputs(&self) -> Vec<PathBuf> {
        self.launched
            .lock()
            .unwrap()
            .iter()
            .map(|(_, out)| out.clone())
            .collect()
    }
}

impl ProcessLauncher for FakeLauncher {
    fn launch<'a>(&'a self, command: &'a str, output: &'a Path) -> LaunchFuture<'a> {
        Box::pin(async move {
            self.launched
                .lock()
                .unwrap()
                .push((command.to_string(), output.to_path_buf()));

            if let Some(ref marker) = self.fail_marker {
                if command.contains(marker.as_str()) {
                    return Err(JobError::Launch {
                        command: command.to_string(),
                        source: io::Error::new(io::ErrorKind::NotFound, "no such executable"),
                    });
                }
            }

            if let Some(ref marker) = self.panic_marker {
                if command.contains(marker.as_str()) {
                    panic!("fake launcher blew up on `{command}`");
                }
            }

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            tokio::time::sleep(self.delay).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            let code = self.exit_codes.get(command).copied().unwrap_or(0);
            Ok(ProcessExit::Code(code))
        })
    }
}
