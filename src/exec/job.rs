// src/exec/job.rs

//! Runtime job state and per-job results.

use std::fmt;

use crate::errors::JobError;
use crate::grid::JobSpec;

/// How a finished process ended.
///
/// Recorded as-is; the executor never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessExit {
    /// Normal exit with a status code.
    Code(i32),
    /// Terminated without a code (e.g. killed by a signal on Unix).
    Signaled,
}

impl ProcessExit {
    pub fn success(&self) -> bool {
        matches!(self, ProcessExit::Code(0))
    }

    pub fn code(&self) -> Option<i32> {
        match self {
            ProcessExit::Code(code) => Some(*code),
            ProcessExit::Signaled => None,
        }
    }
}

impl From<std::process::ExitStatus> for ProcessExit {
    fn from(status: std::process::ExitStatus) -> Self {
        match status.code() {
            Some(code) => ProcessExit::Code(code),
            None => ProcessExit::Signaled,
        }
    }
}

impl fmt::Display for ProcessExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessExit::Code(code) => write!(f, "exit code {code}"),
            ProcessExit::Signaled => f.write_str("terminated by signal"),
        }
    }
}

/// Lifecycle of a job inside a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    NotStarted,
    Running,
    Completed(ProcessExit),
    /// The process never ran to an exit status; the error is in the result.
    Failed,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed(_) | JobState::Failed)
    }
}

/// A `JobSpec` paired with its runtime state.
///
/// Lives only inside the worker that dequeued it and is consumed into a
/// [`JobResult`] once the process is gone.
#[derive(Debug)]
pub struct Job {
    spec: JobSpec,
    state: JobState,
}

impl Job {
    pub fn new(spec: JobSpec) -> Self {
        Self {
            spec,
            state: JobState::NotStarted,
        }
    }

    pub fn spec(&self) -> &JobSpec {
        &self.spec
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn mark_running(&mut self) {
        self.state = JobState::Running;
    }

    /// Move to the terminal state matching the launcher's outcome.
    pub fn settle(&mut self, outcome: &Result<ProcessExit, JobError>) {
        self.state = match outcome {
            Ok(exit) => JobState::Completed(*exit),
            Err(_) => JobState::Failed,
        };
    }

    /// Consume the job into its result.
    pub fn into_result(self, outcome: Result<ProcessExit, JobError>) -> JobResult {
        JobResult {
            spec: self.spec,
            outcome,
        }
    }
}

/// Terminal record for one job.
#[derive(Debug)]
pub struct JobResult {
    pub spec: JobSpec,
    pub outcome: Result<ProcessExit, JobError>,
}

impl JobResult {
    /// Exit status if the process ran to completion.
    pub fn exit_status(&self) -> Option<ProcessExit> {
        self.outcome.as_ref().ok().copied()
    }

    pub fn error(&self) -> Option<&JobError> {
        self.outcome.as_ref().err()
    }

    /// Ran and exited with status 0.
    pub fn succeeded(&self) -> bool {
        self.exit_status().is_some_and(|exit| exit.success())
    }
}

/// Counts derived from a batch of results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub non_zero_exits: usize,
    pub launch_errors: usize,
    pub output_errors: usize,
    pub other_errors: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[JobResult]) -> Self {
        let mut summary = BatchSummary {
            total: results.len(),
            ..Default::default()
        };
        for result in results {
            match &result.outcome {
                Ok(exit) if exit.success() => summary.succeeded += 1,
                Ok(_) => summary.non_zero_exits += 1,
                Err(e) if e.is_launch_error() => summary.launch_errors += 1,
                Err(e) if e.is_output_error() => summary.output_errors += 1,
                Err(_) => summary.other_errors += 1,
            }
        }
        summary
    }

    /// True when every job ran and exited with status 0.
    pub fn all_succeeded(&self) -> bool {
        self.succeeded == self.total
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} jobs: {} succeeded, {} non-zero exits, {} launch errors, {} output errors",
            self.total, self.succeeded, self.non_zero_exits, self.launch_errors, self.output_errors
        )?;
        if self.other_errors > 0 {
            write!(f, ", {} other errors", self.other_errors)?;
        }
        Ok(())
    }
}
