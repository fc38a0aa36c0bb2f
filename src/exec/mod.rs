// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`launcher`] provides the `ProcessLauncher` trait and the production
//!   `CommandLauncher` (`tokio::process::Command`, output redirected to a
//!   truncated file).
//! - [`pool`] owns the bounded worker pool that drains the job queue.
//! - [`job`] holds per-job runtime state, results and the batch summary.

pub mod job;
pub mod launcher;
pub mod pool;

pub use job::{BatchSummary, Job, JobResult, JobState, ProcessExit};
pub use launcher::{CommandLauncher, LaunchFuture, ProcessLauncher};
pub use pool::{run_jobs, BoundedExecutor};
