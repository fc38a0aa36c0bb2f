// src/exec/pool.rs

//! Fixed-size worker pool that drains a job queue with bounded concurrency.

use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::errors::{GridrunError, JobError, Result};
use crate::exec::job::{Job, JobResult, ProcessExit};
use crate::exec::launcher::ProcessLauncher;
use crate::grid::JobSpec;

/// Shared FIFO over the (lazy) job sequence. Each element is handed to
/// exactly one worker.
type JobQueue<I> = Arc<Mutex<I>>;

/// Runs jobs through a [`ProcessLauncher`] with at most `concurrency`
/// processes in flight.
///
/// There is no per-job timeout: a process that never exits keeps its worker
/// busy for the rest of the batch.
#[derive(Debug)]
pub struct BoundedExecutor<L: ProcessLauncher> {
    launcher: Arc<L>,
    concurrency: NonZeroUsize,
}

impl<L: ProcessLauncher> BoundedExecutor<L> {
    /// `concurrency` must be at least 1.
    pub fn new(launcher: L, concurrency: usize) -> Result<Self> {
        Self::with_shared(Arc::new(launcher), concurrency)
    }

    /// Same as [`BoundedExecutor::new`] for a launcher the caller keeps a
    /// handle to (e.g. to inspect an instrumented launcher afterwards).
    pub fn with_shared(launcher: Arc<L>, concurrency: usize) -> Result<Self> {
        let concurrency = NonZeroUsize::new(concurrency).ok_or_else(|| {
            GridrunError::config("concurrency must be >= 1 (got 0)")
        })?;
        Ok(Self {
            launcher,
            concurrency,
        })
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency.get()
    }

    /// Run every job and return once all of them reached a terminal state.
    ///
    /// Results come back in arrival (completion) order; use
    /// `JobResult::spec.index()` to restore expansion order if needed.
    /// Per-job failures are recorded in the results and never abort the batch,
    /// including a launcher that panics.
    pub async fn run<I>(&self, jobs: I) -> Vec<JobResult>
    where
        I: IntoIterator<Item = JobSpec>,
        I::IntoIter: Send + 'static,
    {
        let jobs = jobs.into_iter();
        let workers = self
            .concurrency
            .get()
            .min(jobs.size_hint().1.unwrap_or(usize::MAX));
        let queue: JobQueue<I::IntoIter> = Arc::new(Mutex::new(jobs));
        let (result_tx, mut result_rx) = mpsc::unbounded_channel::<JobResult>();

        info!(workers, "starting worker pool");

        let mut set = JoinSet::new();
        for worker in 0..workers {
            set.spawn(worker_loop(
                worker,
                Arc::clone(&queue),
                Arc::clone(&self.launcher),
                result_tx.clone(),
            ));
        }
        // Workers hold the only remaining senders; the channel closes when
        // the last one exits.
        drop(result_tx);

        let mut results = Vec::new();
        while let Some(result) = result_rx.recv().await {
            results.push(result);
        }

        while let Some(joined) = set.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "worker task ended abnormally");
            }
        }

        info!(jobs = results.len(), "worker pool drained");
        results
    }
}

/// Pull jobs until the queue is empty.
async fn worker_loop<I, L>(
    worker: usize,
    queue: JobQueue<I>,
    launcher: Arc<L>,
    results: mpsc::UnboundedSender<JobResult>,
) where
    I: Iterator<Item = JobSpec> + Send,
    L: ProcessLauncher,
{
    debug!(worker, "worker started");
    let mut handled = 0usize;

    loop {
        // Lock only for the dequeue; never across the process wait.
        let next = { queue.lock().await.next() };
        let Some(spec) = next else { break };

        let result = run_job(worker, Job::new(spec), &launcher).await;
        handled += 1;

        if results.send(result).is_err() {
            warn!(worker, "result receiver dropped; stopping worker");
            break;
        }
    }

    debug!(worker, handled, "worker finished (queue empty)");
}

async fn run_job<L: ProcessLauncher>(worker: usize, mut job: Job, launcher: &Arc<L>) -> JobResult {
    job.mark_running();
    let spec = job.spec();
    info!(
        worker,
        job = %spec,
        cmd = %spec.command(),
        output = ?spec.output_path(),
        "starting job"
    );

    let outcome = launch_isolated(launcher, spec).await;

    match &outcome {
        Ok(exit) if !exit.success() => {
            warn!(worker, job = %job.spec(), %exit, "job exited unsuccessfully");
        }
        Ok(_) => {}
        Err(e) => {
            error!(worker, job = %job.spec(), error = %e, "job failed");
        }
    }

    job.settle(&outcome);
    debug!(worker, job = %job.spec(), state = ?job.state(), "job settled");
    job.into_result(outcome)
}

/// Run one launch on its own task; a panic inside the launcher becomes
/// [`JobError::Crashed`]. The task is aborted if the worker is dropped.
async fn launch_isolated<L: ProcessLauncher>(
    launcher: &Arc<L>,
    spec: &JobSpec,
) -> std::result::Result<ProcessExit, JobError> {
    let launcher = Arc::clone(launcher);
    let command = spec.command().to_string();
    let output = spec.output_path().to_path_buf();

    let mut attempt = JoinSet::new();
    attempt.spawn(async move { launcher.launch(&command, &output).await });

    let reason = match attempt.join_next().await {
        Some(Ok(outcome)) => return outcome,
        Some(Err(e)) => e.to_string(),
        None => "launch task was never scheduled".to_string(),
    };
    Err(JobError::Crashed {
        command: spec.command().to_string(),
        reason,
    })
}

/// Run `jobs` with at most `concurrency` processes at once.
///
/// Convenience wrapper around [`BoundedExecutor`]; fails only if
/// `concurrency` is 0.
pub async fn run_jobs<L, I>(launcher: L, jobs: I, concurrency: usize) -> Result<Vec<JobResult>>
where
    L: ProcessLauncher,
    I: IntoIterator<Item = JobSpec>,
    I::IntoIter: Send + 'static,
{
    let executor = BoundedExecutor::new(launcher, concurrency)?;
    Ok(executor.run(jobs).await)
}
