// tests/executor_fake_launcher.rs

mod common;
use crate::common::builders::{gcn_sweep, SweepConfigBuilder};
use crate::common::{init_tracing, with_timeout, FakeLauncher};

use std::collections::HashSet;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use gridrun::errors::{GridrunError, JobError};
use gridrun::grid::JobSpec;
use gridrun::exec::{run_jobs, BatchSummary, BoundedExecutor, JobResult, ProcessExit};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn example_scenario_runs_four_jobs_two_at_a_time() -> TestResult {
    init_tracing();

    let cfg = SweepConfigBuilder::new("./sim -b={buffer_size} -w={workload} -d={divider}")
        .axis("divider", [1, 2])
        .axis("buffer_size", [32, 64])
        .axis("workload", ["g1"])
        .concurrency(2)
        .build();

    let launcher = Arc::new(FakeLauncher::new(Duration::from_millis(30)));
    let executor = BoundedExecutor::with_shared(Arc::clone(&launcher), cfg.concurrency())?;
    let results = with_timeout(executor.run(cfg.grid().expand())).await;

    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|r| r.exit_status() == Some(ProcessExit::Code(0))));
    assert!(launcher.peak_in_flight() <= 2);
    assert_eq!(launcher.in_flight(), 0);

    let mut names: Vec<String> = launcher
        .launched_outputs()
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "g1.32.1.sched.out",
            "g1.32.2.sched.out",
            "g1.64.1.sched.out",
            "g1.64.2.sched.out",
        ]
    );

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrency_never_exceeds_k() -> TestResult {
    init_tracing();

    for k in [1usize, 2, 3, 7] {
        let cfg = gcn_sweep(&["g1"]).concurrency(k).build();
        let launcher = Arc::new(FakeLauncher::new(Duration::from_millis(5)));
        let executor = BoundedExecutor::with_shared(Arc::clone(&launcher), k)?;

        let results = with_timeout(executor.run(cfg.grid().expand())).await;

        assert_eq!(results.len(), 25, "k = {k}");
        assert!(
            launcher.peak_in_flight() <= k,
            "k = {k}, peak = {}",
            launcher.peak_in_flight()
        );
        assert!(launcher.peak_in_flight() >= 1);
    }

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn pool_actually_runs_jobs_in_parallel() -> TestResult {
    let cfg = gcn_sweep(&["g1", "g2"]).build();
    let launcher = Arc::new(FakeLauncher::new(Duration::from_millis(50)));
    let executor = BoundedExecutor::with_shared(Arc::clone(&launcher), 10)?;

    let results = with_timeout(executor.run(cfg.grid().expand())).await;

    assert_eq!(results.len(), 50);
    // 50 jobs of 50ms each with 10 workers: the pool must have overlapped them.
    assert!(launcher.peak_in_flight() > 1);
    assert!(launcher.peak_in_flight() <= 10);

    Ok(())
}

#[tokio::test]
async fn every_job_dispatched_exactly_once_in_queue_order() -> TestResult {
    let cfg = gcn_sweep(&["g1", "g2"]).build();
    let launcher = Arc::new(FakeLauncher::new(Duration::ZERO));
    let executor = BoundedExecutor::with_shared(Arc::clone(&launcher), 1)?;

    let results = with_timeout(executor.run(cfg.grid().expand())).await;

    let expected: Vec<String> = cfg.grid().expand().map(|j| j.command().to_string()).collect();
    // One worker: dispatch order is exactly the expansion order.
    assert_eq!(launcher.launched_commands(), expected);

    let indices: HashSet<usize> = results.iter().map(|r| r.spec.index()).collect();
    assert_eq!(indices.len(), 50);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn launch_error_is_isolated_to_its_job() -> TestResult {
    init_tracing();

    let cfg = SweepConfigBuilder::new("./{bin} -n={n}")
        .axis("bin", ["sim", "missing_sim"])
        .axis("n", [1, 2, 3])
        .build();

    let launcher = FakeLauncher::new(Duration::from_millis(5))
        .failing_when_contains("missing_sim")
        .exit_code_for("./sim -n=2", 3);

    let results = with_timeout(run_jobs(launcher, cfg.grid().expand(), 2)).await?;
    assert_eq!(results.len(), 6);

    let (failed, ran): (Vec<&JobResult>, Vec<&JobResult>) =
        results.iter().partition(|r| r.error().is_some());

    assert_eq!(failed.len(), 3);
    assert!(failed.iter().all(|r| r.error().is_some_and(|e| e.is_launch_error())));
    assert!(failed.iter().all(|r| r.spec.command().contains("missing_sim")));

    assert_eq!(ran.len(), 3);
    let non_zero: Vec<&&JobResult> = ran.iter().filter(|r| !r.succeeded()).collect();
    assert_eq!(non_zero.len(), 1);
    assert_eq!(non_zero[0].exit_status(), Some(ProcessExit::Code(3)));

    let summary = BatchSummary::from_results(&results);
    assert_eq!(
        summary,
        BatchSummary {
            total: 6,
            succeeded: 2,
            non_zero_exits: 1,
            launch_errors: 3,
            output_errors: 0,
            other_errors: 0,
        }
    );
    assert!(!summary.all_succeeded());

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn panicking_launch_fails_only_its_job() -> TestResult {
    init_tracing();

    let cfg = SweepConfigBuilder::new("./sim {n}")
        .axis("n", [1, 2, 3, 4, 5])
        .build();
    let launcher = Arc::new(FakeLauncher::new(Duration::ZERO).panicking_when_contains("./sim 2"));
    // A single worker: losing it would strand every job behind the panic.
    let executor = BoundedExecutor::with_shared(Arc::clone(&launcher), 1)?;

    let results = with_timeout(executor.run(cfg.grid().expand())).await;

    assert_eq!(results.len(), 5);
    assert_eq!(launcher.launched_commands().len(), 5);

    let crashed: Vec<&JobResult> = results.iter().filter(|r| r.error().is_some()).collect();
    assert_eq!(crashed.len(), 1);
    assert_eq!(crashed[0].spec.command(), "./sim 2");
    assert!(matches!(crashed[0].error(), Some(JobError::Crashed { .. })));

    let summary = BatchSummary::from_results(&results);
    assert_eq!(summary.succeeded, 4);
    assert_eq!(summary.other_errors, 1);

    Ok(())
}

#[tokio::test]
async fn huge_concurrency_only_spawns_needed_workers() -> TestResult {
    let cfg = SweepConfigBuilder::new("echo {n}").axis("n", [1, 2, 3]).build();
    let results = with_timeout(run_jobs(
        FakeLauncher::new(Duration::ZERO),
        cfg.grid().expand(),
        usize::MAX,
    ))
    .await?;
    assert_eq!(results.len(), 3);
    Ok(())
}

#[tokio::test]
async fn empty_batch_returns_immediately() -> TestResult {
    let launcher = Arc::new(FakeLauncher::new(Duration::ZERO));
    let executor = BoundedExecutor::with_shared(Arc::clone(&launcher), 4)?;

    let results = with_timeout(executor.run(Vec::<JobSpec>::new())).await;

    assert!(results.is_empty());
    assert!(launcher.launched_commands().is_empty());
    assert_eq!(BatchSummary::from_results(&results).total, 0);
    Ok(())
}

#[tokio::test]
async fn more_workers_than_jobs_is_fine() -> TestResult {
    let cfg = SweepConfigBuilder::new("echo {n}").axis("n", [1, 2]).build();
    let results = with_timeout(run_jobs(
        FakeLauncher::new(Duration::from_millis(1)),
        cfg.grid().expand(),
        16,
    ))
    .await?;
    assert_eq!(results.len(), 2);
    Ok(())
}

#[test]
fn zero_concurrency_is_a_config_error() {
    let result = BoundedExecutor::new(FakeLauncher::default(), 0);
    assert!(matches!(result, Err(GridrunError::ConfigError(_))));
}
