// src/exec/launcher.rs

//! Pluggable process launcher abstraction.
//!
//! The worker pool talks to a `ProcessLauncher` instead of spawning processes
//! itself, so tests can swap in an instrumented fake while production uses
//! [`CommandLauncher`] (built on `tokio::process::Command`).

use std::fs::{File, OpenOptions};
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::JobError;
use crate::exec::job::ProcessExit;
use crate::types::LaunchMode;

/// Future returned by [`ProcessLauncher::launch`].
pub type LaunchFuture<'a> = Pin<Box<dyn Future<Output = Result<ProcessExit, JobError>> + Send + 'a>>;

/// Capability: run `command`, send its stdout and stderr to `output`
/// (created or truncated), wait for it to exit, and report how it ended.
pub trait ProcessLauncher: Send + Sync + 'static {
    fn launch<'a>(&'a self, command: &'a str, output: &'a Path) -> LaunchFuture<'a>;
}

/// Production launcher backed by real OS processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandLauncher {
    mode: LaunchMode,
}

impl CommandLauncher {
    pub fn new(mode: LaunchMode) -> Self {
        Self { mode }
    }
}

impl ProcessLauncher for CommandLauncher {
    fn launch<'a>(&'a self, command: &'a str, output: &'a Path) -> LaunchFuture<'a> {
        Box::pin(run_command(self.mode, command, output))
    }
}

async fn run_command(
    mode: LaunchMode,
    command: &str,
    output: &Path,
) -> Result<ProcessExit, JobError> {
    // Truncate-create before launching: a rerun overwrites, never appends.
    let stdout = open_output(output)?;
    let stderr = stdout.try_clone().map_err(|source| JobError::OutputFile {
        path: output.to_path_buf(),
        source,
    })?;

    let mut cmd = build_command(mode, command)?;
    cmd.stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr))
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|source| JobError::Launch {
        command: command.to_string(),
        source,
    })?;

    debug!(pid = child.id(), cmd = %command, output = ?output, "process started");

    let status = child.wait().await.map_err(|source| JobError::Wait {
        command: command.to_string(),
        source,
    })?;

    let exit = ProcessExit::from(status);
    info!(
        cmd = %command,
        exit_code = exit.code(),
        success = exit.success(),
        "process exited"
    );
    Ok(exit)
}

fn open_output(path: &Path) -> Result<File, JobError> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|source| JobError::OutputFile {
            path: path.to_path_buf(),
            source,
        })
}

/// Build a command appropriate for the platform and launch mode.
fn build_command(mode: LaunchMode, command: &str) -> Result<Command, JobError> {
    match mode {
        LaunchMode::Shell => {
            let cmd = if cfg!(windows) {
                let mut c = Command::new("cmd");
                c.arg("/C").arg(command);
                c
            } else {
                let mut c = Command::new("sh");
                c.arg("-c").arg(command);
                c
            };
            Ok(cmd)
        }
        LaunchMode::Direct => {
            let words = shlex::split(command).ok_or_else(|| {
                JobError::InvalidCommand(format!("unbalanced quotes in `{command}`"))
            })?;
            let (program, args) = words
                .split_first()
                .ok_or_else(|| JobError::InvalidCommand("empty command".to_string()))?;
            let mut cmd = Command::new(program);
            cmd.args(args);
            Ok(cmd)
        }
    }
}
