// src/errors.rs

//! Crate-wide error types.
//!
//! Two layers:
//! - [`GridrunError`] aborts the whole batch (bad configuration, unreadable
//!   config file, ...). Nothing has been launched when one of these surfaces.
//! - [`JobError`] is scoped to a single job and is stored inside its
//!   `JobResult`; the rest of the batch keeps running.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridrunError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GridrunError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        GridrunError::ConfigError(msg.into())
    }
}

/// Failure of a single job, isolated from its siblings.
#[derive(Error, Debug)]
pub enum JobError {
    /// The output file could not be created or truncated.
    #[error("cannot open output file {path:?}: {source}")]
    OutputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The process could not be started (missing binary, permissions, ...).
    #[error("failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command string could not be split into program + arguments.
    #[error("cannot split command into arguments: {0}")]
    InvalidCommand(String),

    /// The process started but waiting for it failed.
    #[error("failed waiting for `{command}`: {source}")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The launcher panicked or was cancelled while running the job.
    #[error("launch of `{command}` did not complete: {reason}")]
    Crashed { command: String, reason: String },
}

impl JobError {
    /// Whether the process never started.
    pub fn is_launch_error(&self) -> bool {
        matches!(self, JobError::Launch { .. } | JobError::InvalidCommand(_))
    }

    /// Whether the output file was the problem.
    pub fn is_output_error(&self) -> bool {
        matches!(self, JobError::OutputFile { .. })
    }
}

pub type Result<T> = std::result::Result<T, GridrunError>;
