// ============================================================================
// vidjoin-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error Types for the Concatenation Pipeline
//
// This module defines the error type shared by every stage of the pipeline.
// Only one failure is modeled as a precondition (too few inputs); everything
// else is a failure of the external probe/encode tools and is carried through
// unrecovered.
//
// KEY COMPONENTS:
// - CoreError: the error enum returned by all fallible operations
// - CoreResult: result alias used throughout the crate
// - Helper constructors for command start/failure/wait errors

use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors produced by the vidjoin core library.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Fewer than two input files were supplied.
    #[error("At least two video files are required for concatenation (got {count})")]
    InsufficientInput { count: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Required dependency '{0}' not found in PATH")]
    DependencyNotFound(String),

    #[error("Failed to start '{0}': {1}")]
    CommandStart(String, io::Error),

    #[error("Failed waiting for '{0}': {1}")]
    CommandWait(String, io::Error),

    #[error("'{cmd}' exited with {status}: {stderr}")]
    CommandFailed {
        cmd: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Failed to parse ffprobe output: {0}")]
    FfprobeParse(String),

    #[error("Video information error: {0}")]
    VideoInfoError(String),

    #[error("No streams found in '{0}'")]
    NoStreamsFound(String),

    #[error("JSON error: {0}")]
    JsonParseError(String),
}

/// Result type for vidjoin core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Builds a [`CoreError::CommandStart`] for a command that could not be spawned.
pub fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

/// Builds a [`CoreError::CommandWait`] for a command whose exit could not be awaited.
pub fn command_wait_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}

/// Builds a [`CoreError::CommandFailed`] for a command that exited unsuccessfully.
pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        cmd: cmd.into(),
        status,
        stderr: stderr.into(),
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::JsonParseError(err.to_string())
    }
}
