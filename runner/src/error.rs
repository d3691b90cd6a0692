//! Error types for 7-Zip invocations.
//!
//! One enum covers argument validation, executable discovery, process
//! execution and output screening.

use std::path::PathBuf;

use sevenzip_core::OutputError;
use thiserror::Error;

/// Errors that can occur while locating or running 7-Zip.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// A required argument was empty.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("archive file not found: {}", .0.display())]
    ArchiveNotFound(PathBuf),

    #[error("source folder not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// No usable 7-Zip executable was found.
    #[error("7-Zip executable not found: {0}")]
    ExecutableNotFound(String),

    /// No bundled executable exists for this OS/architecture pair.
    #[error("unsupported platform: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("failed to spawn {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The process ran past the configured timeout and was killed.
    #[error("7-Zip timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// The operation was cancelled and the process was killed.
    #[error("7-Zip operation was cancelled")]
    Cancelled,

    /// 7-Zip exited with a non-zero status.
    #[error(
        "7-Zip command failed with exit code {}. Error: {stderr}. Output: {stdout}",
        display_code(.code)
    )]
    ExitStatus {
        code: Option<i32>,
        stderr: String,
        stdout: String,
    },

    /// 7-Zip exited successfully but its output reports a problem.
    #[error(transparent)]
    Output(#[from] OutputError),
}

fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}

/// Convenience alias for results with [`RunnerError`].
pub type Result<T> = std::result::Result<T, RunnerError>;
