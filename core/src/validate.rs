//! Sanity checks on captured 7-Zip output.
//!
//! 7-Zip sometimes exits with status 0 while printing an error to stdout, so
//! successful invocations are screened before their output is parsed.
//!
//! # Examples
//!
//! ```
//! use sevenzip_core::{OutputError, validate_output};
//!
//! assert!(validate_output("Everything is Ok", "").is_ok());
//! assert_eq!(validate_output("   ", ""), Err(OutputError::NoOutput));
//! assert_eq!(
//!     validate_output("Error: Wrong password", ""),
//!     Err(OutputError::WrongPassword)
//! );
//! ```

use thiserror::Error;

/// Problems detected in otherwise successful 7-Zip output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutputError {
    /// stderr carried an `ERROR` or `FATAL` marker.
    #[error("7-Zip reported errors: {0}")]
    ToolReported(String),
    #[error("7-Zip produced no output, which may indicate a failure")]
    NoOutput,
    #[error("7-Zip could not open the archive file")]
    CannotOpenArchive,
    #[error("archive requires a password or the provided password is incorrect")]
    WrongPassword,
    #[error("archive format or compression method is not supported")]
    Unsupported,
    #[error("archive data is corrupted")]
    DataCorrupted,
    #[error("Insufficient disk space to complete the operation")]
    InsufficientSpace,
}

/// Markers looked up in lower-cased stdout, in priority order.
const STDOUT_MARKERS: &[(&[&str], OutputError)] = &[
    (&["unsupported method", "unsupported archive"], OutputError::Unsupported),
    (&["crc failed", "data error"], OutputError::DataCorrupted),
    (&["disk full", "not enough space"], OutputError::InsufficientSpace),
];

/// Checks stdout and stderr of a successful invocation.
pub fn validate_output(stdout: &str, stderr: &str) -> Result<(), OutputError> {
    if stderr.contains("ERROR") || stderr.contains("FATAL") {
        return Err(OutputError::ToolReported(stderr.to_string()));
    }

    if stdout.trim().is_empty() {
        return Err(OutputError::NoOutput);
    }

    let lower = stdout.to_lowercase();

    if lower.contains("error") && lower.contains("can not open") {
        return Err(OutputError::CannotOpenArchive);
    }
    if lower.contains("wrong password") {
        return Err(OutputError::WrongPassword);
    }

    for (needles, error) in STDOUT_MARKERS {
        if needles.iter().any(|needle| lower.contains(needle)) {
            return Err(error.clone());
        }
    }

    Ok(())
}
