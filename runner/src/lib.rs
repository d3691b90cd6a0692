//! Drive the 7-Zip executable from Rust.
//!
//! This crate locates a 7-Zip binary, runs it as a subprocess and turns its
//! output into [`sevenzip_core`] values. No archive format is implemented
//! here; all archive work is done by 7-Zip itself.
//!
//! - [`locate`] — [`ExecutableSource`] implementations (explicit path,
//!   bundled copy, installed copy, and a platform default chaining them).
//! - [`process`] — subprocess execution with timeout and
//!   [`CancellationToken`] support.
//! - [`archive`] — [`SevenZipArchive`]: list, extract and create.
//! - [`config`] — YAML-backed [`RunnerConfig`].
//! - [`output`] — JSON / YAML / Markdown / table rendering of listings.
//!
//! # Example
//!
//! ```no_run
//! use sevenzip_runner::{FixedExecutableSource, RunnerConfig, SevenZipArchive};
//! use sevenzip_core::CompressionLevel;
//!
//! let source = FixedExecutableSource::new("/usr/bin/7zz");
//! let archive = SevenZipArchive::new(&source, RunnerConfig::default())?;
//!
//! archive.create_archive_with_level("out/site.7z", "public", CompressionLevel::Maximum)?;
//! let listing = archive.list_archive("out/site.7z")?;
//! assert!(listing.total_files > 0);
//! archive.extract_to_directory("out/site.7z", "restore")?;
//! # Ok::<(), sevenzip_runner::RunnerError>(())
//! ```

pub mod archive;
pub mod config;
pub mod error;
pub mod locate;
pub mod output;
pub mod process;

pub use archive::SevenZipArchive;
pub use config::RunnerConfig;
pub use error::{Result, RunnerError};
pub use locate::{
    BundledExecutableSource, ExecutableSource, FixedExecutableSource, PlatformExecutableSource,
    SystemExecutableSource,
};
pub use output::{ArchiveReport, OutputFormat, format_listing, format_reports};
pub use process::{CancellationToken, ProcessOutput};
