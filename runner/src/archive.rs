//! Archive operations backed by the 7-Zip executable.
//!
//! # Example
//!
//! ```no_run
//! use sevenzip_runner::{PlatformExecutableSource, RunnerConfig, SevenZipArchive};
//!
//! let config = RunnerConfig::default();
//! let source = PlatformExecutableSource::new(config.clone());
//! let archive = SevenZipArchive::new(&source, config).unwrap();
//!
//! let listing = archive.list_archive("backup.7z").unwrap();
//! println!("{} files, {} bytes", listing.total_files, listing.total_size);
//! ```

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use sevenzip_core::{ArchiveListing, CompressionLevel, ListingParser, validate_output};
use tracing::{debug, info};

use crate::config::RunnerConfig;
use crate::error::{Result, RunnerError};
use crate::locate::ExecutableSource;
use crate::process::{self, CancellationToken};

/// Handle bound to one resolved 7-Zip executable.
///
/// The executable is located once, when the handle is built. Every
/// operation validates its arguments before anything is spawned.
#[derive(Debug, Clone)]
pub struct SevenZipArchive {
    executable: PathBuf,
    config: RunnerConfig,
}

impl SevenZipArchive {
    /// Resolves the executable through `source`.
    pub fn new(source: &dyn ExecutableSource, config: RunnerConfig) -> Result<Self> {
        let executable = source.find_executable()?;
        debug!(source = source.name(), path = %executable.display(), "Resolved 7-Zip executable");
        Ok(Self { executable, config })
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Lists the contents of `archive` (`7z l <archive>`).
    pub fn list_archive(&self, archive: impl AsRef<Path>) -> Result<ArchiveListing> {
        self.list_archive_cancellable(archive, &CancellationToken::new())
    }

    pub fn list_archive_cancellable(
        &self,
        archive: impl AsRef<Path>,
        cancel: &CancellationToken,
    ) -> Result<ArchiveListing> {
        let archive = archive.as_ref();
        require_non_empty(archive, "archive file path")?;
        require_archive(archive)?;

        let stdout = self.execute(list_args(archive), cancel)?;
        let (listing, diagnostics) =
            ListingParser::new(self.config.listing_strategy).parse_with_diagnostics(&stdout);

        debug!(
            archive = %archive.display(),
            strategy = diagnostics.strategy,
            tables = diagnostics.tables,
            candidates = diagnostics.candidate_lines,
            rejected = diagnostics.rejected_lines.len(),
            "Parsed listing"
        );
        Ok(listing)
    }

    /// Extracts `archive` into `destination`, creating it if needed
    /// (`7z x <archive> -o<destination> -y`).
    pub fn extract_to_directory(
        &self,
        archive: impl AsRef<Path>,
        destination: impl AsRef<Path>,
    ) -> Result<()> {
        self.extract_to_directory_cancellable(archive, destination, &CancellationToken::new())
    }

    pub fn extract_to_directory_cancellable(
        &self,
        archive: impl AsRef<Path>,
        destination: impl AsRef<Path>,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let archive = archive.as_ref();
        let destination = destination.as_ref();
        require_non_empty(archive, "archive file path")?;
        require_non_empty(destination, "destination directory")?;
        require_archive(archive)?;

        fs::create_dir_all(destination)?;
        self.execute(extract_args(archive, destination), cancel)?;

        info!(
            archive = %archive.display(),
            destination = %destination.display(),
            "Extracted archive"
        );
        Ok(())
    }

    /// Creates `archive` from the contents of `folder` at
    /// [`CompressionLevel::Normal`].
    pub fn create_archive(&self, archive: impl AsRef<Path>, folder: impl AsRef<Path>) -> Result<()> {
        self.create_archive_with_level(archive, folder, CompressionLevel::default())
    }

    /// Creates `archive` from the contents of `folder`
    /// (`7z a <archive> <folder>/* -r -mx<N>`).
    ///
    /// The parent directory of `archive` is created, and an existing archive
    /// is deleted first unless
    /// [`overwrite_existing`](RunnerConfig::overwrite_existing) is off.
    pub fn create_archive_with_level(
        &self,
        archive: impl AsRef<Path>,
        folder: impl AsRef<Path>,
        level: CompressionLevel,
    ) -> Result<()> {
        self.create_archive_cancellable(archive, folder, level, &CancellationToken::new())
    }

    pub fn create_archive_cancellable(
        &self,
        archive: impl AsRef<Path>,
        folder: impl AsRef<Path>,
        level: CompressionLevel,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let archive = archive.as_ref();
        let folder = folder.as_ref();
        require_non_empty(archive, "archive file path")?;
        require_non_empty(folder, "folder path")?;
        if !folder.is_dir() {
            return Err(RunnerError::DirectoryNotFound(folder.to_path_buf()));
        }

        if let Some(parent) = archive.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        if self.config.overwrite_existing && archive.is_file() {
            debug!(archive = %archive.display(), "Removing existing archive");
            fs::remove_file(archive)?;
        }

        self.execute(create_args(archive, folder, level), cancel)?;

        info!(
            archive = %archive.display(),
            folder = %folder.display(),
            level = %level,
            "Created archive"
        );
        Ok(())
    }

    fn execute(&self, args: Vec<OsString>, cancel: &CancellationToken) -> Result<String> {
        let output = process::run(&self.executable, &args, self.config.timeout(), cancel)?;

        if !output.success {
            return Err(RunnerError::ExitStatus {
                code: output.code,
                stderr: output.stderr,
                stdout: output.stdout,
            });
        }

        validate_output(&output.stdout, &output.stderr)?;
        Ok(output.stdout)
    }
}

fn require_non_empty(path: &Path, what: &str) -> Result<()> {
    let blank = path.to_str().is_some_and(|s| s.trim().is_empty());
    if blank {
        return Err(RunnerError::InvalidArgument(format!(
            "{what} cannot be empty"
        )));
    }
    Ok(())
}

fn require_archive(archive: &Path) -> Result<()> {
    if archive.is_file() {
        Ok(())
    } else {
        Err(RunnerError::ArchiveNotFound(archive.to_path_buf()))
    }
}

pub(crate) fn list_args(archive: &Path) -> Vec<OsString> {
    vec![OsString::from("l"), archive.as_os_str().to_owned()]
}

pub(crate) fn extract_args(archive: &Path, destination: &Path) -> Vec<OsString> {
    let mut output_switch = OsString::from("-o");
    output_switch.push(destination.as_os_str());
    vec![
        OsString::from("x"),
        archive.as_os_str().to_owned(),
        output_switch,
        OsString::from("-y"),
    ]
}

pub(crate) fn create_args(archive: &Path, folder: &Path, level: CompressionLevel) -> Vec<OsString> {
    vec![
        OsString::from("a"),
        archive.as_os_str().to_owned(),
        folder.join("*").into_os_string(),
        OsString::from("-r"),
        OsString::from(level.as_switch()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locate::FixedExecutableSource;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    fn handle() -> (tempfile::NamedTempFile, SevenZipArchive) {
        let exe = tempfile::NamedTempFile::new().unwrap();
        let archive =
            SevenZipArchive::new(&FixedExecutableSource::new(exe.path()), RunnerConfig::default())
                .unwrap();
        (exe, archive)
    }

    #[test]
    fn test_list_args() {
        assert_eq!(
            strings(list_args(Path::new("my archive.7z"))),
            vec!["l", "my archive.7z"]
        );
    }

    #[test]
    fn test_extract_args() {
        assert_eq!(
            strings(extract_args(Path::new("in.zip"), Path::new("out dir"))),
            vec!["x", "in.zip", "-oout dir", "-y"]
        );
    }

    #[test]
    fn test_create_args() {
        let args = strings(create_args(
            Path::new("out.7z"),
            Path::new("src"),
            CompressionLevel::Ultra,
        ));
        let pattern = Path::new("src").join("*").to_string_lossy().into_owned();
        assert_eq!(args, vec!["a".to_string(), "out.7z".into(), pattern, "-r".into(), "-mx9".into()]);
    }

    #[test]
    fn test_new_fails_without_executable() {
        let err = SevenZipArchive::new(
            &FixedExecutableSource::new("/nonexistent/7zz"),
            RunnerConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, RunnerError::ExecutableNotFound(_)));
    }

    #[test]
    fn test_empty_arguments_are_rejected() {
        let (_exe, archive) = handle();
        assert!(matches!(
            archive.list_archive(""),
            Err(RunnerError::InvalidArgument(_))
        ));
        assert!(matches!(
            archive.extract_to_directory("a.zip", "  "),
            Err(RunnerError::InvalidArgument(_))
        ));
        assert!(matches!(
            archive.create_archive("", "src"),
            Err(RunnerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_missing_inputs_are_rejected_before_spawn() {
        let (_exe, archive) = handle();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.zip");

        assert!(matches!(
            archive.list_archive(&missing),
            Err(RunnerError::ArchiveNotFound(ref p)) if p == &missing
        ));

        let out = dir.path().join("out");
        assert!(matches!(
            archive.extract_to_directory(&missing, &out),
            Err(RunnerError::ArchiveNotFound(_))
        ));
        assert!(!out.exists());

        assert!(matches!(
            archive.create_archive(dir.path().join("new.7z"), dir.path().join("nope")),
            Err(RunnerError::DirectoryNotFound(_))
        ));
    }
}
