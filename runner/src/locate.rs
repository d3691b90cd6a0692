//! Locating the 7-Zip executable.
//!
//! Each [`ExecutableSource`] knows one way of finding the binary:
//!
//! - [`FixedExecutableSource`] — an explicit path.
//! - [`BundledExecutableSource`] — a copy shipped next to the program under
//!   `Source/<platform>/`.
//! - [`SystemExecutableSource`] — an installed 7-Zip on `PATH` or in a
//!   well-known location.
//! - [`PlatformExecutableSource`] — tries the three above in that order.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::config::RunnerConfig;
use crate::error::{Result, RunnerError};
use crate::process;

/// Something that can produce the path of a runnable 7-Zip binary.
pub trait ExecutableSource: Send + Sync {
    fn name(&self) -> &'static str;
    fn find_executable(&self) -> Result<PathBuf>;
}

/// Always returns the configured path, provided it exists.
#[derive(Debug, Clone)]
pub struct FixedExecutableSource {
    path: PathBuf,
}

impl FixedExecutableSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ExecutableSource for FixedExecutableSource {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn find_executable(&self) -> Result<PathBuf> {
        if self.path.is_file() {
            Ok(self.path.clone())
        } else {
            Err(RunnerError::ExecutableNotFound(format!(
                "{} does not exist",
                self.path.display()
            )))
        }
    }
}

/// Resolves the binary shipped under `<base_dir>/Source/`.
///
/// | OS      | Path                                  |
/// |---------|---------------------------------------|
/// | Linux   | `Source/Linux/7zz`                    |
/// | macOS   | `Source/osx/7zz`                      |
/// | Windows | `Source/Windows/{x86,x64,arm64}/7za.exe` |
#[derive(Debug, Clone)]
pub struct BundledExecutableSource {
    base_dir: Option<PathBuf>,
    os: String,
    arch: String,
}

impl Default for BundledExecutableSource {
    fn default() -> Self {
        Self::for_platform(std::env::consts::OS, std::env::consts::ARCH)
    }
}

impl BundledExecutableSource {
    /// Source for the running platform, rooted next to the current program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Source for an explicit OS/architecture pair, using the names from
    /// [`std::env::consts`].
    pub fn for_platform(os: &str, arch: &str) -> Self {
        Self {
            base_dir: None,
            os: os.to_string(),
            arch: arch.to_string(),
        }
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    /// Path of the bundled binary, whether or not it exists.
    pub fn expected_path(&self) -> Result<PathBuf> {
        let relative = bundled_relative_path(&self.os, &self.arch)?;
        let base = match &self.base_dir {
            Some(dir) => dir.clone(),
            None => program_dir()?,
        };
        Ok(base.join(relative))
    }
}

impl ExecutableSource for BundledExecutableSource {
    fn name(&self) -> &'static str {
        "bundled"
    }

    fn find_executable(&self) -> Result<PathBuf> {
        let path = self.expected_path()?;
        if path.is_file() {
            Ok(path)
        } else {
            Err(RunnerError::ExecutableNotFound(format!(
                "bundled executable not found at: {}",
                path.display()
            )))
        }
    }
}

/// Relative location of the bundled binary for `os`/`arch`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use sevenzip_runner::locate::bundled_relative_path;
///
/// assert_eq!(
///     bundled_relative_path("windows", "x86_64").unwrap(),
///     Path::new("Source").join("Windows").join("x64").join("7za.exe")
/// );
/// assert!(bundled_relative_path("freebsd", "x86_64").is_err());
/// ```
pub fn bundled_relative_path(os: &str, arch: &str) -> Result<PathBuf> {
    let source = Path::new("Source");
    match os {
        "linux" => Ok(source.join("Linux").join("7zz")),
        "macos" => Ok(source.join("osx").join("7zz")),
        "windows" => {
            let dir = match arch {
                "x86" => "x86",
                "x86_64" => "x64",
                "aarch64" => "arm64",
                _ => return Err(unsupported(os, arch)),
            };
            Ok(source.join("Windows").join(dir).join("7za.exe"))
        }
        _ => Err(unsupported(os, arch)),
    }
}

fn unsupported(os: &str, arch: &str) -> RunnerError {
    RunnerError::UnsupportedPlatform {
        os: os.to_string(),
        arch: arch.to_string(),
    }
}

fn program_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        RunnerError::ExecutableNotFound(format!(
            "unable to determine program directory from {}",
            exe.display()
        ))
    })
}

/// Names resolved through `PATH` and probed with `--help`.
const PATH_CANDIDATES: &[&str] = &["7z", "7za", "7zz"];

/// Install locations checked for existence only.
#[cfg(windows)]
const WELL_KNOWN_PATHS: &[&str] = &[
    r"C:\Program Files\7-Zip\7z.exe",
    r"C:\Program Files (x86)\7-Zip\7z.exe",
];
#[cfg(not(windows))]
const WELL_KNOWN_PATHS: &[&str] = &["/usr/bin/7z", "/usr/local/bin/7z", "/opt/homebrew/bin/7z"];

/// Finds an installed 7-Zip.
///
/// Candidates are tried in order. Absolute paths must exist; bare names must
/// start and exit within the probe timeout when run with `--help`.
#[derive(Debug, Clone)]
pub struct SystemExecutableSource {
    candidates: Vec<PathBuf>,
    probe_timeout: Duration,
}

impl Default for SystemExecutableSource {
    fn default() -> Self {
        let candidates = PATH_CANDIDATES
            .iter()
            .chain(WELL_KNOWN_PATHS)
            .map(PathBuf::from)
            .collect();
        Self {
            candidates,
            probe_timeout: RunnerConfig::default().probe_timeout(),
        }
    }
}

impl SystemExecutableSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_candidates(candidates: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    fn is_available(&self, candidate: &Path) -> bool {
        if candidate.is_absolute() {
            return candidate.is_file();
        }
        process::probe(candidate, &["--help"], self.probe_timeout)
    }
}

impl ExecutableSource for SystemExecutableSource {
    fn name(&self) -> &'static str {
        "system"
    }

    fn find_executable(&self) -> Result<PathBuf> {
        for candidate in &self.candidates {
            if self.is_available(candidate) {
                debug!(path = %candidate.display(), "Found installed 7-Zip");
                return Ok(candidate.clone());
            }
        }
        Err(RunnerError::ExecutableNotFound(
            "7-Zip executable not found. Please install 7-Zip or provide the path to the executable"
                .to_string(),
        ))
    }
}

/// Configured path first, then the bundled binary, then an installed one.
#[derive(Debug, Clone, Default)]
pub struct PlatformExecutableSource {
    config: RunnerConfig,
}

impl PlatformExecutableSource {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    fn bundled(&self) -> BundledExecutableSource {
        let source = BundledExecutableSource::new();
        match &self.config.bundle_dir {
            Some(dir) => source.with_base_dir(dir),
            None => source,
        }
    }
}

impl ExecutableSource for PlatformExecutableSource {
    fn name(&self) -> &'static str {
        "platform"
    }

    fn find_executable(&self) -> Result<PathBuf> {
        if let Some(path) = &self.config.executable {
            return FixedExecutableSource::new(path).find_executable();
        }

        match self.bundled().find_executable() {
            Ok(path) => return Ok(path),
            Err(e) => debug!(error = %e, "No bundled 7-Zip, trying installed copies"),
        }

        SystemExecutableSource::new()
            .with_probe_timeout(self.config.probe_timeout())
            .find_executable()
    }
}
