//! Runner configuration.
//!
//! # Example YAML
//!
//! ```yaml
//! executable: /opt/7zip/7zz
//! bundle_dir: /opt/app
//! timeout_ms: 600000
//! probe_timeout_ms: 1000
//! overwrite_existing: true
//! listing_strategy: fixed_width
//! ```
//!
//! Every field is optional.

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sevenzip_core::EntryStrategyKind;

use crate::error::Result;

const DEFAULT_PROBE_TIMEOUT_MS: u64 = 1000;

/// Settings shared by executable discovery and archive operations.
///
/// # Examples
///
/// ```
/// use sevenzip_runner::RunnerConfig;
///
/// let config: RunnerConfig = serde_yaml::from_str("timeout_ms: 5000").unwrap();
/// assert_eq!(config.timeout_ms, Some(5000));
/// assert_eq!(config.probe_timeout_ms, 1000);
/// assert!(config.overwrite_existing);
/// assert!(config.executable.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Explicit path to the 7-Zip executable. Skips discovery when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable: Option<PathBuf>,
    /// Directory holding the bundled `Source/` layout. Defaults to the
    /// directory of the running program.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle_dir: Option<PathBuf>,
    /// Overall limit for one 7-Zip invocation. `None` waits indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Limit for each `--help` probe during discovery.
    pub probe_timeout_ms: u64,
    /// Delete an existing archive file before creating it again.
    pub overwrite_existing: bool,
    /// Row parser used for `l` output.
    pub listing_strategy: EntryStrategyKind,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            executable: None,
            bundle_dir: None,
            timeout_ms: None,
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
            overwrite_existing: true,
            listing_strategy: EntryStrategyKind::default(),
        }
    }
}

impl RunnerConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::RunnerError::Io) if the file cannot be read, or
    /// [`Yaml`](crate::RunnerError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
executable: /opt/7zip/7zz
bundle_dir: /opt/app
timeout_ms: 600000
probe_timeout_ms: 250
overwrite_existing: false
listing_strategy: pattern
"#
    }

    #[test]
    fn test_parse_full_config() {
        let config: RunnerConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(config.executable, Some(PathBuf::from("/opt/7zip/7zz")));
        assert_eq!(config.bundle_dir, Some(PathBuf::from("/opt/app")));
        assert_eq!(config.timeout(), Some(Duration::from_secs(600)));
        assert_eq!(config.probe_timeout(), Duration::from_millis(250));
        assert!(!config.overwrite_existing);
        assert_eq!(config.listing_strategy, EntryStrategyKind::Pattern);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: RunnerConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, RunnerConfig::default());
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        assert!(serde_yaml::from_str::<RunnerConfig>("listing_strategy: guess").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runner.yml");

        let config: RunnerConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        config.save(&path).unwrap();

        let loaded = RunnerConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = RunnerConfig::load("/definitely/not/here.yml").unwrap_err();
        assert!(matches!(err, crate::RunnerError::Io(_)));
    }
}
