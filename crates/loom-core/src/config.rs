//! Runtime configuration loaded from an optional TOML file and the environment.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, LoomError};

/// Environment variable overriding [`LoomConfig::engine_root`].
pub const ENV_ROOT: &str = "LOOM_ROOT";
/// Environment variable overriding [`LoomConfig::datasets_root`].
pub const ENV_DATASETS: &str = "LOOM_DATASETS";
/// Integer flag; non-zero means partial artifacts are deleted after a failure.
pub const ENV_CLEANUP_ON_ERROR: &str = "CLEANUP_ON_ERROR";

/// Runtime configuration, read once at startup and passed down explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoomConfig {
    /// Directory containing `build/{release,debug}/src`.
    #[serde(default = "default_engine_root")]
    pub engine_root: PathBuf,
    /// Directory under which per-dataset artifacts live.
    #[serde(default = "default_datasets_root")]
    pub datasets_root: PathBuf,
    /// Optional YAML catalog replacing the builtin dataset registry.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    /// Whether fixtures remove partial artifacts after a failed test.
    #[serde(default = "default_cleanup_on_error")]
    pub cleanup_on_error: bool,
}

fn default_engine_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_datasets_root() -> PathBuf {
    PathBuf::from("data/datasets")
}

fn default_cleanup_on_error() -> bool {
    true
}

impl Default for LoomConfig {
    fn default() -> Self {
        Self {
            engine_root: default_engine_root(),
            datasets_root: default_datasets_root(),
            catalog: None,
            cleanup_on_error: default_cleanup_on_error(),
        }
    }
}

impl LoomConfig {
    /// Loads the optional TOML file and applies process environment overrides.
    pub fn load(file: Option<&Path>) -> Result<Self, LoomError> {
        Self::from_sources(file, |key| env::var(key).ok())
    }

    /// Same as [`LoomConfig::load`] with an injectable environment lookup.
    pub fn from_sources<F>(file: Option<&Path>, lookup: F) -> Result<Self, LoomError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(root) = lookup(ENV_ROOT) {
            config.engine_root = PathBuf::from(root);
        }
        if let Some(root) = lookup(ENV_DATASETS) {
            config.datasets_root = PathBuf::from(root);
        }
        if let Some(raw) = lookup(ENV_CLEANUP_ON_ERROR) {
            config.cleanup_on_error = parse_cleanup_flag(&raw)?;
        }
        Ok(config)
    }

    /// Parses a TOML configuration file.
    pub fn from_file(path: &Path) -> Result<Self, LoomError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            LoomError::Configuration(
                ErrorInfo::new("loom.config_read", format!("failed to read config: {err}"))
                    .with_context("path", path.display().to_string()),
            )
        })?;
        toml::from_str(&contents).map_err(|err| {
            LoomError::Serde(
                ErrorInfo::new("loom.config_parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }
}

/// `CLEANUP_ON_ERROR` is an integer; zero disables cleanup.
pub fn parse_cleanup_flag(raw: &str) -> Result<bool, LoomError> {
    raw.trim().parse::<i64>().map(|value| value != 0).map_err(|_| {
        LoomError::Configuration(
            ErrorInfo::new("loom.cleanup_flag", "CLEANUP_ON_ERROR must be an integer")
                .with_context("value", raw),
        )
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn cleanup_defaults_on() {
        let config = LoomConfig::from_sources(None, lookup(&[])).unwrap();
        assert!(config.cleanup_on_error);
        assert_eq!(config.datasets_root, PathBuf::from("data/datasets"));
    }

    #[test]
    fn cleanup_flag_is_integer() {
        assert!(!parse_cleanup_flag("0").unwrap());
        assert!(parse_cleanup_flag("1").unwrap());
        assert!(parse_cleanup_flag(" 2 ").unwrap());
        assert!(parse_cleanup_flag("-1").unwrap());
        let err = parse_cleanup_flag("yes").unwrap_err();
        assert_eq!(err.info().code, "loom.cleanup_flag");
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loom.toml");
        fs::write(
            &path,
            "engine_root = \"/opt/loom\"\ncleanup_on_error = false\n",
        )
        .unwrap();
        let config = LoomConfig::from_sources(
            Some(&path),
            lookup(&[(ENV_DATASETS, "/tmp/ds"), (ENV_CLEANUP_ON_ERROR, "1")]),
        )
        .unwrap();
        assert_eq!(config.engine_root, PathBuf::from("/opt/loom"));
        assert_eq!(config.datasets_root, PathBuf::from("/tmp/ds"));
        assert!(config.cleanup_on_error);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loom.toml");
        fs::write(&path, "engine_rot = \"/opt\"\n").unwrap();
        let err = LoomConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, LoomError::Serde(_)));
    }
}
