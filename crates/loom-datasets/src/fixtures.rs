//! Per-dataset test fixtures.
//!
//! [`DatasetFixtures::for_each_dataset`] runs a test body once for every
//! test-sized dataset, handing it the resolved artifact paths.
//! [`CleanupGuard`] removes scratch outputs of a failed test when the
//! `CLEANUP_ON_ERROR` flag is on.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use loom_core::errors::{ErrorInfo, LoomError};
use loom_core::LoomConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::locator::{ArtifactLocator, ArtifactRole, ArtifactSet};
use crate::registry::DatasetRegistry;

/// Everything a per-dataset test needs, passed by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetFiles {
    /// Dataset name.
    pub name: String,
    /// Resolved artifact paths, all present on disk.
    pub artifacts: ArtifactSet,
}

/// Registry plus locator, as used by the test suites.
#[derive(Debug, Clone)]
pub struct DatasetFixtures {
    registry: DatasetRegistry,
    locator: ArtifactLocator,
}

impl DatasetFixtures {
    /// Fixtures over an explicit registry and locator.
    pub fn new(registry: DatasetRegistry, locator: ArtifactLocator) -> Self {
        Self { registry, locator }
    }

    /// Uses the configured catalog (or the builtin one) and datasets root.
    pub fn from_config(config: &LoomConfig) -> Result<Self, LoomError> {
        let registry = match &config.catalog {
            Some(path) => DatasetRegistry::load(path)?,
            None => DatasetRegistry::builtin(),
        };
        Ok(Self::new(registry, ArtifactLocator::new(&config.datasets_root)))
    }

    /// Catalog in use.
    pub fn registry(&self) -> &DatasetRegistry {
        &self.registry
    }

    /// Artifact layout in use.
    pub fn locator(&self) -> &ArtifactLocator {
        &self.locator
    }

    /// Artifact roles of `name` whose files are absent.
    pub fn missing(&self, name: &str) -> Result<Vec<(ArtifactRole, PathBuf)>, LoomError> {
        let artifacts = self.locator.try_resolve(name)?;
        let missing = artifacts
            .iter()
            .filter(|(_, path)| !path.exists())
            .map(|(role, path)| (role, path.to_path_buf()))
            .collect();
        Ok(missing)
    }

    /// Resolves `name` and checks that every artifact exists.
    pub fn dataset_files(&self, name: &str) -> Result<DatasetFiles, LoomError> {
        let artifacts = self.locator.try_resolve(name)?;
        for (role, path) in artifacts.iter() {
            if !path.exists() {
                return Err(LoomError::Dataset(
                    ErrorInfo::new(
                        "loom.fixture_missing",
                        format!("missing {}, initialize the test datasets first", path.display()),
                    )
                    .with_context("dataset", name)
                    .with_context("role", role.as_str())
                    .with_context("path", path.display().to_string())
                    .with_hint(format!(
                        "run dataset init to populate {}",
                        self.locator.root().display()
                    )),
                ));
            }
        }
        Ok(DatasetFiles {
            name: name.to_string(),
            artifacts,
        })
    }

    /// Runs `test` once per eligible dataset in ascending name order.
    ///
    /// Stops at the first dataset with a missing artifact (before calling
    /// `test` for it) or at the first error returned by `test`. Returns the
    /// number of datasets exercised.
    pub fn for_each_dataset<F>(&self, mut test: F) -> Result<usize, LoomError>
    where
        F: FnMut(DatasetFiles) -> Result<(), LoomError>,
    {
        let mut count = 0;
        for name in self.registry.eligible() {
            let files = self.dataset_files(&name)?;
            debug!(dataset = %name, "running dataset test");
            test(files)?;
            count += 1;
        }
        Ok(count)
    }
}

/// Removes tracked scratch paths when dropped without [`CleanupGuard::disarm`]
/// and cleanup is enabled. With cleanup disabled the paths are left in place
/// and their location is logged.
#[derive(Debug)]
pub struct CleanupGuard {
    enabled: bool,
    paths: Vec<PathBuf>,
    armed: bool,
}

impl CleanupGuard {
    /// Guard that removes its paths on failure only when `enabled`.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            paths: Vec::new(),
            armed: true,
        }
    }

    /// Guard honouring the configured `CLEANUP_ON_ERROR` flag.
    pub fn from_config(config: &LoomConfig) -> Self {
        Self::new(config.cleanup_on_error)
    }

    /// Adds a file or directory to remove if the test fails.
    pub fn track(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.paths.push(path.into());
        self
    }

    /// Paths registered so far.
    pub fn tracked(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Marks the test as successful; nothing is removed.
    pub fn disarm(mut self) {
        self.armed = false;
    }

    /// Runs `body`, keeping its outputs on success.
    pub fn run<T, E>(self, body: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        let result = body();
        if result.is_ok() {
            self.disarm();
        }
        result
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        if !self.armed || self.paths.is_empty() {
            return;
        }
        if !self.enabled {
            for path in &self.paths {
                warn!(path = %path.display(), "test failed, leaving partial artifact in place");
            }
            return;
        }
        for path in &self.paths {
            if let Err(err) = remove_path(path) {
                warn!(path = %path.display(), error = %err, "failed to remove partial artifact");
            } else {
                debug!(path = %path.display(), "removed partial artifact");
            }
        }
    }
}

fn remove_path(path: &Path) -> io::Result<()> {
    let result = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    match result {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
