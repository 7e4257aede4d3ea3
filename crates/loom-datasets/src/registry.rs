use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use loom_core::errors::{ErrorInfo, LoomError};
use serde::{Deserialize, Serialize};

use crate::locator::is_dataset_name;

/// Largest row count a dataset may have to take part in automated tests.
pub const MAX_TEST_ROWS: usize = 100;
/// Largest feature count a dataset may have to take part in automated tests.
pub const MAX_TEST_FEATURES: usize = 100;

/// Scale attributes of a known dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Unique name, also the dataset's directory under the datasets root.
    pub name: String,
    /// Number of rows.
    pub row_count: usize,
    /// Number of features (columns).
    pub feature_count: usize,
    /// Fraction of observed cells, when the generator records it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density: Option<f64>,
    /// Generator seed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl DatasetConfig {
    /// Config with no optional attributes.
    pub fn new(name: impl Into<String>, row_count: usize, feature_count: usize) -> Self {
        Self {
            name: name.into(),
            row_count,
            feature_count,
            density: None,
            seed: None,
        }
    }

    /// Small enough to run in the regression suite.
    pub fn is_test_sized(&self) -> bool {
        self.row_count <= MAX_TEST_ROWS && self.feature_count <= MAX_TEST_FEATURES
    }
}

// (feature family, feature count, row count); names follow `{family}-{features}-{rows}`.
const BUILTIN: &[(&str, usize, usize)] = &[
    ("dd", 10, 10),
    ("dd", 10, 100),
    ("dd", 100, 1000),
    ("dpd", 10, 10),
    ("dpd", 100, 100),
    ("gp", 10, 100),
    ("gp", 1000, 100),
    ("nich", 10, 10),
    ("nich", 100, 1000),
    ("mixed", 10, 10),
    ("mixed", 100, 100),
    ("mixed", 1000, 10000),
];

/// Catalog of known datasets keyed by name.
///
/// Traversal is always ascending by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetRegistry {
    configs: BTreeMap<String, DatasetConfig>,
}

impl DatasetRegistry {
    /// Builds a registry, rejecting duplicate names and names that are not a
    /// single path component.
    pub fn new(configs: impl IntoIterator<Item = DatasetConfig>) -> Result<Self, LoomError> {
        let mut map = BTreeMap::new();
        for config in configs {
            if !is_dataset_name(&config.name) {
                return Err(LoomError::Dataset(
                    ErrorInfo::new(
                        "loom.catalog_name",
                        "dataset name must be a single path component",
                    )
                    .with_context("name", config.name.clone()),
                ));
            }
            if map.contains_key(&config.name) {
                return Err(LoomError::Dataset(
                    ErrorInfo::new("loom.catalog_duplicate", "dataset listed twice")
                        .with_context("name", config.name.clone()),
                ));
            }
            map.insert(config.name.clone(), config);
        }
        Ok(Self { configs: map })
    }

    /// Catalog shipped with the runner.
    pub fn builtin() -> Self {
        let configs = BUILTIN
            .iter()
            .map(|&(family, features, rows)| {
                let mut config =
                    DatasetConfig::new(format!("{family}-{features}-{rows}"), rows, features);
                config.density = Some(0.5);
                config.seed = Some(0);
                (config.name.clone(), config)
            })
            .collect();
        Self { configs }
    }

    /// Parses a YAML list of dataset configs.
    pub fn from_yaml_str(text: &str) -> Result<Self, LoomError> {
        let configs: Vec<DatasetConfig> = serde_yaml::from_str(text).map_err(|err| {
            LoomError::Serde(ErrorInfo::new("loom.catalog_parse", err.to_string()))
        })?;
        Self::new(configs)
    }

    /// Reads a YAML catalog from disk.
    pub fn load(path: &Path) -> Result<Self, LoomError> {
        let text = fs::read_to_string(path).map_err(|err| {
            LoomError::Dataset(
                ErrorInfo::new("loom.catalog_read", format!("failed to read catalog: {err}"))
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Self::from_yaml_str(&text).map_err(|err| match err {
            LoomError::Serde(info) => {
                LoomError::Serde(info.with_context("path", path.display().to_string()))
            }
            other => other,
        })
    }

    /// Names of datasets small enough for automated testing, ascending.
    ///
    /// Recomputed on every call.
    pub fn eligible(&self) -> BTreeSet<String> {
        self.configs
            .values()
            .filter(|config| config.is_test_sized())
            .map(|config| config.name.clone())
            .collect()
    }

    /// Config named `name`.
    pub fn get(&self, name: &str) -> Option<&DatasetConfig> {
        self.configs.get(name)
    }

    /// All configs, ascending by name.
    pub fn iter(&self) -> impl Iterator<Item = &DatasetConfig> {
        self.configs.values()
    }

    /// Number of datasets.
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// True when the catalog lists no datasets.
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}
