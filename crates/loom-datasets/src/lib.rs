#![deny(missing_docs)]
//! Dataset catalog, artifact layout and per-dataset test fixtures.

pub mod fixtures;
mod locator;
mod registry;

pub use fixtures::{CleanupGuard, DatasetFiles, DatasetFixtures};
pub use locator::{is_dataset_name, ArtifactLocator, ArtifactRole, ArtifactSet};
pub use registry::{DatasetConfig, DatasetRegistry, MAX_TEST_FEATURES, MAX_TEST_ROWS};
