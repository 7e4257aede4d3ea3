use std::fmt::{self, Display};
use std::path::{Path, PathBuf};

use loom_core::errors::{ErrorInfo, LoomError};
use serde::{Deserialize, Serialize};

/// Logical role of a per-dataset artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactRole {
    /// Generator configuration the dataset was created from.
    Init,
    /// Encoded rows.
    Rows,
    /// Serialized model.
    Model,
    /// Group-assignment state directory.
    Groups,
    /// Raw rows as CSV files.
    RowsCsv,
    /// Column schema.
    Schema,
    /// Value encoding.
    Encoding,
}

impl ArtifactRole {
    /// Every role, in the order [`ArtifactSet::iter`] yields them.
    pub const ALL: [ArtifactRole; 7] = [
        ArtifactRole::Init,
        ArtifactRole::Rows,
        ArtifactRole::Model,
        ArtifactRole::Groups,
        ArtifactRole::RowsCsv,
        ArtifactRole::Schema,
        ArtifactRole::Encoding,
    ];

    /// Stable lowercase name, as used in reports.
    pub const fn as_str(self) -> &'static str {
        match self {
            ArtifactRole::Init => "init",
            ArtifactRole::Rows => "rows",
            ArtifactRole::Model => "model",
            ArtifactRole::Groups => "groups",
            ArtifactRole::RowsCsv => "rows_csv",
            ArtifactRole::Schema => "schema",
            ArtifactRole::Encoding => "encoding",
        }
    }

    /// Template relative to the datasets root; `{name}` is the dataset name.
    pub const fn template(self) -> &'static str {
        match self {
            ArtifactRole::Init => "{name}/init.pb.gz",
            ArtifactRole::Rows => "{name}/rows.pbs.gz",
            ArtifactRole::Model => "{name}/model.pb.gz",
            ArtifactRole::Groups => "{name}/groups",
            ArtifactRole::RowsCsv => "{name}/rows_csv",
            ArtifactRole::Schema => "{name}/schema.json",
            ArtifactRole::Encoding => "{name}/encoding.json.gz",
        }
    }
}

impl Display for ArtifactRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical paths of every artifact belonging to one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSet {
    /// `{name}/init.pb.gz`
    pub init: PathBuf,
    /// `{name}/rows.pbs.gz`
    pub rows: PathBuf,
    /// `{name}/model.pb.gz`
    pub model: PathBuf,
    /// `{name}/groups`
    pub groups: PathBuf,
    /// `{name}/rows_csv`
    pub rows_csv: PathBuf,
    /// `{name}/schema.json`
    pub schema: PathBuf,
    /// `{name}/encoding.json.gz`
    pub encoding: PathBuf,
}

impl ArtifactSet {
    /// Path for `role`.
    pub fn get(&self, role: ArtifactRole) -> &Path {
        match role {
            ArtifactRole::Init => &self.init,
            ArtifactRole::Rows => &self.rows,
            ArtifactRole::Model => &self.model,
            ArtifactRole::Groups => &self.groups,
            ArtifactRole::RowsCsv => &self.rows_csv,
            ArtifactRole::Schema => &self.schema,
            ArtifactRole::Encoding => &self.encoding,
        }
    }

    /// Role/path pairs in [`ArtifactRole::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (ArtifactRole, &Path)> + '_ {
        ArtifactRole::ALL.into_iter().map(move |role| (role, self.get(role)))
    }
}

/// Resolves dataset names to artifact paths under a fixed root.
///
/// Resolution is pure string substitution and never touches the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLocator {
    root: PathBuf,
}

impl ArtifactLocator {
    /// Locator for datasets stored under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Datasets root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of one artifact of `name`.
    pub fn path(&self, role: ArtifactRole, name: &str) -> PathBuf {
        self.root.join(role.template().replace("{name}", name))
    }

    /// Paths of every artifact of `name`.
    ///
    /// Distinct names give distinct sets as long as each is a valid dataset
    /// name (see [`is_dataset_name`]); catalog entries always are.
    pub fn resolve(&self, name: &str) -> ArtifactSet {
        ArtifactSet {
            init: self.path(ArtifactRole::Init, name),
            rows: self.path(ArtifactRole::Rows, name),
            model: self.path(ArtifactRole::Model, name),
            groups: self.path(ArtifactRole::Groups, name),
            rows_csv: self.path(ArtifactRole::RowsCsv, name),
            schema: self.path(ArtifactRole::Schema, name),
            encoding: self.path(ArtifactRole::Encoding, name),
        }
    }

    /// [`ArtifactLocator::resolve`] for names coming from outside the
    /// catalog: rejects names that are not a single path component.
    pub fn try_resolve(&self, name: &str) -> Result<ArtifactSet, LoomError> {
        if !is_dataset_name(name) {
            return Err(LoomError::Dataset(
                ErrorInfo::new("loom.dataset_name", "dataset name is not a single path component")
                    .with_context("name", name),
            ));
        }
        Ok(self.resolve(name))
    }
}

/// A dataset name must be exactly one normal path component, so that it
/// maps to its own directory and no other name maps to the same one.
pub fn is_dataset_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

impl Default for ArtifactLocator {
    fn default() -> Self {
        Self::new("data/datasets")
    }
}
