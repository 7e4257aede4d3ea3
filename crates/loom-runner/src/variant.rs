use std::fmt::{self, Display};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use loom_core::errors::{ErrorInfo, LoomError};
use serde::{Deserialize, Serialize};

/// Compiled configuration of the engine to invoke.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildVariant {
    /// Optimized build.
    #[default]
    Release,
    /// Diagnostic build with assertions enabled.
    Debug,
}

impl BuildVariant {
    /// `--debug` on the command line selects the diagnostic build.
    pub fn from_debug_flag(debug: bool) -> Self {
        if debug {
            BuildVariant::Debug
        } else {
            BuildVariant::Release
        }
    }

    /// Build directory name.
    pub const fn as_str(self) -> &'static str {
        match self {
            BuildVariant::Release => "release",
            BuildVariant::Debug => "debug",
        }
    }
}

impl Display for BuildVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildVariant {
    type Err = LoomError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "release" => Ok(BuildVariant::Release),
            "debug" => Ok(BuildVariant::Debug),
            other => Err(LoomError::Configuration(
                ErrorInfo::new("loom.build_variant", "unknown build variant")
                    .with_context("value", other)
                    .with_hint("expected `release` or `debug`"),
            )),
        }
    }
}

/// Location of the engine executables: `{root}/build/{variant}/src/{binary}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinLayout {
    root: PathBuf,
}

impl BinLayout {
    /// Layout rooted at the engine checkout.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Engine checkout root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the executables of one build variant.
    pub fn bin_dir(&self, variant: BuildVariant) -> PathBuf {
        self.root.join("build").join(variant.as_str()).join("src")
    }

    /// Full path of `binary` for `variant`.
    pub fn executable(&self, variant: BuildVariant, binary: &str) -> PathBuf {
        self.bin_dir(variant).join(binary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn executables_live_under_build_dir() {
        let layout = BinLayout::new("/opt/loom");
        assert_eq!(
            layout.executable(BuildVariant::Release, "infer"),
            PathBuf::from("/opt/loom/build/release/src/infer")
        );
        assert_eq!(
            layout.executable(BuildVariant::from_debug_flag(true), "predict"),
            PathBuf::from("/opt/loom/build/debug/src/predict")
        );
    }

    #[test]
    fn unknown_variant_is_a_configuration_error() {
        assert_eq!("debug".parse::<BuildVariant>().unwrap(), BuildVariant::Debug);
        let err = "profile".parse::<BuildVariant>().unwrap_err();
        assert!(matches!(err, LoomError::Configuration(_)));
        assert_eq!(err.info().code, "loom.build_variant");
    }
}
