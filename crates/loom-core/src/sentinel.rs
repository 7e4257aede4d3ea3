//! Sentinel tokens and the path-or-token arguments handed to the engine.

use std::ffi::OsString;
use std::fmt::{self, Display};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Reserved tokens that stand in for a filesystem path on the engine's
/// command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sentinel {
    /// `--none`: the argument is intentionally absent.
    None,
    /// `-`: read from stdin or write to stdout.
    Stdio,
    /// `-.gz`: gzip-compressed stdin/stdout stream.
    GzStdio,
}

impl Sentinel {
    /// Every sentinel, in token-table order.
    pub const ALL: [Sentinel; 3] = [Sentinel::None, Sentinel::Stdio, Sentinel::GzStdio];

    /// Literal token the engine expects on its command line.
    pub const fn token(self) -> &'static str {
        match self {
            Sentinel::None => "--none",
            Sentinel::Stdio => "-",
            Sentinel::GzStdio => "-.gz",
        }
    }

    /// Sentinel spelled exactly as `token`, if any.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|sentinel| sentinel.token() == token)
    }
}

/// A path-shaped argument handed to the engine: either a real path or a
/// sentinel that is exempt from existence checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactArg {
    /// A filesystem path, checked for existence where the job requires it.
    Path(PathBuf),
    /// A reserved token passed through verbatim.
    Sentinel(Sentinel),
}

impl ArtifactArg {
    /// `--none`.
    pub const NONE: ArtifactArg = ArtifactArg::Sentinel(Sentinel::None);
    /// `-`.
    pub const STDIO: ArtifactArg = ArtifactArg::Sentinel(Sentinel::Stdio);
    /// `-.gz`.
    pub const GZ_STDIO: ArtifactArg = ArtifactArg::Sentinel(Sentinel::GzStdio);

    /// Maps an optional path to the `--none` sentinel when absent.
    pub fn or_none(path: Option<PathBuf>) -> Self {
        path.map_or(Self::NONE, ArtifactArg::Path)
    }

    /// Interprets a command-line string, recognising the sentinel tokens.
    pub fn parse(raw: &str) -> Self {
        match Sentinel::from_token(raw) {
            Some(sentinel) => ArtifactArg::Sentinel(sentinel),
            None => ArtifactArg::Path(PathBuf::from(raw)),
        }
    }

    /// Real filesystem path, or `None` for sentinels.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            ArtifactArg::Path(path) => Some(path),
            ArtifactArg::Sentinel(_) => None,
        }
    }

    /// True for the reserved tokens.
    pub fn is_sentinel(&self) -> bool {
        matches!(self, ArtifactArg::Sentinel(_))
    }

    /// Value placed in the engine's argument vector. Paths keep their exact
    /// bytes, so the engine opens the file that was checked.
    pub fn to_arg(&self) -> OsString {
        match self {
            ArtifactArg::Path(path) => path.as_os_str().to_os_string(),
            ArtifactArg::Sentinel(sentinel) => sentinel.token().into(),
        }
    }
}

impl From<PathBuf> for ArtifactArg {
    fn from(path: PathBuf) -> Self {
        ArtifactArg::Path(path)
    }
}

impl From<&Path> for ArtifactArg {
    fn from(path: &Path) -> Self {
        ArtifactArg::Path(path.to_path_buf())
    }
}

impl From<Sentinel> for ArtifactArg {
    fn from(sentinel: Sentinel) -> Self {
        ArtifactArg::Sentinel(sentinel)
    }
}

impl Display for ArtifactArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactArg::Path(path) => write!(f, "{}", path.display()),
            ArtifactArg::Sentinel(sentinel) => f.write_str(sentinel.token()),
        }
    }
}
