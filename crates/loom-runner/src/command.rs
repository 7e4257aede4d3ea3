use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::fmt::{self, Display};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Immutable program + positional argument vector for one engine invocation.
///
/// Arguments are kept as OS strings so paths reach the engine byte for byte.
/// The rendered forms are lossy and meant for logs and error context only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandLine {
    program: PathBuf,
    args: Vec<OsString>,
}

impl CommandLine {
    /// Pairs an executable with its argument vector.
    pub fn new(program: impl Into<PathBuf>, args: Vec<OsString>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Executable path.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Positional arguments, excluding the program.
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Multi-line rendering for audit logs, one argument per line.
    pub fn render(&self) -> String {
        self.words().collect::<Vec<_>>().join(" \\\n  ")
    }

    fn words(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(|word| quote(word).into_owned())
    }
}

/// Single-line form used in error context. Words containing whitespace or
/// quotes are single-quoted so the line splits back unambiguously.
impl Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.words().collect::<Vec<_>>().join(" "))
    }
}

fn quote(word: &OsStr) -> Cow<'_, str> {
    let text = word.to_string_lossy();
    let plain = !text.is_empty()
        && !text.contains(|c: char| c.is_whitespace() || c == '\'' || c == '"');
    if plain {
        text
    } else {
        Cow::Owned(format!("'{}'", text.replace('\'', r"'\''")))
    }
}

/// Stringifies a real-valued engine parameter, always keeping a decimal
/// point so `0.0` stays `0.0`.
pub fn format_real(value: f64) -> String {
    format!("{value:?}")
}
