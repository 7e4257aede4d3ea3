use std::io;
use std::process::Command;

use loom_core::errors::{ErrorInfo, LoomError};

use crate::command::CommandLine;

/// Exit status of a finished engine process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    code: Option<i32>,
}

impl ExitOutcome {
    /// Process exited with `code`.
    pub const fn exited(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// Process exited with status zero.
    pub const fn success() -> Self {
        Self::exited(0)
    }

    /// Process was terminated without an exit code (e.g. by a signal).
    pub const fn terminated() -> Self {
        Self { code: None }
    }

    /// Exit code, if the process exited normally.
    pub fn code(&self) -> Option<i32> {
        self.code
    }

    /// Exit code zero.
    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs one command to completion.
///
/// Implementations block until the process exits; there is no timeout.
pub trait Launcher {
    /// Starts `command` and waits for it.
    fn launch(&mut self, command: &CommandLine) -> Result<ExitOutcome, LoomError>;
}

impl<L: Launcher + ?Sized> Launcher for &mut L {
    fn launch(&mut self, command: &CommandLine) -> Result<ExitOutcome, LoomError> {
        (**self).launch(command)
    }
}

/// Spawns real processes with inherited stdin/stdout/stderr, so `-` stream
/// arguments reach the engine untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch(&mut self, command: &CommandLine) -> Result<ExitOutcome, LoomError> {
        let status = Command::new(command.program())
            .args(command.args())
            .status()
            .map_err(|err| spawn_error(command, &err))?;
        Ok(match status.code() {
            Some(code) => ExitOutcome::exited(code),
            None => ExitOutcome::terminated(),
        })
    }
}

fn spawn_error(command: &CommandLine, err: &io::Error) -> LoomError {
    let program = command.program().display().to_string();
    let info = if err.kind() == io::ErrorKind::NotFound {
        ErrorInfo::new("loom.executable_missing", "engine executable not found")
            .with_context("path", program)
            .with_hint("build the engine for the selected variant first")
    } else {
        ErrorInfo::new("loom.spawn_failed", format!("failed to start engine: {err}"))
            .with_context("path", program)
    };
    LoomError::Configuration(info)
}
