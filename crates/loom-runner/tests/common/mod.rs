#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use loom_core::errors::LoomError;
use loom_runner::{CommandLine, ExitOutcome, Launcher};

/// Launcher double: records every command and optionally writes files as if
/// the engine had produced them.
#[derive(Debug)]
pub struct StubEngine {
    pub calls: Vec<CommandLine>,
    pub exit: ExitOutcome,
    pub produces: Vec<PathBuf>,
}

impl StubEngine {
    pub fn exiting(exit: ExitOutcome) -> Self {
        Self {
            calls: Vec::new(),
            exit,
            produces: Vec::new(),
        }
    }

    pub fn succeeding() -> Self {
        Self::exiting(ExitOutcome::success())
    }

    pub fn producing(mut self, path: impl Into<PathBuf>) -> Self {
        self.produces.push(path.into());
        self
    }
}

impl Launcher for StubEngine {
    fn launch(&mut self, command: &CommandLine) -> Result<ExitOutcome, LoomError> {
        self.calls.push(command.clone());
        for path in &self.produces {
            fs::write(path, b"stub").expect("stub output");
        }
        Ok(self.exit)
    }
}

pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent dir");
    }
    fs::write(path, b"fixture").expect("touch");
}
