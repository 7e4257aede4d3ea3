use std::fs;
use std::path::{Path, PathBuf};

use loom_core::errors::{ErrorInfo, LoomError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::command::CommandLine;
use crate::jobs::{EngineJob, InferJob, PosteriorEnumJob, PredictJob};
use crate::launcher::Launcher;
use crate::variant::BinLayout;

/// Outcome of a completed job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobReport {
    /// Command that was run.
    pub command: CommandLine,
    /// Outputs verified to exist after the run.
    pub outputs: Vec<PathBuf>,
}

/// Runs engine jobs one at a time through a [`Launcher`].
///
/// Every run follows the same protocol: validate parameters, check inputs,
/// create output directories, launch and wait, then check outputs. Nothing is
/// retried and no partial result is returned.
#[derive(Debug)]
pub struct Orchestrator<L> {
    layout: BinLayout,
    launcher: L,
}

impl<L: Launcher> Orchestrator<L> {
    /// Orchestrator launching executables from `layout`.
    pub fn new(layout: BinLayout, launcher: L) -> Self {
        Self { layout, launcher }
    }

    /// Executable layout in use.
    pub fn layout(&self) -> &BinLayout {
        &self.layout
    }

    /// The launcher, e.g. to inspect a test double.
    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Consumes the orchestrator, returning the launcher.
    pub fn into_launcher(self) -> L {
        self.launcher
    }

    /// Runs one inference checkpoint.
    pub fn infer(&mut self, job: InferJob) -> Result<JobReport, LoomError> {
        self.run(job)
    }

    /// Generates posterior samples.
    pub fn posterior_enum(&mut self, job: PosteriorEnumJob) -> Result<JobReport, LoomError> {
        self.run(job)
    }

    /// Serves predictions.
    pub fn predict(&mut self, job: PredictJob) -> Result<JobReport, LoomError> {
        self.run(job)
    }

    /// Runs any job through the shared protocol.
    pub fn run<J: EngineJob>(&mut self, job: J) -> Result<JobReport, LoomError> {
        job.validate()?;
        check_inputs(&job.required_inputs())?;
        for dir in job.output_dirs() {
            ensure_dir(&dir)?;
        }
        let command = job.command(&self.layout);
        info!(binary = J::BINARY, variant = %job.variant(), "{}", command.render());

        let outcome = self.launcher.launch(&command)?;
        if !outcome.is_success() {
            return Err(LoomError::process_failed(
                outcome.code(),
                command.to_string(),
            ));
        }

        let outputs = job.required_outputs();
        check_outputs(&outputs)?;
        debug!(binary = J::BINARY, outputs = outputs.len(), "job completed");
        Ok(JobReport {
            command,
            outputs: outputs.into_iter().map(Path::to_path_buf).collect(),
        })
    }
}

fn check_inputs(paths: &[&Path]) -> Result<(), LoomError> {
    match paths.iter().find(|path| !path.exists()) {
        Some(path) => Err(LoomError::missing_input(path)),
        None => Ok(()),
    }
}

fn check_outputs(paths: &[&Path]) -> Result<(), LoomError> {
    match paths.iter().find(|path| !path.exists()) {
        Some(path) => Err(LoomError::missing_output(path)),
        None => Ok(()),
    }
}

/// Creates `dir` and its parents. An existing directory, including one
/// created concurrently by another job, counts as success.
fn ensure_dir(dir: &Path) -> Result<(), LoomError> {
    if dir.is_dir() {
        return Ok(());
    }
    debug!(path = %dir.display(), "creating output directory");
    fs::create_dir_all(dir).map_err(|err| {
        LoomError::Configuration(
            ErrorInfo::new(
                "loom.output_dir",
                format!("failed to create output directory: {err}"),
            )
            .with_context("path", dir.display().to_string()),
        )
    })
}
