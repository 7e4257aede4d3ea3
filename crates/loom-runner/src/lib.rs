#![deny(missing_docs)]
//! Drives the loom inference engine: `infer`, `posterior_enum` and `predict`
//! are run as external executables, with artifact checks on both sides of
//! each invocation.

mod command;
pub mod jobs;
mod launcher;
mod orchestrator;
mod variant;

pub use command::{format_real, CommandLine};
pub use jobs::{
    EngineJob, InferJob, PosteriorEnumJob, PredictJob, DEFAULT_EXTRA_PASSES, DEFAULT_KIND_COUNT,
    DEFAULT_KIND_ITERS, DEFAULT_SAMPLE_COUNT,
};
pub use launcher::{ExitOutcome, Launcher, SystemLauncher};
pub use orchestrator::{JobReport, Orchestrator};
pub use variant::{BinLayout, BuildVariant};
