use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use loom_core::{ArtifactArg, LoomConfig};
use loom_runner::{BuildVariant, PredictJob};

#[derive(Args, Debug)]
pub struct PredictArgs {
    #[arg(long)]
    pub model_in: PathBuf,
    #[arg(long)]
    pub groups_in: PathBuf,
    /// Query stream; `-` reads stdin.
    #[arg(long, default_value = "-", allow_hyphen_values = true)]
    pub queries_in: String,
    /// Result stream; `-` writes stdout.
    #[arg(long, default_value = "-", allow_hyphen_values = true)]
    pub results_out: String,
    /// Run the debug build of the engine.
    #[arg(long)]
    pub debug: bool,
}

impl PredictArgs {
    pub fn job(&self) -> PredictJob {
        PredictJob {
            queries_in: ArtifactArg::parse(&self.queries_in),
            results_out: ArtifactArg::parse(&self.results_out),
            variant: BuildVariant::from_debug_flag(self.debug),
            ..PredictJob::new(&self.model_in, &self.groups_in)
        }
    }
}

pub fn run(args: &PredictArgs, config: &LoomConfig) -> Result<(), Box<dyn Error>> {
    super::orchestrator(config).predict(args.job())?;
    Ok(())
}
