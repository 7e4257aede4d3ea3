use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use loom_core::{ArtifactArg, LoomConfig};
use loom_runner::{
    BuildVariant, PosteriorEnumJob, DEFAULT_KIND_COUNT, DEFAULT_KIND_ITERS, DEFAULT_SAMPLE_COUNT,
};

#[derive(Args, Debug)]
pub struct PosteriorEnumArgs {
    #[arg(long)]
    pub model_in: PathBuf,
    #[arg(long, allow_hyphen_values = true)]
    pub rows_in: String,
    #[arg(long, allow_hyphen_values = true)]
    pub samples_out: String,
    /// Number of posterior draws.
    #[arg(long, default_value_t = DEFAULT_SAMPLE_COUNT)]
    pub sample_count: usize,
    #[arg(long, default_value_t = DEFAULT_KIND_COUNT)]
    pub kind_count: usize,
    #[arg(long, default_value_t = DEFAULT_KIND_ITERS)]
    pub kind_iters: usize,
    /// Run the debug build of the engine.
    #[arg(long)]
    pub debug: bool,
}

impl PosteriorEnumArgs {
    pub fn job(&self) -> PosteriorEnumJob {
        PosteriorEnumJob {
            sample_count: self.sample_count,
            kind_count: self.kind_count,
            kind_iters: self.kind_iters,
            variant: BuildVariant::from_debug_flag(self.debug),
            ..PosteriorEnumJob::new(
                &self.model_in,
                ArtifactArg::parse(&self.rows_in),
                ArtifactArg::parse(&self.samples_out),
            )
        }
    }
}

pub fn run(args: &PosteriorEnumArgs, config: &LoomConfig) -> Result<(), Box<dyn Error>> {
    super::orchestrator(config).posterior_enum(args.job())?;
    Ok(())
}
