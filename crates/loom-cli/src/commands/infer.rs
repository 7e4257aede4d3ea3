use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use loom_core::{ArtifactArg, LoomConfig};
use loom_runner::{
    BuildVariant, InferJob, DEFAULT_EXTRA_PASSES, DEFAULT_KIND_COUNT, DEFAULT_KIND_ITERS,
};

#[derive(Args, Debug)]
pub struct InferArgs {
    /// Serialized model.
    #[arg(long)]
    pub model_in: PathBuf,
    /// Group state from a previous checkpoint.
    #[arg(long, allow_hyphen_values = true)]
    pub groups_in: Option<String>,
    /// Row assignments from a previous checkpoint.
    #[arg(long, allow_hyphen_values = true)]
    pub assign_in: Option<String>,
    /// Encoded rows; `-` reads stdin, `-.gz` reads gzipped stdin.
    #[arg(long, default_value = "-", allow_hyphen_values = true)]
    pub rows_in: String,
    /// Directory receiving the new group state.
    #[arg(long)]
    pub groups_out: PathBuf,
    /// Row assignments output.
    #[arg(long, allow_hyphen_values = true)]
    pub assign_out: Option<String>,
    /// Extra passes over the data after the first.
    #[arg(long, default_value_t = DEFAULT_EXTRA_PASSES)]
    pub extra_passes: f64,
    /// Number of kinds to explore; 0 disables kind inference.
    #[arg(long, default_value_t = DEFAULT_KIND_COUNT)]
    pub kind_count: usize,
    /// Inner iterations of the kind search.
    #[arg(long, default_value_t = DEFAULT_KIND_ITERS)]
    pub kind_iters: usize,
    /// Run the debug build of the engine.
    #[arg(long)]
    pub debug: bool,
}

impl InferArgs {
    pub fn job(&self) -> InferJob {
        InferJob {
            groups_in: optional(self.groups_in.as_deref()),
            assign_in: optional(self.assign_in.as_deref()),
            rows_in: ArtifactArg::parse(&self.rows_in),
            assign_out: optional(self.assign_out.as_deref()),
            extra_passes: self.extra_passes,
            kind_count: self.kind_count,
            kind_iters: self.kind_iters,
            variant: BuildVariant::from_debug_flag(self.debug),
            ..InferJob::new(&self.model_in, &self.groups_out)
        }
    }
}

pub(crate) fn optional(raw: Option<&str>) -> ArtifactArg {
    raw.map_or(ArtifactArg::NONE, ArtifactArg::parse)
}

pub fn run(args: &InferArgs, config: &LoomConfig) -> Result<(), Box<dyn Error>> {
    super::orchestrator(config).infer(args.job())?;
    Ok(())
}
