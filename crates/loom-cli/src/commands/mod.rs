pub mod check;
pub mod datasets;
pub mod infer;
pub mod posterior_enum;
pub mod predict;

use loom_core::LoomConfig;
use loom_runner::{BinLayout, Orchestrator, SystemLauncher};

pub(crate) fn orchestrator(config: &LoomConfig) -> Orchestrator<SystemLauncher> {
    Orchestrator::new(BinLayout::new(&config.engine_root), SystemLauncher)
}
