#![deny(missing_docs)]
//! Shared building blocks for the loom runner: the error taxonomy, the
//! sentinel path vocabulary understood by the inference engine, and runtime
//! configuration.

pub mod config;
pub mod errors;
pub mod sentinel;
pub mod telemetry;

pub use config::{parse_cleanup_flag, LoomConfig};
pub use errors::{ErrorInfo, LoomError};
pub use sentinel::{ArtifactArg, Sentinel};
pub use telemetry::init_tracing;
