//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the tracing filter directive.
pub const ENV_LOG: &str = "LOOM_LOG";

/// Installs the global tracing subscriber.
///
/// Events go to stderr; stdout is reserved for engine streams such as
/// prediction results written to `-`. Respects `LOOM_LOG`, defaulting to
/// `info`. Calling it twice is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
