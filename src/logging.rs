//! Log sink setup.
//!
//! Installed once by the binary before anything else runs. Library code only
//! emits `tracing` events and never configures the subscriber itself.

use tracing_subscriber::EnvFilter;

const DEFAULT_LEVEL: &str = "info";

/// Route log events to stderr so the report on stdout stays clean.
///
/// `RUST_LOG` wins over `verbose`; without either only info and above is shown.
pub fn init(verbose: bool) {
    let fallback = if verbose { "repo_traffic=debug,info" } else { DEFAULT_LEVEL };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
