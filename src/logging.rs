use tracing_subscriber::EnvFilter;

/// Install the stderr `fmt` subscriber used by the binaries.
///
/// `RUST_LOG` overrides `default_filter`. Returns `false` when a global
/// subscriber was already set.
pub fn init_tracing(default_filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .try_init()
        .is_ok()
}
