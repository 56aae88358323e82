use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info";

/// Installs a JSON subscriber writing one object per line, which CloudWatch
/// Logs indexes as structured fields. `RUST_LOG` overrides the filter.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(false)
        .with_ansi(false)
        .with_current_span(false)
        .init();
}
