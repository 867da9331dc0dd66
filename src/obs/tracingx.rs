use tracing_subscriber::EnvFilter;

/// `RUST_LOG` ou `info`.
pub fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
