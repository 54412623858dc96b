use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// CloudWatch stamps every line on ingestion, so time and target are left out.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
