use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable that switches [`init_logging_from_env`] to JSON output.
pub const LOG_JSON_ENV: &str = "TRENDSCAN_LOG_JSON";

/// Initialise default non-JSON `Trendscan` logging.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init()
}

/// Initialise default JSON `Trendscan` logging.
pub fn init_json_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
        .init()
}

/// Initialise JSON logging if [`LOG_JSON_ENV`] is set, otherwise default logging.
pub fn init_logging_from_env() {
    if std::env::var_os(LOG_JSON_ENV).is_some() {
        init_json_logging()
    } else {
        init_logging()
    }
}
