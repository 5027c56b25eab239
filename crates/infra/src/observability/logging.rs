use payline_domain::LoggingConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Filter from `RUST_LOG`, falling back to the configured level and then to
/// `info` if that directive does not parse.
pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Returns `false` if one was already set.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = build_filter(config);

    let layer = if config.json {
        fmt::layer().json().with_current_span(true).with_target(true).boxed()
    } else {
        fmt::layer().with_target(true).boxed()
    };

    let installed = tracing_subscriber::registry().with(layer.with_filter(filter)).try_init().is_ok();
    if installed {
        tracing::debug!(level = %config.level, json = config.json, "tracing initialised");
    }
    installed
}
