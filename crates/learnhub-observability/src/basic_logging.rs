use tracing_subscriber::{Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::logging::default_env_filter;

/// Console-only logging, used when observability is switched off or the log
/// directory cannot be created.
///
/// The filter comes from `RUST_LOG`, falling back to
/// [`DEFAULT_LOG_FILTER`](crate::logging::DEFAULT_LOG_FILTER).
pub fn init_basic_console_logging() {
    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(default_env_filter());

    let _ = tracing_subscriber::registry().with(console_layer).try_init();

    tracing::info!("Observability disabled, logging to console only");
}
