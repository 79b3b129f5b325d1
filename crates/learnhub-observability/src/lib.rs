//! LearnHub observability: structured logging, OpenTelemetry tracing and
//! Prometheus metrics.
//!
//! Everything is on by default. Setting `OBSERVABILITY_ENABLED=false` (or `0`)
//! at runtime reduces logging to the console and turns the metrics middleware
//! and business counters into no-ops.
//!
//! ```no_run
//! use learnhub_observability::{init_tracing, shutdown_tracer};
//!
//! #[tokio::main]
//! async fn main() {
//!     init_tracing();
//!     // ... application code ...
//!     shutdown_tracer().await;
//! }
//! ```

mod basic_logging;
pub mod logging;
pub mod metrics;

use std::sync::OnceLock;

pub use metrics_exporter_prometheus::PrometheusHandle;

pub use basic_logging::init_basic_console_logging;
pub use logging::{init_tracing, logging_middleware, shutdown_tracer};
pub use metrics::{
    init_metrics, metrics_middleware, metrics_router, track_course_created, track_jwt_issued,
    track_user_login_failure, track_user_login_success, track_user_registered,
};

/// Name used for log files and the OpenTelemetry service resource.
pub const SERVICE_NAME: &str = "learnhub";

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Reads `OBSERVABILITY_ENABLED` once. Anything but `false`/`0` enables it.
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED
        .get_or_init(|| parse_enabled(std::env::var("OBSERVABILITY_ENABLED").ok().as_deref()))
}

fn parse_enabled(value: Option<&str>) -> bool {
    match value {
        Some(v) => {
            let v = v.trim().to_lowercase();
            v != "false" && v != "0"
        }
        None => true,
    }
}
