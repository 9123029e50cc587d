/*!
 * Structured Tracing
 * Subscriber setup for the benchmark binary using the tracing crate
 *
 * Lock hot paths never log; spans and events come from the harness only.
 */

use tracing::info;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - LOCKBENCH_TRACE_JSON: Enable JSON output (default: false)
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("LOCKBENCH_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let initialized = if use_json {
        // JSON output for machine parsing of sweep results
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .is_ok()
    } else {
        // Human-readable output for interactive runs
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .compact(),
            )
            .try_init()
            .is_ok()
    };

    if initialized {
        info!(json = use_json, "Structured tracing initialized");
    }
}
