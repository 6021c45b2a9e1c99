// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod api;
pub mod config;
pub mod gateway;
pub mod ingest;
pub mod metrics;
pub mod navigator;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, router, AppState};
pub use crate::config::GatewayConfig;
pub use crate::gateway::{FeedGateway, GatewayClient, GatewayError, HttpGateway};
pub use crate::ingest::types::{Collection, ContentItem, SourceId};
pub use crate::navigator::{CurrentItem, Navigator};

use tracing_subscriber::{fmt, fmt::MakeWriter, prelude::*, EnvFilter};

pub const DEFAULT_LOG_FILTER: &str = "feed_carousel=info,gateway=info,api=info,navigator=info,ingest=info,tower_http=info,warn";

/// Install the global tracing subscriber on stdout. `LOG_FORMAT=json` switches to JSON lines.
pub fn init_tracing() {
    init_tracing_with(std::io::stdout);
}

/// Same filter and format rules as [`init_tracing`], writing to stderr so
/// log lines stay out of interactive output.
pub fn init_tracing_stderr() {
    init_tracing_with(std::io::stderr);
}

fn init_tracing_with<W>(writer: W)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let registry = tracing_subscriber::registry().with(filter);
    if json_format(std::env::var("LOG_FORMAT").ok().as_deref()) {
        registry.with(fmt::layer().json().with_writer(writer)).init();
    } else {
        registry.with(fmt::layer().compact().with_writer(writer)).init();
    }
}

fn json_format(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_selects_json_case_insensitively() {
        assert!(json_format(Some("json")));
        assert!(json_format(Some("JSON ")));
        assert!(!json_format(Some("compact")));
        assert!(!json_format(None));
    }
}
