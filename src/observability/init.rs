//! Subscriber setup.

use super::{tracer, SERVICE_NAME};
use crate::infrastructure::paths::trace_file;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LEVEL: &str = "info";

/// Installs the global tracing subscriber.
///
/// The OpenTelemetry file export is skipped when the data directory cannot be
/// created; stderr logging stays on. Calling this more than once is harmless,
/// only the first call installs a subscriber.
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let data_dir = config.resolved_data_dir();
    let otel_layer = match std::fs::create_dir_all(&data_dir) {
        Ok(()) => {
            let resource = Resource::new(vec![opentelemetry::KeyValue::new(
                "service.name",
                SERVICE_NAME,
            )]);
            let provider = tracer::create_tracer_provider(trace_file(&data_dir), resource);
            Some(OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME)))
        }
        Err(_) => None,
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init();
}
