//! OpenTelemetry-based observability with file-based trace export.
//!
//! Events go to stderr through a `fmt` layer. Spans additionally go through
//! OpenTelemetry into a rotating OTLP JSON file, one batch per line:
//!
//! ```text
//! tracing ──┬─→ fmt layer ─→ stderr
//!           └─→ tracing-opentelemetry → SDK → FileSpanExporter → <data_dir>/locationstream-otlp.json
//! ```
//!
//! The file rotates at 10 MB and keeps 3 backups.
//!
//! # Configuration
//!
//! The filter is resolved from:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` in the configuration file
//! 3. Default: `"info"`
//!
//! # Usage
//!
//! ```rust,no_run
//! use locationstream::observability::init_tracing;
//! use locationstream::Config;
//!
//! init_tracing(&Config::default());
//! tracing::info!("tracing is up");
//! ```
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`tracer`]: Tracer provider with file export
//! - [`span_formatter`]: OTLP JSON span serialization
//! - [`file_writer`]: Size-rotating file writer

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::init_tracing;

/// Service and instrumentation scope name reported in exported spans.
const SERVICE_NAME: &str = "locationstream";
