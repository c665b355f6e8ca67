//! Observability for Portico builds.
//!
//! - **Logging**: structured JSON or pretty output through `tracing-subscriber`
//! - **Metrics**: build counters and timings through the `metrics` facade
//!
//! Metrics are recorded unconditionally and cost nothing until the embedding
//! application installs a recorder.
//!
//! # Example
//!
//! ```rust,ignore
//! use portico_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! tracing::info!(routes = 12, "assembling API");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
