//! Build metrics.
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `portico_methods_attached_total` | Counter | `method`, `integration` | Methods attached to the tree |
//! | `portico_models_total` | Counter | - | Models generated |
//! | `portico_preflights_total` | Counter | - | CORS preflights registered |
//! | `portico_assembly_failures_total` | Counter | `kind` | Aborted builds |
//! | `portico_assembly_duration_seconds` | Histogram | - | Time spent per build |

use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};

/// Methods attached to the tree.
pub const METHODS_ATTACHED: &str = "portico_methods_attached_total";

/// Models generated.
pub const MODELS: &str = "portico_models_total";

/// CORS preflights registered.
pub const PREFLIGHTS: &str = "portico_preflights_total";

/// Aborted builds.
pub const ASSEMBLY_FAILURES: &str = "portico_assembly_failures_total";

/// Time spent per build.
pub const ASSEMBLY_DURATION: &str = "portico_assembly_duration_seconds";

/// Registers descriptions for every build metric with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(METHODS_ATTACHED, "Methods attached to the resource tree");
    describe_counter!(MODELS, "Request and response models generated");
    describe_counter!(PREFLIGHTS, "CORS preflight methods registered");
    describe_counter!(ASSEMBLY_FAILURES, "Builds aborted by a fatal error");
    describe_histogram!(ASSEMBLY_DURATION, Unit::Seconds, "Time spent assembling an API");
}

/// Records a method attachment.
pub fn record_method(method: &str, integration: &'static str) {
    counter!(METHODS_ATTACHED, "method" => method.to_string(), "integration" => integration)
        .increment(1);
}

/// Records generated models.
pub fn record_models(count: u64) {
    counter!(MODELS).increment(count);
}

/// Records a newly registered preflight.
pub fn record_preflight() {
    counter!(PREFLIGHTS).increment(1);
}

/// Records an aborted build.
pub fn record_failure(kind: &'static str) {
    counter!(ASSEMBLY_FAILURES, "kind" => kind).increment(1);
}

/// Records the duration of a completed build.
pub fn record_duration(elapsed: Duration) {
    histogram!(ASSEMBLY_DURATION).record(elapsed.as_secs_f64());
}
