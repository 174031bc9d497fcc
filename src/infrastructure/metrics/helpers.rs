//! Metrics helper structs for convenient metric recording

use prometheus::{Encoder, TextEncoder};

use crate::template::{TemplateError, TemplateResult};

use super::{
    COMMANDS_DENIED_TOTAL, COMMANDS_TOTAL, COOLDOWN_REJECTIONS_TOTAL, DISPATCH_TOTAL,
    STORAGE_AVAILABLE, STORE_OPERATIONS_TOTAL, STORE_SEARCH_DEGRADED_TOTAL,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording store metrics
pub struct StoreMetrics;

impl StoreMetrics {
    /// Record the outcome of a store operation
    pub fn record<T>(operation: &str, result: &TemplateResult<T>) {
        let outcome = match result {
            Ok(_) => "ok",
            Err(TemplateError::NotFound(_)) => "not_found",
            Err(TemplateError::StorageUnavailable) => "unavailable",
            Err(TemplateError::Validation(_)) => "invalid",
            Err(TemplateError::Persistence(_)) => "error",
        };
        STORE_OPERATIONS_TOTAL
            .with_label_values(&[operation, outcome])
            .inc();
    }

    /// Record a search answered with an empty list after a failure
    pub fn record_search_degraded() {
        STORE_SEARCH_DEGRADED_TOTAL.inc();
    }

    /// Set storage status
    pub fn set_available(available: bool) {
        STORAGE_AVAILABLE.set(if available { 1 } else { 0 });
    }
}

/// Helper struct for recording dispatch metrics
pub struct DispatchMetrics;

impl DispatchMetrics {
    /// Record a message sent (`embed` or `ping`)
    pub fn record(kind: &str, success: bool) {
        let outcome = if success { "delivered" } else { "failed" };
        DISPATCH_TOTAL.with_label_values(&[kind, outcome]).inc();
    }
}

/// Helper struct for recording command metrics
pub struct CommandMetrics;

impl CommandMetrics {
    /// Record a command that ran to completion
    pub fn record_success(command: &str) {
        COMMANDS_TOTAL.with_label_values(&[command, "ok"]).inc();
    }

    /// Record a command that failed
    pub fn record_failure(command: &str) {
        COMMANDS_TOTAL.with_label_values(&[command, "error"]).inc();
    }

    /// Record a command refused for a missing capability
    pub fn record_denied(capability: &str) {
        COMMANDS_DENIED_TOTAL.with_label_values(&[capability]).inc();
    }

    /// Record a command refused by a cooldown
    pub fn record_cooldown() {
        COOLDOWN_REJECTIONS_TOTAL.inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_outcomes() {
        let not_found: TemplateResult<()> = Err(TemplateError::NotFound("x".into()));
        StoreMetrics::record("fetch", &not_found);
        StoreMetrics::record("fetch", &Ok::<_, TemplateError>(()));

        assert!(
            STORE_OPERATIONS_TOTAL
                .with_label_values(&["fetch", "not_found"])
                .get()
                >= 1
        );
        assert!(STORE_OPERATIONS_TOTAL.with_label_values(&["fetch", "ok"]).get() >= 1);
    }

    #[test]
    fn test_dispatch_and_command_helpers() {
        DispatchMetrics::record("embed", true);
        DispatchMetrics::record("ping", false);
        CommandMetrics::record_success("repost");
        CommandMetrics::record_denied("send_posts");
        CommandMetrics::record_cooldown();

        assert!(DISPATCH_TOTAL.with_label_values(&["ping", "failed"]).get() >= 1);
    }
}
