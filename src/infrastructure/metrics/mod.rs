//! Prometheus metrics for the recruitment bot.
//!
//! - Store metrics (operations by outcome, degraded searches, storage status)
//! - Dispatch metrics (embeds and pings delivered or rejected)
//! - Command metrics (invocations, permission denials, cooldown rejections)

mod helpers;

pub use helpers::{encode_metrics, CommandMetrics, DispatchMetrics, StoreMetrics};

use lazy_static::lazy_static;
use prometheus::{register_int_counter, register_int_counter_vec, register_int_gauge, IntCounter, IntCounterVec, IntGauge};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "recruit";

lazy_static! {
    // ============================================================================
    // Store Metrics
    // ============================================================================

    /// Store operations by operation and outcome
    pub static ref STORE_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_store_operations_total", METRIC_PREFIX),
        "Total recruitment post store operations",
        &["operation", "outcome"]
    ).unwrap();

    /// Searches answered with an empty list because storage failed
    pub static ref STORE_SEARCH_DEGRADED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_store_search_degraded_total", METRIC_PREFIX),
        "Total searches that fell back to an empty result"
    ).unwrap();

    /// Storage status (1 = connected, 0 = unavailable)
    pub static ref STORAGE_AVAILABLE: IntGauge = register_int_gauge!(
        format!("{}_storage_available", METRIC_PREFIX),
        "Storage status (1=connected, 0=unavailable)"
    ).unwrap();

    // ============================================================================
    // Dispatch Metrics
    // ============================================================================

    /// Messages sent to the chat platform by kind and outcome
    pub static ref DISPATCH_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_dispatch_total", METRIC_PREFIX),
        "Total messages dispatched to channels",
        &["kind", "outcome"]
    ).unwrap();

    // ============================================================================
    // Command Metrics
    // ============================================================================

    /// Commands invoked by command and outcome
    pub static ref COMMANDS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_commands_total", METRIC_PREFIX),
        "Total commands invoked",
        &["command", "outcome"]
    ).unwrap();

    /// Commands refused for a missing capability
    pub static ref COMMANDS_DENIED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_commands_denied_total", METRIC_PREFIX),
        "Total commands refused for missing permission",
        &["capability"]
    ).unwrap();

    /// Commands refused by a cooldown
    pub static ref COOLDOWN_REJECTIONS_TOTAL: IntCounter = register_int_counter!(
        format!("{}_cooldown_rejections_total", METRIC_PREFIX),
        "Total commands refused because a cooldown was active"
    ).unwrap();
}
