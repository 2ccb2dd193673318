//! Instrumentation counters
//!
//! Process-wide counters over the capture pipeline, kept as plain atomics so
//! recording is wait-free from any thread, including the engine's callback
//! thread.
//!
//! # Example
//!
//! ```rust
//! use webscope::metrics::METRICS;
//!
//! METRICS.record_event();
//! let snapshot = METRICS.snapshot();
//! assert!(snapshot.events_captured >= 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Global metrics instance
pub static METRICS: InstrumentationMetrics = InstrumentationMetrics::new();

/// Counters over the capture pipeline
#[derive(Debug)]
pub struct InstrumentationMetrics {
    /// Lifecycle events captured by the delegate proxies
    pub events_captured: AtomicU64,
    /// Console messages captured from the page intercept
    pub console_messages: AtomicU64,
    /// Script-message payloads dropped as malformed
    pub malformed_payloads: AtomicU64,
    /// Snapshot or evaluation scripts that failed
    pub script_failures: AtomicU64,
    /// DOM snapshots fetched
    pub dom_snapshots: AtomicU64,
    /// Storage snapshots fetched
    pub storage_snapshots: AtomicU64,
}

impl InstrumentationMetrics {
    /// Create a zeroed metrics instance
    pub const fn new() -> Self {
        Self {
            events_captured: AtomicU64::new(0),
            console_messages: AtomicU64::new(0),
            malformed_payloads: AtomicU64::new(0),
            script_failures: AtomicU64::new(0),
            dom_snapshots: AtomicU64::new(0),
            storage_snapshots: AtomicU64::new(0),
        }
    }

    /// Record a captured lifecycle event
    pub fn record_event(&self) {
        self.events_captured.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a captured console message
    pub fn record_console_message(&self) {
        self.console_messages.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a dropped malformed payload
    pub fn record_malformed_payload(&self) {
        self.malformed_payloads.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed script evaluation
    pub fn record_script_failure(&self) {
        self.script_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a fetched DOM snapshot
    pub fn record_dom_snapshot(&self) {
        self.dom_snapshots.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a fetched storage snapshot
    pub fn record_storage_snapshot(&self) {
        self.storage_snapshots.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            events_captured: self.events_captured.load(Ordering::Relaxed),
            console_messages: self.console_messages.load(Ordering::Relaxed),
            malformed_payloads: self.malformed_payloads.load(Ordering::Relaxed),
            script_failures: self.script_failures.load(Ordering::Relaxed),
            dom_snapshots: self.dom_snapshots.load(Ordering::Relaxed),
            storage_snapshots: self.storage_snapshots.load(Ordering::Relaxed),
        }
    }
}

impl Default for InstrumentationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time counter values
#[derive(Debug, Clone, Default, Serialize)]
#[allow(missing_docs)]
pub struct MetricsSnapshot {
    pub events_captured: u64,
    pub console_messages: u64,
    pub malformed_payloads: u64,
    pub script_failures: u64,
    pub dom_snapshots: u64,
    pub storage_snapshots: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = InstrumentationMetrics::new();
        metrics.record_event();
        metrics.record_event();
        metrics.record_console_message();
        metrics.record_malformed_payload();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.events_captured, 2);
        assert_eq!(snapshot.console_messages, 1);
        assert_eq!(snapshot.malformed_payloads, 1);
        assert_eq!(snapshot.script_failures, 0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let metrics = InstrumentationMetrics::new();
        metrics.record_dom_snapshot();
        let json = serde_json::to_string(&metrics.snapshot()).unwrap();
        assert!(json.contains("\"dom_snapshots\":1"));
    }
}
