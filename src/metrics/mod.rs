use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};

/// Projection counters. Updated through shared references so concurrent
/// readers of a frozen registry can record without a lock.
#[derive(Debug, Default)]
pub struct ProjectionMetrics {
    projections: AtomicU64,
    failures: AtomicU64,
    records: AtomicU64,
    nodes: AtomicU64,
}

impl ProjectionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_projection(&self, record_count: usize, node_count: usize) {
        self.projections.fetch_add(1, Ordering::Relaxed);
        self.records
            .fetch_add(record_count as u64, Ordering::Relaxed);
        self.nodes.fetch_add(node_count as u64, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            projections: self.projections.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            records: self.records.load(Ordering::Relaxed),
            nodes: self.nodes.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub projections: u64,
    pub failures: u64,
    pub records: u64,
    pub nodes: u64,
}

impl MetricSnapshot {
    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("projections".to_string(), json!(self.projections));
        map.insert("failures".to_string(), json!(self.failures));
        map.insert("records".to_string(), json!(self.records));
        map.insert("nodes".to_string(), json!(self.nodes));
        map
    }

    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "projection_metrics", self.as_fields())
    }
}
