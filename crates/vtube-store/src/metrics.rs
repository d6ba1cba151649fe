//! Store metrics collection.
//!
//! Counters for edge writes and recorded views so duplicate-guard hits and
//! attribution skew show up on a dashboard.

use metrics::counter;

/// Metric name constants for consistency.
pub mod names {
    /// Edge writes by edge kind (`follow`/`like`) and operation (`add`/`remove`).
    pub const EDGE_WRITES_TOTAL: &str = "store_edge_writes_total";

    /// Idempotent no-op edge inserts by edge kind.
    pub const EDGE_DUPLICATES_TOTAL: &str = "store_edge_duplicates_total";

    /// Recorded views by viewer classification.
    pub const VIEWS_RECORDED_TOTAL: &str = "store_views_recorded_total";
}

/// Record a committed edge write.
pub fn record_edge_write(kind: &'static str, op: &'static str) {
    counter!(
        names::EDGE_WRITES_TOTAL,
        "kind" => kind,
        "op" => op
    )
    .increment(1);
}

/// Record an edge insert that hit the uniqueness guard.
pub fn record_edge_duplicate(kind: &'static str) {
    counter!(
        names::EDGE_DUPLICATES_TOTAL,
        "kind" => kind
    )
    .increment(1);
}

/// Record a view by classification.
pub fn record_view(class: &'static str) {
    counter!(
        names::VIEWS_RECORDED_TOTAL,
        "class" => class
    )
    .increment(1);
}
