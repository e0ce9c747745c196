//! Audit lines and counters for store traffic.
//!
//! Audit lines are JSON and go to the `archive_core::audit` log target, which
//! the logger routes to its own rolling file.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

#[derive(Default)]
pub struct Metrics {
    pub queries_total: AtomicU64,
    pub writes_total: AtomicU64,
    pub rejected_filters_total: AtomicU64,
    pub txn_retries_total: AtomicU64,
}

pub struct Telemetry {
    pub metrics: Metrics,
    // Tests capture audit lines in memory
    audit_sink: RwLock<Option<Arc<RwLock<Vec<String>>>>>,
}

pub(crate) static TELEMETRY: LazyLock<Telemetry> = LazyLock::new(|| Telemetry {
    metrics: Metrics::default(),
    audit_sink: RwLock::new(None),
});

pub fn set_audit_sink_for_tests(sink: Arc<RwLock<Vec<String>>>) {
    *TELEMETRY.audit_sink.write() = Some(sink);
}

fn now_ts() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

pub fn log_query(kind: &str, filter_dbg: &str, duration_ms: u128, result_count: usize) {
    TELEMETRY.metrics.queries_total.fetch_add(1, Ordering::Relaxed);
    let line = serde_json::json!({
        "ts": now_ts(),
        "kind": kind,
        "filter": filter_dbg,
        "duration_ms": u64::try_from(duration_ms).unwrap_or(u64::MAX),
        "result_count": result_count,
    });
    log::debug!(target: "archive_core::metrics", "{line}");
}

pub fn log_audit(op: &str, key: &str, user: Option<&str>) {
    TELEMETRY.metrics.writes_total.fetch_add(1, Ordering::Relaxed);
    let line = serde_json::json!({ "ts": now_ts(), "op": op, "key": key, "user": user }).to_string();
    let sink = TELEMETRY.audit_sink.read().clone();
    if let Some(sink) = sink {
        sink.write().push(line.clone());
    }
    log::info!(target: "archive_core::audit", "{line}");
}

pub fn note_rejected_filter() {
    TELEMETRY.metrics.rejected_filters_total.fetch_add(1, Ordering::Relaxed);
}

pub fn note_txn_retry() {
    TELEMETRY.metrics.txn_retries_total.fetch_add(1, Ordering::Relaxed);
}

#[must_use]
pub fn metrics_text() -> String {
    let m = &TELEMETRY.metrics;
    format!(
        "archive_queries_total {}\n\
         archive_writes_total {}\n\
         archive_rejected_filters_total {}\n\
         archive_txn_retries_total {}\n",
        m.queries_total.load(Ordering::Relaxed),
        m.writes_total.load(Ordering::Relaxed),
        m.rejected_filters_total.load(Ordering::Relaxed),
        m.txn_retries_total.load(Ordering::Relaxed),
    )
}
