//! Performance telemetry — the pipeline reports `(operation, millis)` for
//! every remote call and every stage to a `PerfSink`. Storage and reporting
//! beyond the in-memory snapshot live outside this crate.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Receiver for per-operation timing events.
///
/// Implementations must be cheap: callers record on the hot path and do not
/// tolerate blocking beyond a mutex acquisition.
pub trait PerfSink: Send + Sync {
    fn record(&self, operation: &str, millis: u64);
}

/// Sink that discards all events.
pub struct NoopSink;

impl PerfSink for NoopSink {
    fn record(&self, _operation: &str, _millis: u64) {}
}

/// Per-operation aggregate: call count, total and worst-case duration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpStats {
    pub calls: u64,
    pub total_millis: u64,
    pub max_millis: u64,
}

impl OpStats {
    pub fn avg_millis(&self) -> u64 {
        if self.calls == 0 {
            0
        } else {
            self.total_millis / self.calls
        }
    }
}

/// In-memory recorder keyed by logical operation name.
#[derive(Default)]
pub struct PerfRecorder {
    ops: Mutex<HashMap<String, OpStats>>,
}

impl PerfRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all aggregates recorded so far.
    pub fn snapshot(&self) -> HashMap<String, OpStats> {
        self.ops.lock().expect("perf recorder lock poisoned").clone()
    }
}

impl PerfSink for PerfRecorder {
    fn record(&self, operation: &str, millis: u64) {
        let mut ops = self.ops.lock().expect("perf recorder lock poisoned");
        let stats = ops.entry(operation.to_string()).or_default();
        stats.calls += 1;
        stats.total_millis += millis;
        stats.max_millis = stats.max_millis.max(millis);
    }
}

/// Initializes the tracing subscriber. `RUST_LOG` wins over the configured
/// default level. Safe to call once per process.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("scout={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_aggregates_by_operation() {
        let recorder = PerfRecorder::new();
        recorder.record("github_search", 120);
        recorder.record("github_search", 80);
        recorder.record("github_profile", 40);

        let snapshot = recorder.snapshot();
        let search = &snapshot["github_search"];
        assert_eq!(search.calls, 2);
        assert_eq!(search.total_millis, 200);
        assert_eq!(search.max_millis, 120);
        assert_eq!(search.avg_millis(), 100);
        assert_eq!(snapshot["github_profile"].calls, 1);
    }

    #[test]
    fn test_empty_recorder_snapshot() {
        let recorder = PerfRecorder::new();
        assert!(recorder.snapshot().is_empty());
    }

    #[test]
    fn test_noop_sink_accepts_events() {
        NoopSink.record("anything", 1);
    }
}
