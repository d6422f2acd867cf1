//! Benchmark counters and the end-of-run summary.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Counters shared by all workers of a run.
///
/// Plain atomics; workers never wait on each other to record an outcome.
#[derive(Debug, Default)]
pub struct BenchStats {
    successes: AtomicU64,
    failures: AtomicU64,
    render_failures: AtomicU64,
    latency_total_us: AtomicU64,
    latency_max_us: AtomicU64,
}

impl BenchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request that returned a result.
    pub fn record_success(&self, latency: Duration) {
        let latency_us = latency.as_micros() as u64;
        self.successes.fetch_add(1, Ordering::Relaxed);
        self.latency_total_us.fetch_add(latency_us, Ordering::Relaxed);
        self.latency_max_us.fetch_max(latency_us, Ordering::Relaxed);
    }

    /// Record an iteration that produced no result.
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a result that could not be written out.
    pub fn record_render_failure(&self) {
        self.render_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn successes(&self) -> u64 {
        self.successes.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Snapshot the counters into a summary.
    ///
    /// Workers may still be running; the snapshot is whatever had completed
    /// when it was taken.
    pub fn summary(&self, context: SummaryContext, elapsed: Duration) -> BenchSummary {
        let successful = self.successes();
        let failed = self.failures();
        let total = successful + failed;
        let duration_secs = elapsed.as_secs_f64();

        let requests_per_second = if duration_secs > 0.0 {
            total as f64 / duration_secs
        } else {
            0.0
        };
        let latency_avg_ms = if successful > 0 {
            self.latency_total_us.load(Ordering::Relaxed) as f64 / successful as f64 / 1000.0
        } else {
            0.0
        };

        BenchSummary {
            timestamp: chrono::Utc::now().to_rfc3339(),
            query: context.query,
            target: context.target,
            concurrency: context.concurrency,
            seed: context.seed,
            duration_secs,
            total_requests: total,
            successful_requests: successful,
            failed_requests: failed,
            render_failures: self.render_failures.load(Ordering::Relaxed),
            requests_per_second,
            latency_avg_ms,
            latency_max_ms: self.latency_max_us.load(Ordering::Relaxed) as f64 / 1000.0,
        }
    }
}

/// Run parameters echoed into the summary.
#[derive(Debug, Clone)]
pub struct SummaryContext {
    pub query: String,
    pub target: String,
    pub concurrency: usize,
    pub seed: u64,
}

/// Outcome of a sustained run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchSummary {
    pub timestamp: String,
    pub query: String,
    pub target: String,
    pub concurrency: usize,
    pub seed: u64,
    pub duration_secs: f64,
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub render_failures: u64,
    pub requests_per_second: f64,
    pub latency_avg_ms: f64,
    pub latency_max_ms: f64,
}

impl BenchSummary {
    /// Share of requests that returned a result, in percent.
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.successful_requests as f64 / self.total_requests as f64 * 100.0
        }
    }
}
