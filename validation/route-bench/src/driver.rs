//! Benchmark orchestration: run once, or run concurrently until a deadline.

use async_trait::async_trait;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::BenchmarkConfig;

/// One iteration of benchmark work.
///
/// Implementations handle their own failures: `run_once` has no error to
/// return, so a bad iteration can never stop a worker loop.
#[async_trait]
pub trait UnitOfWork: Send + 'static {
    async fn run_once(&mut self);
}

/// Adapter turning a closure that returns a future into a [`UnitOfWork`].
pub struct FnUnit<F>(F);

/// Wrap a closure as a unit of work.
pub fn from_fn<F, Fut>(f: F) -> FnUnit<F>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    FnUnit(f)
}

#[async_trait]
impl<F, Fut> UnitOfWork for FnUnit<F>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn run_once(&mut self) {
        (self.0)().await
    }
}

/// Runs units of work according to a [`BenchmarkConfig`].
pub struct BenchmarkDriver {
    config: BenchmarkConfig,
}

impl BenchmarkDriver {
    pub fn new(config: BenchmarkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// Run the benchmark and return the wall-clock time it took.
    ///
    /// `make_worker` is called with the worker index to build each worker's
    /// unit of work.
    ///
    /// With a zero duration a single unit is built and run once, to
    /// completion. Otherwise `concurrency` workers are spawned, each looping
    /// on its unit with no pause, and this call returns once the duration has
    /// elapsed. Workers are neither joined nor cancelled: they keep running
    /// until the runtime shuts down, and requests in flight at the deadline
    /// end on their own timeout.
    pub async fn run<W, F>(&self, mut make_worker: F) -> Duration
    where
        W: UnitOfWork,
        F: FnMut(usize) -> W,
    {
        let start = Instant::now();

        if self.config.is_single_shot() {
            let mut unit = make_worker(0);
            unit.run_once().await;
            return start.elapsed();
        }

        info!(
            duration = %humantime::format_duration(self.config.duration),
            concurrency = self.config.concurrency,
            "Starting benchmark"
        );

        for id in 0..self.config.concurrency {
            let mut unit = make_worker(id);
            // Detached on purpose; see the method docs.
            tokio::spawn(async move {
                debug!(worker = id, "Worker started");
                loop {
                    unit.run_once().await;
                    // Keeps the deadline timer schedulable when iterations
                    // complete without ever suspending.
                    tokio::task::yield_now().await;
                }
            });
        }

        tokio::time::sleep(self.config.duration).await;

        let elapsed = start.elapsed();
        info!(elapsed_ms = elapsed.as_millis() as u64, "Benchmark deadline reached");
        elapsed
    }
}
