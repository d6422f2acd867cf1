//! The unit of work executed by benchmark workers.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

use routing_client::RoutingClient;
use tracing::{debug, error, warn};

use crate::coords::CoordinateSet;
use crate::driver::UnitOfWork;
use crate::error::BenchResult;
use crate::metrics::BenchStats;
use crate::query::{Query, QueryKind};
use crate::render::ResultRenderer;
use crate::sampler::Sampler;

/// Everything workers of one run share. All of it is read-only or atomic.
#[derive(Clone)]
pub struct WorkerContext {
    pub client: Arc<dyn RoutingClient>,
    pub coords: Arc<CoordinateSet>,
    pub query: QueryKind,
    pub renderer: ResultRenderer,
    pub stats: Arc<BenchStats>,
}

/// Samples a query, sends it, renders the answer. One per worker.
pub struct QueryWorker {
    id: usize,
    context: WorkerContext,
    sampler: Sampler,
}

impl QueryWorker {
    pub fn new(id: usize, context: WorkerContext, sampler: Sampler) -> Self {
        Self {
            id,
            context,
            sampler,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    fn next_query(&mut self) -> BenchResult<Query> {
        let coords = &self.context.coords;
        match self.context.query {
            QueryKind::DirectPath => self.sampler.pick_direct_path(coords).map(Query::from),
            QueryKind::Matrix { max_duration } => self
                .sampler
                .pick_matrix_origin(coords)
                .map(|q| q.with_max_duration(max_duration).into()),
        }
    }

    fn heartbeat(&self) {
        if let Err(err) = self.context.renderer.heartbeat() {
            self.context.stats.record_render_failure();
            warn!(worker = self.id, error = %err, "Failed to write progress marker");
        }
    }
}

#[async_trait]
impl UnitOfWork for QueryWorker {
    async fn run_once(&mut self) {
        let query = match self.next_query() {
            Ok(query) => query,
            Err(err) => {
                self.context.stats.record_failure();
                error!(worker = self.id, error = %err, "Failed to build query");
                self.heartbeat();
                return;
            }
        };

        let start = Instant::now();
        let outcome = query.get(self.context.client.as_ref()).await;
        let latency = start.elapsed();

        match outcome {
            Ok(result) => {
                self.context.stats.record_success(latency);
                debug!(
                    worker = self.id,
                    query = %self.context.query,
                    mode = %query.mode(),
                    latency_ms = latency.as_millis() as u64,
                    "Query succeeded"
                );
                if let Err(err) = self.context.renderer.emit(&result) {
                    self.context.stats.record_render_failure();
                    warn!(worker = self.id, error = %err, "Failed to render result");
                }
            }
            Err(err) => {
                self.context.stats.record_failure();
                error!(
                    worker = self.id,
                    query = %self.context.query,
                    mode = %query.mode(),
                    kind = err.kind(),
                    error = %err,
                    "Query failed"
                );
                self.heartbeat();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderMode;
    use routing_client::{RoutingError, RoutingRequest};
    use test_utils::{journey_result, paris, MockRoutingClient};

    fn context(
        client: MockRoutingClient,
        query: QueryKind,
        quiet: bool,
    ) -> (WorkerContext, Arc<MockRoutingClient>, Arc<std::sync::Mutex<Vec<u8>>>) {
        let client = Arc::new(client);
        let (renderer, buffer) = ResultRenderer::buffered(quiet, RenderMode::SingleShot);
        let context = WorkerContext {
            client: client.clone(),
            coords: Arc::new(CoordinateSet::new(paris())),
            query,
            renderer,
            stats: Arc::new(BenchStats::new()),
        };
        (context, client, buffer)
    }

    #[tokio::test]
    async fn test_direct_path_iteration_renders_result() {
        let (ctx, client, buffer) = context(
            MockRoutingClient::returning(journey_result(120)),
            QueryKind::DirectPath,
            false,
        );
        let mut worker = QueryWorker::new(0, ctx.clone(), Sampler::seeded(1));

        worker.run_once().await;

        let out = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(out.contains("\"duration\": 120"));
        assert_eq!(client.calls(), 1);
        assert_eq!(ctx.stats.successes(), 1);
    }

    #[tokio::test]
    async fn test_matrix_iteration_applies_max_duration() {
        let (ctx, client, _) = context(
            MockRoutingClient::returning(test_utils::matrix_result(&[0, 300, -1, 1200])),
            QueryKind::Matrix { max_duration: 900 },
            true,
        );
        let mut worker = QueryWorker::new(0, ctx, Sampler::seeded(2));

        worker.run_once().await;

        match &client.requests()[0] {
            RoutingRequest::StreetNetworkRoutingMatrix(r) => {
                assert_eq!(r.max_duration, 900);
                assert_eq!(r.origins.len(), 1);
                assert_eq!(r.destinations, paris());
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_iteration_is_counted_and_not_rendered() {
        let (ctx, _, buffer) = context(
            MockRoutingClient::new(|_, _| {
                Err(RoutingError::Engine("no solution".to_string()))
            }),
            QueryKind::DirectPath,
            false,
        );
        let mut worker = QueryWorker::new(0, ctx.clone(), Sampler::seeded(3));

        worker.run_once().await;
        worker.run_once().await;

        assert_eq!(ctx.stats.failures(), 2);
        assert_eq!(ctx.stats.successes(), 0);
        assert!(buffer.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_iterations_still_mark_progress() {
        let client = Arc::new(MockRoutingClient::failing("down"));
        let (renderer, buffer) = ResultRenderer::buffered(true, RenderMode::Sustained);
        let ctx = WorkerContext {
            client: client.clone(),
            coords: Arc::new(CoordinateSet::new(paris())),
            query: QueryKind::DirectPath,
            renderer,
            stats: Arc::new(BenchStats::new()),
        };
        let mut worker = QueryWorker::new(0, ctx.clone(), Sampler::seeded(6));

        for _ in 0..5 {
            worker.run_once().await;
        }

        assert_eq!(ctx.stats.failures(), 5);
        assert_eq!(buffer.lock().unwrap().as_slice(), b".....");

        // Build failures count as completed iterations too.
        let mut empty = ctx.clone();
        empty.coords = Arc::new(CoordinateSet::default());
        QueryWorker::new(1, empty, Sampler::seeded(7)).run_once().await;
        assert_eq!(buffer.lock().unwrap().len(), 6);
        assert_eq!(client.calls(), 5);
    }

    #[tokio::test]
    async fn test_empty_coordinates_fail_without_request() {
        let (mut ctx, client, _) = context(
            MockRoutingClient::returning(journey_result(1)),
            QueryKind::DirectPath,
            false,
        );
        ctx.coords = Arc::new(CoordinateSet::default());
        let mut worker = QueryWorker::new(0, ctx.clone(), Sampler::seeded(4));

        worker.run_once().await;

        assert_eq!(client.calls(), 0);
        assert_eq!(ctx.stats.failures(), 1);
    }
}
