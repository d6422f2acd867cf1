//! In-memory RoutingClient with scripted answers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use routing_client::{QueryResult, RoutingClient, RoutingError, RoutingRequest, RoutingResult};

type Responder = dyn Fn(usize, &RoutingRequest) -> RoutingResult<QueryResult> + Send + Sync;

/// A RoutingClient whose answers come from a closure.
///
/// The closure receives the zero-based call index and the request. Every
/// request is recorded so tests can inspect what was sent, and the number of
/// concurrently running calls is tracked.
pub struct MockRoutingClient {
    responder: Box<Responder>,
    latency: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    requests: Mutex<Vec<RoutingRequest>>,
}

impl MockRoutingClient {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(usize, &RoutingRequest) -> RoutingResult<QueryResult> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            latency: Duration::ZERO,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with `result`.
    pub fn returning(result: QueryResult) -> Self {
        Self::new(move |_, _| Ok(result.clone()))
    }

    /// Always fail with an engine error.
    pub fn failing(message: &str) -> Self {
        let message = message.to_string();
        Self::new(move |_, _| Err(RoutingError::Engine(message.clone())))
    }

    /// Sleep this long inside every call before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of calls observed running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Copy of every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<RoutingRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RoutingClient for MockRoutingClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn request(&self, request: &RoutingRequest) -> RoutingResult<QueryResult> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if self.latency.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.latency).await;
        }

        let answer = (self.responder)(index, request);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        answer
    }
}
