//! The routing client seam and its TCP implementation.

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::debug;

use crate::error::{RoutingError, RoutingResult};
use crate::request::{Envelope, RoutingRequest};
use crate::target::Target;
use crate::types::QueryResult;

/// Something that can answer routing requests.
///
/// Implementations own transport details (connections, framing, timeouts).
/// One call is one round-trip; no retries happen behind the caller's back.
#[async_trait]
pub trait RoutingClient: Send + Sync {
    /// Identifying name sent along with every request.
    fn name(&self) -> &str;

    /// Submit a request and wait for the engine's answer.
    async fn request(&self, request: &RoutingRequest) -> RoutingResult<QueryResult>;
}

/// Routing client speaking newline-delimited JSON over TCP.
///
/// Each request opens its own connection, writes one JSON line and reads one
/// JSON line back. Connect, write and read share a single deadline.
#[derive(Debug, Clone)]
pub struct TcpRoutingClient {
    name: String,
    target: Target,
    timeout: Duration,
}

impl TcpRoutingClient {
    /// Create a client for `target` (`tcp://host:port` or `host:port`).
    pub fn new(name: impl Into<String>, target: &str, timeout: Duration) -> RoutingResult<Self> {
        Ok(Self {
            name: name.into(),
            target: target.parse()?,
            timeout,
        })
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn transport_error(&self, source: std::io::Error) -> RoutingError {
        RoutingError::Transport {
            target: self.target.to_string(),
            source,
        }
    }

    fn protocol_error(&self, message: impl Into<String>) -> RoutingError {
        RoutingError::Protocol {
            target: self.target.to_string(),
            message: message.into(),
        }
    }

    async fn round_trip(&self, request: &RoutingRequest) -> RoutingResult<QueryResult> {
        let envelope = Envelope {
            requester: &self.name,
            request,
        };
        let mut payload = serde_json::to_vec(&envelope)
            .map_err(|e| self.protocol_error(format!("failed to encode request: {}", e)))?;
        payload.push(b'\n');

        let mut stream = TcpStream::connect(self.target.socket_addr())
            .await
            .map_err(|e| self.transport_error(e))?;
        stream.set_nodelay(true).ok();

        stream
            .write_all(&payload)
            .await
            .map_err(|e| self.transport_error(e))?;

        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        let read = reader
            .read_line(&mut line)
            .await
            .map_err(|e| self.transport_error(e))?;

        if read == 0 {
            return Err(self.protocol_error("connection closed before any response"));
        }

        self.parse_response(&line)
    }

    fn parse_response(&self, line: &str) -> RoutingResult<QueryResult> {
        let value: serde_json::Value = serde_json::from_str(line.trim())
            .map_err(|e| self.protocol_error(format!("invalid JSON: {}", e)))?;

        if !value.is_object() {
            return Err(self.protocol_error("expected a JSON object"));
        }

        if let Some(error) = value.get("error").filter(|e| !e.is_null()) {
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(RoutingError::Engine(message));
        }

        Ok(QueryResult::new(value))
    }
}

#[async_trait]
impl RoutingClient for TcpRoutingClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn request(&self, request: &RoutingRequest) -> RoutingResult<QueryResult> {
        let start = Instant::now();

        let result = match tokio::time::timeout(self.timeout, self.round_trip(request)).await {
            Ok(result) => result,
            Err(_) => Err(RoutingError::Timeout {
                target: self.target.to_string(),
                timeout: self.timeout,
            }),
        };

        debug!(
            api = request.api(),
            mode = %request.mode(),
            latency_us = start.elapsed().as_micros() as u64,
            ok = result.is_ok(),
            "Routing request finished"
        );

        result
    }
}
