//! Error types for routing engine requests.

use std::time::Duration;
use thiserror::Error;

/// Result type alias using RoutingError.
pub type RoutingResult<T> = Result<T, RoutingError>;

/// Failure of a single request to the routing engine.
#[derive(Debug, Error)]
pub enum RoutingError {
    // === Configuration Errors ===
    #[error("Invalid routing target '{target}': {message}")]
    InvalidTarget { target: String, message: String },

    // === Transport Errors ===
    #[error("Transport error talking to {target}: {source}")]
    Transport {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Request to {target} timed out after {timeout:?}")]
    Timeout { target: String, timeout: Duration },

    #[error("Malformed response from {target}: {message}")]
    Protocol { target: String, message: String },

    // === Engine Errors ===
    #[error("Routing engine reported an error: {0}")]
    Engine(String),
}

impl RoutingError {
    /// Whether a benchmark can keep going after this error.
    ///
    /// Only a bad target is permanent; everything else is scoped to the
    /// request that produced it.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, RoutingError::InvalidTarget { .. })
    }

    /// Short machine-friendly label, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            RoutingError::InvalidTarget { .. } => "invalid_target",
            RoutingError::Transport { .. } => "transport",
            RoutingError::Timeout { .. } => "timeout",
            RoutingError::Protocol { .. } => "protocol",
            RoutingError::Engine(_) => "engine",
        }
    }
}
