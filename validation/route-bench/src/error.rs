//! Error types for route-bench.

use std::path::PathBuf;

use routing_client::RoutingError;
use thiserror::Error;

/// Result type alias using BenchError.
pub type BenchResult<T> = Result<T, BenchError>;

#[derive(Debug, Error)]
pub enum BenchError {
    // === Configuration Errors (fatal) ===
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to read coordinate file {}: {source}", path.display())]
    CoordinateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scenario file {}: {message}", path.display())]
    Scenario { path: PathBuf, message: String },

    // === Per-iteration Errors (recoverable) ===
    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error("Failed to serialize result: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl BenchError {
    /// Whether this error must stop the process before (or instead of) a run.
    pub fn is_fatal(&self) -> bool {
        match self {
            BenchError::Configuration(_)
            | BenchError::CoordinateFile { .. }
            | BenchError::Scenario { .. } => true,
            BenchError::Routing(err) => !err.is_recoverable(),
            BenchError::Serialization(_) | BenchError::Output(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_configuration_errors_are_fatal() {
        assert!(BenchError::Configuration("empty".to_string()).is_fatal());
        assert!(BenchError::CoordinateFile {
            path: PathBuf::from("/nope"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }
        .is_fatal());
    }

    #[test]
    fn test_request_errors_are_recoverable() {
        let timeout = BenchError::from(RoutingError::Timeout {
            target: "tcp://127.0.0.1:6000".to_string(),
            timeout: Duration::from_secs(10),
        });
        assert!(!timeout.is_fatal());

        let bad_target = BenchError::from(RoutingError::InvalidTarget {
            target: "udp://x:1".to_string(),
            message: "unsupported scheme 'udp'".to_string(),
        });
        assert!(bad_target.is_fatal());
    }

    #[test]
    fn test_coordinate_file_message_names_path() {
        let err = BenchError::CoordinateFile {
            path: PathBuf::from("/data/coords.txt"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("/data/coords.txt"));
    }
}
