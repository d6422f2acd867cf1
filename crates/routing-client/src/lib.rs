//! Client side of the routing engine protocol.
//!
//! This crate provides:
//! - The shared vocabulary of the protocol ([`Coordinate`], [`TravelMode`])
//! - Request payloads for direct path and street network matrix queries
//! - The [`RoutingClient`] seam and a TCP implementation of it

pub mod client;
pub mod error;
pub mod request;
pub mod target;
pub mod types;

pub use client::{RoutingClient, TcpRoutingClient};
pub use error::{RoutingError, RoutingResult};
pub use request::{DirectPathRequest, MatrixRequest, RoutingRequest};
pub use target::Target;
pub use types::{Coordinate, QueryResult, TravelMode};
