//! Shared test utilities for the route-bench workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Coordinate fixtures and temporary coordinate files
//! - A scripted in-memory [`MockRoutingClient`]
//! - An [`EngineStub`] that answers the TCP protocol on a local port
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../../crates/test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{coordinate_file, MockRoutingClient};
//! ```

pub mod engine_stub;
pub mod fixtures;
pub mod mock_client;

// Re-export commonly used items at the crate root
pub use engine_stub::EngineStub;
pub use fixtures::*;
pub use mock_client::MockRoutingClient;
