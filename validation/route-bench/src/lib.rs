//! Query and benchmark harness for the journey-planning routing engine.
//!
//! This crate provides tools to:
//! - Load coordinate sets from files or the command line
//! - Sample random direct path and matrix queries from them
//! - Run a query once, or hammer the engine with concurrent workers for a fixed duration
//! - Render results as indented JSON and summarize a benchmark run

pub mod config;
pub mod coords;
pub mod driver;
pub mod error;
pub mod metrics;
pub mod query;
pub mod render;
pub mod report;
pub mod sampler;
pub mod worker;

pub use config::{BenchmarkConfig, Overrides, RunSettings, Scenario};
pub use coords::{CoordinateSet, CoordinateSource};
pub use driver::{from_fn, BenchmarkDriver, UnitOfWork};
pub use error::{BenchError, BenchResult};
pub use metrics::{BenchStats, BenchSummary};
pub use query::{DirectPathQuery, MatrixQuery, Query, QueryKind, DEFAULT_MAX_DURATION_SECS};
pub use render::{RenderMode, ResultRenderer};
pub use report::{ReportFormat, ResultsReport};
pub use sampler::Sampler;
pub use worker::{QueryWorker, WorkerContext};
