//! Query builders for the two engine APIs exercised by route-bench.

use std::fmt;

use routing_client::{
    Coordinate, DirectPathRequest, MatrixRequest, QueryResult, RoutingClient, RoutingRequest,
    RoutingResult, TravelMode,
};

/// Default exploration cutoff for matrix queries: 30 minutes.
pub const DEFAULT_MAX_DURATION_SECS: u32 = 30 * 60;

/// A point-to-point street network query.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectPathQuery {
    pub from: Coordinate,
    pub to: Coordinate,
    pub mode: TravelMode,
}

impl DirectPathQuery {
    pub fn new(from: Coordinate, to: Coordinate, mode: TravelMode) -> Self {
        Self { from, to, mode }
    }

    pub fn to_request(&self) -> RoutingRequest {
        RoutingRequest::DirectPath(DirectPathRequest {
            origin: self.from.clone(),
            destination: self.to.clone(),
            mode: self.mode,
        })
    }

    /// One round-trip to the engine. Errors are returned untouched.
    pub async fn get(&self, client: &dyn RoutingClient) -> RoutingResult<QueryResult> {
        client.request(&self.to_request()).await
    }
}

/// A one-to-many street network query.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixQuery {
    /// Always a single origin; the engine computes one row.
    pub from: Vec<Coordinate>,
    pub to: Vec<Coordinate>,
    pub mode: TravelMode,
    /// Seconds from the origin beyond which the engine stops exploring.
    pub max_duration: u32,
}

impl MatrixQuery {
    pub fn new(from: Coordinate, to: Vec<Coordinate>, mode: TravelMode) -> Self {
        Self {
            from: vec![from],
            to,
            mode,
            max_duration: DEFAULT_MAX_DURATION_SECS,
        }
    }

    pub fn with_max_duration(mut self, max_duration: u32) -> Self {
        self.max_duration = max_duration;
        self
    }

    pub fn to_request(&self) -> RoutingRequest {
        RoutingRequest::StreetNetworkRoutingMatrix(MatrixRequest {
            origins: self.from.clone(),
            destinations: self.to.clone(),
            mode: self.mode,
            max_duration: self.max_duration,
        })
    }

    /// One round-trip to the engine. Errors are returned untouched.
    pub async fn get(&self, client: &dyn RoutingClient) -> RoutingResult<QueryResult> {
        client.request(&self.to_request()).await
    }
}

/// Either kind of query.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    DirectPath(DirectPathQuery),
    Matrix(MatrixQuery),
}

impl Query {
    pub async fn get(&self, client: &dyn RoutingClient) -> RoutingResult<QueryResult> {
        match self {
            Query::DirectPath(q) => q.get(client).await,
            Query::Matrix(q) => q.get(client).await,
        }
    }

    pub fn mode(&self) -> TravelMode {
        match self {
            Query::DirectPath(q) => q.mode,
            Query::Matrix(q) => q.mode,
        }
    }
}

impl From<DirectPathQuery> for Query {
    fn from(q: DirectPathQuery) -> Self {
        Query::DirectPath(q)
    }
}

impl From<MatrixQuery> for Query {
    fn from(q: MatrixQuery) -> Self {
        Query::Matrix(q)
    }
}

/// Which query a run issues, with its fixed parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    DirectPath,
    Matrix { max_duration: u32 },
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKind::DirectPath => f.write_str("directpath"),
            QueryKind::Matrix { .. } => f.write_str("matrix"),
        }
    }
}
