//! Request payloads understood by the routing engine.

use serde::{Deserialize, Serialize};

use crate::types::{Coordinate, TravelMode};

/// Point-to-point street network request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectPathRequest {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub mode: TravelMode,
}

/// One-to-many street network request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixRequest {
    pub origins: Vec<Coordinate>,
    pub destinations: Vec<Coordinate>,
    pub mode: TravelMode,
    /// Exploration cutoff in seconds from the origin.
    pub max_duration: u32,
}

/// A request, tagged with the engine API it targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "api", rename_all = "snake_case")]
pub enum RoutingRequest {
    DirectPath(DirectPathRequest),
    StreetNetworkRoutingMatrix(MatrixRequest),
}

impl RoutingRequest {
    /// Name of the engine API, as sent on the wire.
    pub fn api(&self) -> &'static str {
        match self {
            RoutingRequest::DirectPath(_) => "direct_path",
            RoutingRequest::StreetNetworkRoutingMatrix(_) => "street_network_routing_matrix",
        }
    }

    pub fn mode(&self) -> TravelMode {
        match self {
            RoutingRequest::DirectPath(r) => r.mode,
            RoutingRequest::StreetNetworkRoutingMatrix(r) => r.mode,
        }
    }
}

/// What actually goes on the wire: the request plus who is asking.
#[derive(Debug, Serialize)]
pub(crate) struct Envelope<'a> {
    pub requester: &'a str,
    #[serde(flatten)]
    pub request: &'a RoutingRequest,
}
