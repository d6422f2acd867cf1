//! Protocol vocabulary shared by requests and callers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque location token, passed verbatim to the engine.
///
/// The engine decides what the token means ("lon;lat", a stop area id, ...).
/// The only local guarantee is that it is never blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coordinate(String);

impl Coordinate {
    /// Wrap a token, returning `None` when it is empty or only whitespace.
    ///
    /// The token is kept exactly as given; callers that want trimming do it
    /// before calling this.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Coordinate {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Street network mode used for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Walking,
    Car,
    Bike,
}

impl TravelMode {
    /// Every mode, in protocol order.
    pub const ALL: [TravelMode; 3] = [TravelMode::Walking, TravelMode::Car, TravelMode::Bike];

    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Walking => "walking",
            TravelMode::Car => "car",
            TravelMode::Bike => "bike",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A response from the engine.
///
/// Callers serialize it and otherwise leave it alone, so it stays an
/// untyped JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryResult(serde_json::Value);

impl QueryResult {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_json(self) -> serde_json::Value {
        self.0
    }
}

impl From<serde_json::Value> for QueryResult {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_rejects_blank() {
        assert!(Coordinate::new("").is_none());
        assert!(Coordinate::new("   \t").is_none());
    }

    #[test]
    fn test_coordinate_keeps_token_verbatim() {
        let coord = Coordinate::new(" 2.37;48.84").unwrap();
        assert_eq!(coord.as_str(), " 2.37;48.84");
    }

    #[test]
    fn test_travel_mode_serializes_lowercase() {
        let json = serde_json::to_string(&TravelMode::ALL).unwrap();
        assert_eq!(json, r#"["walking","car","bike"]"#);
    }
}
