//! Common test fixtures for route-bench tests.
//!
//! Coordinates here are "lon;lat" tokens around Paris, which is what a real
//! coordinate file for the engine usually looks like.

use std::io::Write;

use routing_client::{Coordinate, QueryResult};
use tempfile::NamedTempFile;

/// A handful of realistic coordinate tokens.
pub const PARIS_COORDS: [&str; 4] = [
    "2.37715;48.84680",
    "2.29450;48.85837",
    "2.35222;48.85661",
    "2.33969;48.86064",
];

/// Build coordinates from string literals.
///
/// # Panics
///
/// Panics if any token is blank; fixtures are supposed to be valid.
pub fn coords(tokens: &[&str]) -> Vec<Coordinate> {
    tokens
        .iter()
        .map(|t| Coordinate::new(*t).expect("fixture coordinate must not be blank"))
        .collect()
}

/// The [`PARIS_COORDS`] as coordinates.
pub fn paris() -> Vec<Coordinate> {
    coords(&PARIS_COORDS)
}

/// Write `lines` to a temporary coordinate file, one per line.
///
/// The file is removed when the returned handle is dropped.
pub fn coordinate_file(lines: &[&str]) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("coords_")
        .suffix(".txt")
        .tempfile()
        .expect("Failed to create temporary coordinate file");
    for line in lines {
        writeln!(file, "{}", line).expect("Failed to write coordinate file");
    }
    file.flush().expect("Failed to flush coordinate file");
    file
}

/// A minimal direct path answer carrying the given duration.
pub fn journey_result(duration: u64) -> QueryResult {
    QueryResult::new(serde_json::json!({
        "response_type": "ITINERARY_FOUND",
        "journeys": [{
            "duration": duration,
            "nb_transfers": 0,
            "sections": [{"type": "STREET_NETWORK", "duration": duration}]
        }]
    }))
}

/// A minimal matrix answer with one row.
pub fn matrix_result(durations: &[i64]) -> QueryResult {
    let routing_response: Vec<_> = durations
        .iter()
        .map(|d| {
            let status = if *d < 0 { "unreached" } else { "reached" };
            serde_json::json!({"duration": d, "routing_status": status})
        })
        .collect();
    QueryResult::new(serde_json::json!({
        "sn_routing_matrix": {"rows": [{"routing_response": routing_response}]}
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_file_contents() {
        let file = coordinate_file(&["A", "  B  ", "", "C"]);
        let content = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(content, "A\n  B  \n\nC\n");
    }

    #[test]
    fn test_paris_has_four_coordinates() {
        assert_eq!(paris().len(), 4);
    }

    #[test]
    fn test_matrix_result_marks_unreached() {
        let result = matrix_result(&[0, -1]);
        let row = &result.as_json()["sn_routing_matrix"]["rows"][0]["routing_response"];
        assert_eq!(row[1]["routing_status"], "unreached");
    }
}
