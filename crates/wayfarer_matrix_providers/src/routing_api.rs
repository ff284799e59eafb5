use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::waypoint::LonLat;

pub const MATRIX_API_PATH: &str = "/v2/matrix";
pub const SNAP_API_PATH: &str = "/v2/snap";

#[derive(Debug, Clone, Serialize)]
pub struct MatrixRequestBody {
    pub locations: Vec<LonLat>,

    /// Indices into `locations` used as rows, all locations when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<usize>>,

    /// Indices into `locations` used as columns, all locations when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destinations: Option<Vec<usize>>,

    /// Which matrices to return: "distance", "duration"
    pub metrics: Vec<String>,
}

impl MatrixRequestBody {
    pub fn distances(
        locations: Vec<LonLat>,
        sources: Option<Vec<usize>>,
        destinations: Option<Vec<usize>>,
    ) -> Self {
        Self {
            locations,
            sources,
            destinations,
            metrics: vec!["distance".to_string()],
        }
    }
}

/// Distances in meters, rows are sources and columns destinations.
/// `null` marks a pair without a route.
#[derive(Debug, Deserialize)]
pub(crate) struct MatrixResponse {
    pub distances: Vec<Vec<Option<f64>>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SnapRequestBody {
    pub locations: Vec<LonLat>,

    /// Search radius in meters
    pub radius: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SnapResponse {
    /// Same order as the request, `null` when no road is within the radius
    pub locations: Vec<Option<SnappedPoint>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SnappedPoint {
    pub location: LonLat,

    #[serde(default)]
    pub snapped_distance: Option<f64>,
}

/// Extracts the message of an `{ "error": ... }` payload, which the service sends
/// either as a plain string or as `{ "code": .., "message": .. }`.
pub(crate) fn error_message(payload: &Value) -> Option<String> {
    match payload.get("error")? {
        Value::Null => None,
        Value::String(message) => Some(message.clone()),
        Value::Object(error) => Some(
            error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_else(|| Value::Object(error.clone()).to_string()),
        ),
        other => Some(other.to_string()),
    }
}
