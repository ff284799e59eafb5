use serde_json::json;
use wiremock::{
    Mock, MockServer, Request, ResponseTemplate,
    matchers::{header, method, path},
};

use crate::{
    config::{DEFAULT_LOCATION_LIMIT, RoutingClientParams},
    routing_client::RoutingClient,
    waypoint::{LonLat, Waypoint},
};

pub const TEST_API_KEY: &str = "test-api-key";

const LINE_ORIGIN_LON: f64 = 13.0;
const LINE_STEP: f64 = 0.001;
const LINE_LAT: f64 = 52.0;
const ISLAND_LAT: f64 = 60.0;

/// `w0`, `w1`, ... spaced along a parallel, so the fake service can recover their position.
pub fn waypoint_line(len: usize) -> Vec<Waypoint> {
    (0..len)
        .map(|i| Waypoint::new(format!("w{i}"), LINE_ORIGIN_LON + i as f64 * LINE_STEP, LINE_LAT))
        .collect()
}

/// A waypoint the fake service cannot route to or from.
pub fn island(id: &str) -> Waypoint {
    Waypoint::new(id, LINE_ORIGIN_LON, ISLAND_LAT + 5.0)
}

/// Distance the fake service reports between two positions of [`waypoint_line`].
/// Going backwards costs one extra meter so that direction matters.
pub fn expected_distance(from: usize, to: usize) -> f64 {
    let penalty = if from > to { 1.0 } else { 0.0 };
    100.0 * from.abs_diff(to) as f64 + penalty
}

fn fake_distance(from: LonLat, to: LonLat) -> Option<f64> {
    if from[1] >= ISLAND_LAT || to[1] >= ISLAND_LAT {
        return None;
    }

    let position = |location: LonLat| ((location[0] - LINE_ORIGIN_LON) / LINE_STEP).round() as usize;
    Some(expected_distance(position(from), position(to)))
}

/// Answers like the matrix endpoint, rejecting more than the location limit per axis.
pub fn respond_with_fake_matrix(request: &Request) -> ResponseTemplate {
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    let locations: Vec<LonLat> = serde_json::from_value(body["locations"].clone()).unwrap();

    let indices = |key: &str| -> Vec<usize> {
        match body.get(key) {
            Some(value) => serde_json::from_value(value.clone()).unwrap(),
            None => (0..locations.len()).collect(),
        }
    };
    let sources = indices("sources");
    let destinations = indices("destinations");

    if sources.len() > DEFAULT_LOCATION_LIMIT || destinations.len() > DEFAULT_LOCATION_LIMIT {
        return ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 6004, "message": "Request parameters exceed the server configuration limits." }
        }));
    }

    let distances = sources
        .iter()
        .map(|&source| {
            destinations
                .iter()
                .map(|&destination| fake_distance(locations[source], locations[destination]))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    ResponseTemplate::new(200).set_body_json(json!({ "distances": distances }))
}

pub async fn mount_fake_matrix(server: &MockServer, profile: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(format!("/v2/matrix/{profile}")))
        .and(header("Authorization", TEST_API_KEY))
        .respond_with(respond_with_fake_matrix)
        .expect(expected_calls)
        .mount(server)
        .await;
}

pub fn test_client(server: &MockServer) -> RoutingClient {
    RoutingClient::new(RoutingClientParams::new(server.uri(), TEST_API_KEY)).unwrap()
}
