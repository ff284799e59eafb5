use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use wayfarer_matrix_providers::waypoint::{RoutingProfile, Waypoint};

/// An itinerary as read by every subcommand.
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryInput {
    #[serde(default)]
    pub profile: RoutingProfile,

    /// Stops in their current visiting order
    pub waypoints: Vec<Waypoint>,

    /// Total distance of the current order, absent for a new itinerary
    #[serde(default)]
    pub baseline_distance: Option<f64>,
}
