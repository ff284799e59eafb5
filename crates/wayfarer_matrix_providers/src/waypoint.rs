use std::{fmt::Display, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `[longitude, latitude]`, the coordinate order used by the routing service.
pub type LonLat = [f64; 2];

/// A stop of an itinerary, identified by a caller-assigned id.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct Waypoint {
    /// Unique within a single request
    pub id: String,
    pub coords: LonLat,
}

impl Waypoint {
    pub fn new(id: impl Into<String>, lon: f64, lat: f64) -> Self {
        Self {
            id: id.into(),
            coords: [lon, lat],
        }
    }

    pub fn lon(&self) -> f64 {
        self.coords[0]
    }

    pub fn lat(&self) -> f64 {
        self.coords[1]
    }
}

impl From<&Waypoint> for geo_types::Point {
    fn from(waypoint: &Waypoint) -> Self {
        geo_types::Point::new(waypoint.lon(), waypoint.lat())
    }
}

/// https://openrouteservice.org/dev/#/api-docs/v2/matrix/{profile}/post
#[derive(Debug, Deserialize, Serialize, JsonSchema, Copy, Clone, Hash, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingProfile {
    #[default]
    DrivingCar,
    DrivingHgv,
    CyclingRegular,
    CyclingRoad,
    CyclingMountain,
    CyclingElectric,
    FootWalking,
    FootHiking,
    Wheelchair,
}

impl RoutingProfile {
    pub const ALL: [RoutingProfile; 9] = [
        RoutingProfile::DrivingCar,
        RoutingProfile::DrivingHgv,
        RoutingProfile::CyclingRegular,
        RoutingProfile::CyclingRoad,
        RoutingProfile::CyclingMountain,
        RoutingProfile::CyclingElectric,
        RoutingProfile::FootWalking,
        RoutingProfile::FootHiking,
        RoutingProfile::Wheelchair,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingProfile::DrivingCar => "driving-car",
            RoutingProfile::DrivingHgv => "driving-hgv",
            RoutingProfile::CyclingRegular => "cycling-regular",
            RoutingProfile::CyclingRoad => "cycling-road",
            RoutingProfile::CyclingMountain => "cycling-mountain",
            RoutingProfile::CyclingElectric => "cycling-electric",
            RoutingProfile::FootWalking => "foot-walking",
            RoutingProfile::FootHiking => "foot-hiking",
            RoutingProfile::Wheelchair => "wheelchair",
        }
    }
}

impl Display for RoutingProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RoutingProfile {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        RoutingProfile::ALL
            .into_iter()
            .find(|profile| profile.as_str() == value)
            .ok_or_else(|| format!("Unknown routing profile: {value}"))
    }
}
