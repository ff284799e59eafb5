use std::time::Duration;

use thiserror::Error;

pub const ROUTING_API_KEY_ENV_VAR: &str = "WAYFARER_ROUTING_API_KEY";
pub const ROUTING_BASE_URL_ENV_VAR: &str = "WAYFARER_ROUTING_BASE_URL";
pub const ROUTING_TIMEOUT_ENV_VAR: &str = "WAYFARER_ROUTING_TIMEOUT_SECS";

pub const DEFAULT_ROUTING_BASE_URL: &str = "https://api.openrouteservice.org";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum number of locations the routing service accepts per call.
pub const DEFAULT_LOCATION_LIMIT: usize = 50;

/// Search radius used when checking that a single coordinate is on the road network.
pub const DEFAULT_SNAP_RADIUS_METERS: f64 = 1500.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    MissingVariable(&'static str),

    #[error("Invalid timeout {0}, expected a number of seconds")]
    InvalidTimeout(String),
}

/// Batch limits of the routing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixLimits {
    location_limit: usize,
}

impl MatrixLimits {
    /// `location_limit` is raised to 2 so an incremental chunk always holds a waypoint.
    pub fn new(location_limit: usize) -> Self {
        Self {
            location_limit: location_limit.max(2),
        }
    }

    pub fn location_limit(&self) -> usize {
        self.location_limit
    }

    /// Sources (and destinations) per tile of a tiled full matrix.
    pub fn tile_size(&self) -> usize {
        self.location_limit
    }

    /// Existing waypoints per incremental request, one slot goes to the new waypoint.
    pub fn incremental_chunk_size(&self) -> usize {
        self.location_limit - 1
    }
}

impl Default for MatrixLimits {
    fn default() -> Self {
        Self::new(DEFAULT_LOCATION_LIMIT)
    }
}

#[derive(Debug, Clone)]
pub struct RoutingClientParams {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub limits: MatrixLimits,
}

impl RoutingClientParams {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
            limits: MatrixLimits::default(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ROUTING_API_KEY_ENV_VAR)
            .ok_or(ConfigError::MissingVariable(ROUTING_API_KEY_ENV_VAR))?;
        let base_url =
            lookup(ROUTING_BASE_URL_ENV_VAR).unwrap_or_else(|| DEFAULT_ROUTING_BASE_URL.to_string());

        let timeout = match lookup(ROUTING_TIMEOUT_ENV_VAR) {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidTimeout(value))?,
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            timeout,
            ..Self::new(base_url, api_key)
        })
    }

    pub(crate) fn url(&self, api_path: &str, profile: impl std::fmt::Display) -> String {
        format!(
            "{}{}/{}",
            self.base_url.trim_end_matches('/'),
            api_path,
            profile
        )
    }
}
