use thiserror::Error;

/// Failure of a single call to the routing service.
#[derive(Debug, Error)]
pub enum RoutingApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Routing service error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Routing service error: {status} - {message}")]
    RemoteService { status: u16, message: String },

    #[error("No route from waypoint {from} to waypoint {to}")]
    MissingRoute { from: String, to: String },

    #[error("Malformed routing service response: {0}")]
    MalformedResponse(String),

    #[error("Waypoint id {0} is used more than once")]
    DuplicateWaypointId(String),

    #[error("Incremental result is missing distances for waypoint {missing}")]
    IncompleteIncrementalResult { missing: String },

    #[error("Invalid distance matrix: {0}")]
    InvalidMatrix(String),
}

impl From<RoutingApiError> for MatrixError {
    fn from(error: RoutingApiError) -> Self {
        match error {
            RoutingApiError::Request(error) => MatrixError::Request(error),
            RoutingApiError::Api { status, message } => {
                MatrixError::RemoteService { status, message }
            }
            RoutingApiError::Deserialize(error) => MatrixError::MalformedResponse(error.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum SnapError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Snap service error: {status} - {message}")]
    RemoteService { status: u16, message: String },

    #[error("No road found near waypoint {id}")]
    UnsnappableLocation { id: String },

    #[error("Malformed snap service response: {0}")]
    MalformedResponse(String),
}

impl From<RoutingApiError> for SnapError {
    fn from(error: RoutingApiError) -> Self {
        match error {
            RoutingApiError::Request(error) => SnapError::Request(error),
            RoutingApiError::Api { status, message } => SnapError::RemoteService { status, message },
            RoutingApiError::Deserialize(error) => SnapError::MalformedResponse(error.to_string()),
        }
    }
}
