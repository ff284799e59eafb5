pub mod as_the_crow_flies;
pub mod cache;
pub mod config;
pub mod distance_matrix;
pub mod error;
mod full_matrix;
pub mod geometry;
mod incremental_matrix;
pub mod routing_api;
pub mod routing_client;
pub mod snap;
pub mod tiles;
pub mod waypoint;

#[cfg(test)]
pub(crate) mod test_utils;
