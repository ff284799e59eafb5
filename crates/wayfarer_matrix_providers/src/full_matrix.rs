use std::time::Instant;

use tracing::{debug, info, warn};

use crate::{
    cache::MatrixCache,
    distance_matrix::DistanceMatrix,
    error::MatrixError,
    routing_api::{MATRIX_API_PATH, MatrixRequestBody, MatrixResponse},
    routing_client::RoutingClient,
    tiles::{Tile, plan_tiles, scatter_tile, tile_count},
    waypoint::{RoutingProfile, Waypoint},
};

impl<C> RoutingClient<C>
where
    C: MatrixCache,
{
    /// Road distances between every ordered pair of `waypoints`.
    pub async fn build_full_matrix(
        &self,
        waypoints: &[Waypoint],
        profile: RoutingProfile,
    ) -> Result<DistanceMatrix, MatrixError> {
        self.build_full_matrix_with_progress(waypoints, profile, |_, _| {})
            .await
    }

    /// Same as [`RoutingClient::build_full_matrix`], calling `on_progress(completed, total)`
    /// after every request.
    ///
    /// Up to the location limit a single request covers the whole matrix. Above
    /// it the matrix is swept tile by tile, `ceil(n / limit)²` requests in total.
    pub async fn build_full_matrix_with_progress<F>(
        &self,
        waypoints: &[Waypoint],
        profile: RoutingProfile,
        mut on_progress: F,
    ) -> Result<DistanceMatrix, MatrixError>
    where
        F: FnMut(usize, usize),
    {
        let mut matrix = DistanceMatrix::for_waypoints(waypoints)?;

        if waypoints.is_empty() {
            return Ok(matrix);
        }

        let cached = match self.cache.get_cached(waypoints, profile) {
            Ok(cached) => cached,
            Err(error) => {
                warn!("RoutingClient: ignoring unreadable cached matrix: {}", error);
                None
            }
        };

        if let Some(cached) = cached.filter(|cached| cached.matches_waypoints(waypoints)) {
            debug!("RoutingClient: matrix for {} waypoints found in cache", waypoints.len());
            return Ok(cached);
        }

        let started = Instant::now();
        let limits = self.limits();
        let url = self.params.url(MATRIX_API_PATH, profile);

        if waypoints.len() <= limits.location_limit() {
            let body = MatrixRequestBody::distances(
                waypoints.iter().map(|waypoint| waypoint.coords).collect(),
                None,
                None,
            );

            let response: MatrixResponse = self.post(&url, &body).await?;
            scatter_tile(&mut matrix, &Tile::whole(waypoints), response.distances)?;
            on_progress(1, 1);
        } else {
            let total = tile_count(waypoints.len(), limits.tile_size());

            for (completed, tile) in plan_tiles(waypoints, limits.tile_size()).enumerate() {
                debug!(
                    "RoutingClient: matrix tile {}/{} (sources {}..{}, destinations {}..{})",
                    completed + 1,
                    total,
                    tile.source_offset,
                    tile.source_offset + tile.sources.len(),
                    tile.destination_offset,
                    tile.destination_offset + tile.destinations.len(),
                );

                let response: MatrixResponse = self.post(&url, &tile.request_body()).await?;
                scatter_tile(&mut matrix, &tile, response.distances)?;
                on_progress(completed + 1, total);
            }
        }

        info!(
            "RoutingClient: built {}x{} {} matrix in {:?}",
            waypoints.len(),
            waypoints.len(),
            profile,
            started.elapsed()
        );

        if let Err(error) = self.cache.cache(waypoints, profile, &matrix) {
            warn!("RoutingClient: failed to cache matrix: {}", error);
        }

        Ok(matrix)
    }
}
