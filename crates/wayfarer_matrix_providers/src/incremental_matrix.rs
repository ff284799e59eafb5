use tracing::{debug, info};

use crate::{
    cache::MatrixCache,
    distance_matrix::{IncrementalResult, ensure_unique_ids},
    error::MatrixError,
    routing_api::{MATRIX_API_PATH, MatrixRequestBody, MatrixResponse},
    routing_client::RoutingClient,
    waypoint::{RoutingProfile, Waypoint},
};

impl<C> RoutingClient<C>
where
    C: MatrixCache,
{
    /// Distances between `new_waypoint` and every waypoint of `existing`, in both
    /// directions, without recomputing the rest of the matrix.
    pub async fn build_incremental_matrix(
        &self,
        new_waypoint: &Waypoint,
        existing: &[Waypoint],
        profile: RoutingProfile,
    ) -> Result<IncrementalResult, MatrixError> {
        self.build_incremental_matrix_with_progress(new_waypoint, existing, profile, |_, _| {})
            .await
    }

    /// Existing waypoints are sent in chunks that leave one slot for the new
    /// waypoint, so `m` existing waypoints cost `ceil(m / (limit - 1))` requests.
    /// An existing waypoint with the id of the new one is skipped.
    pub async fn build_incremental_matrix_with_progress<F>(
        &self,
        new_waypoint: &Waypoint,
        existing: &[Waypoint],
        profile: RoutingProfile,
        mut on_progress: F,
    ) -> Result<IncrementalResult, MatrixError>
    where
        F: FnMut(usize, usize),
    {
        let others = existing
            .iter()
            .filter(|waypoint| waypoint.id != new_waypoint.id)
            .collect::<Vec<_>>();
        ensure_unique_ids(others.iter().copied())?;

        let mut result = IncrementalResult::new(new_waypoint.id.clone());
        if others.is_empty() {
            return Ok(result);
        }

        let chunk_size = self.limits().incremental_chunk_size();
        let total = others.len().div_ceil(chunk_size);
        let url = self.params.url(MATRIX_API_PATH, profile);

        for (completed, chunk) in others.chunks(chunk_size).enumerate() {
            debug!(
                "RoutingClient: incremental chunk {}/{} for waypoint {}",
                completed + 1,
                total,
                new_waypoint.id
            );

            let mut locations = Vec::with_capacity(chunk.len() + 1);
            locations.push(new_waypoint.coords);
            locations.extend(chunk.iter().map(|waypoint| waypoint.coords));

            let indices = (0..locations.len()).collect::<Vec<_>>();
            let body = MatrixRequestBody::distances(locations, Some(indices.clone()), Some(indices));

            let response: MatrixResponse = self.post(&url, &body).await?;
            collect_chunk(&mut result, new_waypoint, chunk, response.distances)?;
            on_progress(completed + 1, total);
        }

        info!(
            "RoutingClient: computed distances between {} and {} waypoints",
            new_waypoint.id,
            others.len()
        );

        Ok(result)
    }
}

/// Reads row 0 (new -> chunk) and column 0 (chunk -> new) of a `(k + 1)²` response.
fn collect_chunk(
    result: &mut IncrementalResult,
    new_waypoint: &Waypoint,
    chunk: &[&Waypoint],
    rows: Vec<Vec<Option<f64>>>,
) -> Result<(), MatrixError> {
    let size = chunk.len() + 1;
    if rows.len() != size || rows.iter().any(|row| row.len() != size) {
        return Err(MatrixError::MalformedResponse(format!(
            "expected a {size}x{size} matrix"
        )));
    }

    let missing = |from: &Waypoint, to: &Waypoint| MatrixError::MissingRoute {
        from: from.id.clone(),
        to: to.id.clone(),
    };

    for (position, &waypoint) in chunk.iter().enumerate() {
        let index = position + 1;

        let outbound = rows[0][index].ok_or_else(|| missing(new_waypoint, waypoint))?;
        let inbound = rows[index][0].ok_or_else(|| missing(waypoint, new_waypoint))?;

        result.outbound.insert(waypoint.id.clone(), outbound);
        result.inbound.insert(waypoint.id.clone(), inbound);
    }

    Ok(())
}
