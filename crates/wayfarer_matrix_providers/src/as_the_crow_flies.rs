use crate::{
    distance_matrix::DistanceMatrix, error::MatrixError, geometry::haversine_distance,
    waypoint::Waypoint,
};

/// Straight-line distance matrix, for offline runs when the routing service is
/// not reachable. These are not road distances.
pub fn as_the_crow_flies_matrix(waypoints: &[Waypoint]) -> Result<DistanceMatrix, MatrixError> {
    let mut matrix = DistanceMatrix::for_waypoints(waypoints)?;

    for (i, from) in waypoints.iter().enumerate() {
        for (j, to) in waypoints.iter().enumerate() {
            if i != j {
                matrix.set(i, j, haversine_distance(from, to));
            }
        }
    }

    Ok(matrix)
}
