use std::future::Future;

use wayfarer_matrix_providers::distance_matrix::DistanceMatrix;

use crate::itinerary::CandidateItinerary;

/// Orders the waypoints of a distance matrix. Implementations may be
/// non-deterministic, every call is an independent attempt.
pub trait ItinerarySolver {
    type Error;

    fn solve(
        &self,
        matrix: &DistanceMatrix,
    ) -> impl Future<Output = Result<CandidateItinerary, Self::Error>>;
}
