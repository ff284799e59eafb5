use std::{
    future::Future,
    sync::atomic::{AtomicUsize, Ordering},
};

use wayfarer_matrix_providers::distance_matrix::{Distance, DistanceMatrix};

use crate::{itinerary::CandidateItinerary, solver::ItinerarySolver};

/// `n` waypoints `p0..pn` on a line, 10 apart.
pub fn line_matrix(n: usize) -> DistanceMatrix {
    matrix_on_line((0..n).map(|i| format!("p{i}")).collect())
}

/// `a`, `b`, `c` and `d` on a line, 10 apart.
pub fn square_matrix() -> DistanceMatrix {
    matrix_on_line(["a", "b", "c", "d"].map(String::from).to_vec())
}

fn matrix_on_line(ids: Vec<String>) -> DistanceMatrix {
    let n = ids.len();
    let rows = (0..n)
        .map(|from| {
            (0..n)
                .map(|to| 10.0 * from.abs_diff(to) as Distance)
                .collect()
        })
        .collect();

    DistanceMatrix::from_rows(ids, rows).unwrap()
}

/// Always answers with the same itinerary and distance, counting its calls.
pub struct FixedSolver {
    pub distance: Distance,
    pub calls: AtomicUsize,
}

impl FixedSolver {
    pub fn new(distance: Distance) -> Self {
        FixedSolver {
            distance,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ItinerarySolver for FixedSolver {
    type Error = String;

    fn solve(
        &self,
        matrix: &DistanceMatrix,
    ) -> impl Future<Output = Result<CandidateItinerary, Self::Error>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let candidate = CandidateItinerary {
            itinerary: matrix.ids().to_vec(),
            distance: self.distance,
        };

        async move { Ok(candidate) }
    }
}
