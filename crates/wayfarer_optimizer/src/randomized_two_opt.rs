use std::convert::Infallible;

use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::debug;
use wayfarer_matrix_providers::distance_matrix::{Distance, DistanceMatrix};

use crate::{itinerary::CandidateItinerary, solver::ItinerarySolver};

const MIN_GAIN: Distance = 1e-9;

/// Nearest neighbour tour from a random first waypoint, improved with 2-opt moves
/// on the open path until no reversal shortens it.
///
/// Two calls on the same matrix may return different itineraries.
pub struct RandomizedTwoOptSolver {
    rng: Mutex<SmallRng>,
}

impl Default for RandomizedTwoOptSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomizedTwoOptSolver {
    pub fn new() -> Self {
        RandomizedTwoOptSolver {
            rng: Mutex::new(SmallRng::from_os_rng()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        RandomizedTwoOptSolver {
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }

    fn order(&self, matrix: &DistanceMatrix) -> Vec<usize> {
        if matrix.is_empty() {
            return vec![];
        }

        let start = self.rng.lock().random_range(0..matrix.len());
        let mut order = nearest_neighbour(matrix, start);
        let passes = two_opt(matrix, &mut order);

        debug!(
            "RandomizedTwoOptSolver: start {}, {} improving passes",
            matrix.ids()[start],
            passes
        );

        order
    }
}

impl ItinerarySolver for RandomizedTwoOptSolver {
    type Error = Infallible;

    async fn solve(&self, matrix: &DistanceMatrix) -> Result<CandidateItinerary, Self::Error> {
        let order = self.order(matrix);
        let distance = path_distance(matrix, &order);

        Ok(CandidateItinerary {
            itinerary: order
                .into_iter()
                .map(|index| matrix.ids()[index].clone())
                .collect(),
            distance,
        })
    }
}

fn nearest_neighbour(matrix: &DistanceMatrix, start: usize) -> Vec<usize> {
    let mut visited = vec![false; matrix.len()];
    let mut order = Vec::with_capacity(matrix.len());

    visited[start] = true;
    order.push(start);

    let mut current = start;
    while order.len() < matrix.len() {
        let mut next = None;
        for candidate in 0..matrix.len() {
            if visited[candidate] {
                continue;
            }

            let distance = matrix.distance(current, candidate);
            if next.is_none_or(|(_, best)| distance < best) {
                next = Some((candidate, distance));
            }
        }

        let Some((next, _)) = next else {
            break;
        };

        visited[next] = true;
        order.push(next);
        current = next;
    }

    order
}

/// Applies the best reversal of each pass until none is left. Returns the number
/// of improving passes.
fn two_opt(matrix: &DistanceMatrix, order: &mut [usize]) -> usize {
    let mut passes = 0;

    loop {
        let mut best: Option<(usize, usize, Distance)> = None;

        for i in 0..order.len() {
            for j in (i + 1)..order.len() {
                let gain = reversal_gain(matrix, order, i, j);
                if gain > MIN_GAIN && best.is_none_or(|(_, _, best_gain)| gain > best_gain) {
                    best = Some((i, j, gain));
                }
            }
        }

        match best {
            Some((i, j, _)) => {
                order[i..=j].reverse();
                passes += 1;
            }
            None => return passes,
        }
    }
}

/// How much shorter the path gets when `order[i..=j]` is reversed. Distances are
/// not assumed symmetric so the inner edges are compared too.
fn reversal_gain(matrix: &DistanceMatrix, order: &[usize], i: usize, j: usize) -> Distance {
    let mut before = 0.0;
    let mut after = 0.0;

    if i > 0 {
        before += matrix.distance(order[i - 1], order[i]);
        after += matrix.distance(order[i - 1], order[j]);
    }

    if j + 1 < order.len() {
        before += matrix.distance(order[j], order[j + 1]);
        after += matrix.distance(order[i], order[j + 1]);
    }

    for k in i..j {
        before += matrix.distance(order[k], order[k + 1]);
        after += matrix.distance(order[k + 1], order[k]);
    }

    before - after
}

fn path_distance(matrix: &DistanceMatrix, order: &[usize]) -> Distance {
    order
        .windows(2)
        .map(|pair| matrix.distance(pair[0], pair[1]))
        .sum()
}
