use serde::{Deserialize, Serialize};
use wayfarer_matrix_providers::distance_matrix::{Distance, DistanceMatrix};

/// One solver answer: an ordering of waypoint ids and its total distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateItinerary {
    pub itinerary: Vec<String>,
    pub distance: Distance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub optimized_ids: Vec<String>,
    pub distance: Distance,
    pub failed: bool,
}

impl OptimizationResult {
    pub fn accepted(candidate: CandidateItinerary) -> Self {
        OptimizationResult {
            optimized_ids: candidate.itinerary,
            distance: candidate.distance,
            failed: false,
        }
    }

    /// The existing order should be kept.
    pub fn failed() -> Self {
        OptimizationResult {
            optimized_ids: vec![],
            distance: 0.0,
            failed: true,
        }
    }
}

/// Length of an open path visiting `order` in sequence.
///
/// Returns `None` when an id is not part of the matrix.
pub fn route_distance<S: AsRef<str>>(matrix: &DistanceMatrix, order: &[S]) -> Option<Distance> {
    order
        .windows(2)
        .map(|pair| matrix.get(pair[0].as_ref(), pair[1].as_ref()))
        .try_fold(0.0, |total, distance| distance.map(|distance| total + distance))
        .filter(|_| order.iter().all(|id| matrix.contains(id.as_ref())))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_utils::square_matrix;

    #[test]
    fn test_route_distance() {
        let matrix = square_matrix();

        assert_eq!(route_distance(&matrix, &["a", "b", "c", "d"]), Some(30.0));
        assert_eq!(route_distance(&matrix, &["a", "c"]), Some(20.0));
        assert_eq!(route_distance(&matrix, &["d"]), Some(0.0));
        assert_eq!(route_distance::<&str>(&matrix, &[]), Some(0.0));
        assert_eq!(route_distance(&matrix, &["a", "unknown"]), None);
        assert_eq!(route_distance(&matrix, &["unknown"]), None);
    }

    #[test]
    fn test_result_json() {
        let result = OptimizationResult::accepted(CandidateItinerary {
            itinerary: vec!["b".to_string(), "a".to_string()],
            distance: 12.5,
        });

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "optimizedIds": ["b", "a"], "distance": 12.5, "failed": false })
        );
        assert_eq!(
            serde_json::to_value(OptimizationResult::failed()).unwrap(),
            json!({ "optimizedIds": [], "distance": 0.0, "failed": true })
        );
    }
}
