use tracing::{debug, info, warn};
use wayfarer_matrix_providers::distance_matrix::{Distance, DistanceMatrix};

use crate::{
    itinerary::OptimizationResult,
    optimizer_params::OptimizerParams,
    retry::{RetryOutcome, retry_until_accepted},
    solver::ItinerarySolver,
};

/// Runs a possibly non-deterministic solver until it beats the current itinerary
/// distance or the attempts run out.
pub struct ItineraryOptimizer<S> {
    solver: S,
    params: OptimizerParams,
}

impl<S> ItineraryOptimizer<S>
where
    S: ItinerarySolver,
{
    pub fn new(solver: S) -> Self {
        Self::with_params(solver, OptimizerParams::default())
    }

    pub fn with_params(solver: S, params: OptimizerParams) -> Self {
        ItineraryOptimizer { solver, params }
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn params(&self) -> &OptimizerParams {
        &self.params
    }

    /// `baseline` is the distance of the current order. Without one (zero, negative
    /// or NaN) the first solver answer is accepted.
    ///
    /// A `failed` result means no attempt was shorter than `baseline` by more than
    /// the improvement epsilon and the current order should be kept.
    pub async fn optimize(
        &self,
        matrix: &DistanceMatrix,
        baseline: Distance,
    ) -> Result<OptimizationResult, S::Error> {
        let baseline = OptimizerParams::baseline(baseline);
        let mut best_distance_seen: Option<Distance> = None;

        let outcome = retry_until_accepted(
            self.params.max_attempts,
            |attempt| {
                debug!(
                    "ItineraryOptimizer: attempt {}/{}",
                    attempt + 1,
                    self.params.max_attempts
                );
                self.solver.solve(matrix)
            },
            |candidate| {
                if best_distance_seen.is_none_or(|best| candidate.distance < best) {
                    best_distance_seen = Some(candidate.distance);
                }

                self.params.is_improvement(candidate.distance, baseline)
            },
        )
        .await?;

        match outcome {
            RetryOutcome::Accepted {
                candidate,
                attempts,
            } => {
                info!(
                    "ItineraryOptimizer: accepted itinerary of {:.1} after {} attempt(s), baseline {:?}",
                    candidate.distance, attempts, baseline
                );
                Ok(OptimizationResult::accepted(candidate))
            }
            RetryOutcome::Exhausted { attempts } => {
                warn!(
                    "ItineraryOptimizer: no improvement over {:?} after {} attempts, best distance seen {:?}",
                    baseline, attempts, best_distance_seen
                );
                Ok(OptimizationResult::failed())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;

    use super::*;
    use crate::{
        itinerary::{CandidateItinerary, route_distance},
        optimizer_params::DEFAULT_MAX_ATTEMPTS,
        randomized_two_opt::RandomizedTwoOptSolver,
        test_utils::{FixedSolver, line_matrix},
    };

    #[tokio::test]
    async fn test_accepts_improvement_on_first_attempt() {
        let matrix = line_matrix(4);
        let optimizer = ItineraryOptimizer::new(FixedSolver::new(99.0));

        let result = optimizer.optimize(&matrix, 100.0).await.unwrap();

        assert!(!result.failed);
        assert_eq!(result.distance, 99.0);
        assert_eq!(result.optimized_ids, vec!["p0", "p1", "p2", "p3"]);
        assert_eq!(optimizer.solver().calls(), 1);
    }

    #[tokio::test]
    async fn test_exhausts_attempts_without_improvement() {
        let matrix = line_matrix(4);
        let optimizer = ItineraryOptimizer::new(FixedSolver::new(100.0));

        let result = optimizer.optimize(&matrix, 100.0).await.unwrap();

        assert_eq!(result, OptimizationResult::failed());
        assert!(result.optimized_ids.is_empty());
        assert_eq!(result.distance, 0.0);
        assert_eq!(optimizer.solver().calls(), DEFAULT_MAX_ATTEMPTS);
    }

    #[tokio::test]
    async fn test_gain_within_epsilon_is_not_an_improvement() {
        let matrix = line_matrix(3);
        let optimizer = ItineraryOptimizer::with_params(
            FixedSolver::new(99.95),
            OptimizerParams {
                max_attempts: 3,
                ..OptimizerParams::default()
            },
        );

        let result = optimizer.optimize(&matrix, 100.0).await.unwrap();

        assert!(result.failed);
        assert_eq!(optimizer.solver().calls(), 3);
    }

    #[tokio::test]
    async fn test_without_baseline_accepts_first_result() {
        let matrix = line_matrix(4);

        for baseline in [0.0, -1.0, f64::NAN] {
            let optimizer = ItineraryOptimizer::new(FixedSolver::new(5000.0));
            let result = optimizer.optimize(&matrix, baseline).await.unwrap();

            assert!(!result.failed);
            assert_eq!(result.distance, 5000.0);
            assert_eq!(optimizer.solver().calls(), 1);
        }
    }

    struct FailingSolver;

    impl ItinerarySolver for FailingSolver {
        type Error = &'static str;

        fn solve(
            &self,
            _matrix: &DistanceMatrix,
        ) -> impl Future<Output = Result<CandidateItinerary, Self::Error>> {
            async { Err("solver unavailable") }
        }
    }

    #[tokio::test]
    async fn test_solver_error_propagates() {
        let optimizer = ItineraryOptimizer::new(FailingSolver);

        let error = optimizer.optimize(&line_matrix(3), 0.0).await.unwrap_err();

        assert_eq!(error, "solver unavailable");
    }

    #[tokio::test]
    async fn test_randomized_solver_beats_baseline() {
        let matrix = line_matrix(10);
        let current = ["p0", "p9", "p1", "p8", "p2", "p7", "p3", "p6", "p4", "p5"];
        let baseline = route_distance(&matrix, &current).unwrap();

        let optimizer = ItineraryOptimizer::new(RandomizedTwoOptSolver::with_seed(3));
        let result = optimizer.optimize(&matrix, baseline).await.unwrap();

        assert!(!result.failed);
        assert!(result.distance < baseline);
        assert_eq!(result.optimized_ids.len(), 10);
        assert_eq!(
            route_distance(&matrix, &result.optimized_ids),
            Some(result.distance)
        );
    }
}
