use wayfarer_matrix_providers::distance_matrix::Distance;

pub const DEFAULT_MAX_ATTEMPTS: usize = 15;
pub const DEFAULT_IMPROVEMENT_EPSILON: Distance = 0.1;

#[derive(Clone, Debug)]
pub struct OptimizerParams {
    /// Solver calls before giving up on beating the baseline
    pub max_attempts: usize,

    /// A candidate has to be shorter than `baseline - improvement_epsilon` to count
    /// as an improvement
    pub improvement_epsilon: Distance,
}

impl Default for OptimizerParams {
    fn default() -> Self {
        OptimizerParams {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            improvement_epsilon: DEFAULT_IMPROVEMENT_EPSILON,
        }
    }
}

impl OptimizerParams {
    /// `None` when there is nothing to beat: a zero, negative or NaN baseline.
    pub fn baseline(baseline: Distance) -> Option<Distance> {
        if baseline.is_nan() || baseline <= 0.0 {
            None
        } else {
            Some(baseline)
        }
    }

    pub fn is_improvement(&self, candidate: Distance, baseline: Option<Distance>) -> bool {
        match baseline {
            None => true,
            Some(baseline) => candidate < baseline - self.improvement_epsilon,
        }
    }
}
