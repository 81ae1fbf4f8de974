//! Predictor input layout and a reference steering predictor
//!
//! Every query is laid out as `[obstacle encoding | start | goal]`, with start
//! and goal in normalized space. This is the order the network was trained
//! with and must not change between calls.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::common::{
    Configuration, MotionPredictor, ObstacleEncoding, PlanningError, PlanningResult, CONFIG_DIM,
    POSITION_DIM,
};

/// Assemble a predictor query from already-normalized start and goal
pub fn predictor_input(
    obstacles: &ObstacleEncoding,
    start: &[f64; CONFIG_DIM],
    goal: &[f64; CONFIG_DIM],
) -> Vec<f64> {
    let mut input = Vec::with_capacity(obstacles.len() + 2 * CONFIG_DIM);
    input.extend_from_slice(obstacles.as_slice());
    input.extend_from_slice(start);
    input.extend_from_slice(goal);
    input
}

/// Split a predictor query back into (obstacle encoding, start, goal)
pub fn split_predictor_input(input: &[f64]) -> PlanningResult<(&[f64], &[f64], &[f64])> {
    if input.len() < 2 * CONFIG_DIM {
        return Err(PlanningError::DimensionMismatch {
            expected: 2 * CONFIG_DIM,
            actual: input.len(),
        });
    }
    let goal_at = input.len() - CONFIG_DIM;
    let start_at = goal_at - CONFIG_DIM;
    Ok((&input[..start_at], &input[start_at..goal_at], &input[goal_at..]))
}

/// Stand-in for a trained network
///
/// Proposes a configuration at most `step_size` (normalized units) from the
/// start toward the goal, with Gaussian noise on the position. Ignores the
/// obstacle encoding.
pub struct SteeringPredictor {
    step_size: f64,
    noise: Normal<f64>,
    rng: StdRng,
}

impl SteeringPredictor {
    pub fn new(step_size: f64, noise_std: f64) -> PlanningResult<Self> {
        if !(step_size > 0.0) {
            return Err(PlanningError::InvalidParameter(format!(
                "step_size must be positive, got {}",
                step_size
            )));
        }
        if !(noise_std.is_finite() && noise_std >= 0.0) {
            return Err(PlanningError::InvalidParameter(format!(
                "noise_std must be finite and non-negative, got {}",
                noise_std
            )));
        }
        let noise = Normal::new(0.0, noise_std)
            .map_err(|e| PlanningError::InvalidParameter(format!("noise_std: {}", e)))?;
        Ok(Self {
            step_size,
            noise,
            rng: StdRng::from_entropy(),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }
}

impl MotionPredictor for SteeringPredictor {
    fn predict(&mut self, input: &[f64]) -> PlanningResult<Vec<f64>> {
        let (_, start, goal) = split_predictor_input(input)?;
        let start = Configuration::from_slice(start)?;
        let goal = Configuration::from_slice(goal)?;

        let gap = start.position_distance(&goal);
        let t = if gap > self.step_size { self.step_size / gap } else { 1.0 };
        let mut out = start.interpolate(&goal, t).to_array();
        for value in out.iter_mut().take(POSITION_DIM) {
            *value += self.noise.sample(&mut self.rng);
        }
        Ok(out.to_vec())
    }
}
