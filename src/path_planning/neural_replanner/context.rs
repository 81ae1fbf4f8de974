//! Session-scoped handles shared by the replanning components

use crate::common::{Configuration, MotionPredictor, ObstacleEncoding, PlanningResult, ValidityChecker};

use super::normalizer::Normalizer;
use super::predictor::predictor_input;

/// Everything one planning session needs to query its collaborators
///
/// The obstacle encoding and normalizer are read-only; the predictor is
/// borrowed mutably because models may carry sampling state.
pub struct ReplanContext<'a> {
    pub checker: &'a dyn ValidityChecker,
    pub predictor: &'a mut dyn MotionPredictor,
    pub obstacles: &'a ObstacleEncoding,
    pub normalizer: &'a Normalizer,
    /// Component-wise tolerance under which two configurations are merged
    pub merge_tolerance: f64,
}

impl<'a> ReplanContext<'a> {
    pub fn new(
        checker: &'a dyn ValidityChecker,
        predictor: &'a mut dyn MotionPredictor,
        obstacles: &'a ObstacleEncoding,
        normalizer: &'a Normalizer,
    ) -> Self {
        Self {
            checker,
            predictor,
            obstacles,
            normalizer,
            merge_tolerance: 1e-9,
        }
    }

    pub fn with_merge_tolerance(mut self, tolerance: f64) -> Self {
        self.merge_tolerance = tolerance;
        self
    }

    /// Ask the predictor for the next configuration from `start` toward `goal`
    pub fn predict(&mut self, start: &Configuration, goal: &Configuration) -> PlanningResult<Configuration> {
        let start = self.normalizer.normalize(start)?;
        let goal = self.normalizer.normalize(goal)?;
        let input = predictor_input(self.obstacles, &start, &goal);
        let raw = self.predictor.predict(&input)?;
        self.normalizer.denormalize(&raw)
    }
}
