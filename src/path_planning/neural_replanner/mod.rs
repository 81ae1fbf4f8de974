//! Learning-guided path replanner
//!
//! A coarse path (initially just the start and goal) is repaired segment by
//! segment: every segment that fails the motion check is replaced by a
//! bidirectional extension driven by a learned predictor. Attempts repeat
//! with a growing step budget until the whole path is valid or the attempt
//! budget runs out, in which case the last path is reported as approximate.

pub mod context;
pub mod extender;
pub mod normalizer;
pub mod planner;
pub mod predictor;
pub mod shortener;
pub mod stitcher;

#[cfg(test)]
mod testing;

use serde::{Deserialize, Serialize};

use crate::common::{PlanningError, PlanningResult};

pub use context::ReplanContext;
pub use extender::{extend_bidirectional, Extension};
pub use normalizer::{NormalizationBounds, Normalizer};
pub use planner::{is_feasible, step_budget, NeuralReplanner};
pub use predictor::{predictor_input, split_predictor_input, SteeringPredictor};
pub use shortener::shorten_path;
pub use stitcher::{stitch_path, StitchOutcome};

/// Configuration for the neural replanner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplannerConfig {
    /// Step budget of the first attempt
    pub base_length: usize,
    /// Retries allowed after the first attempt
    pub max_replans: usize,
    /// Fraction of `max_replans` during which the budget is doubled; later
    /// attempts get three times the base
    pub escalation_fraction: f64,
    /// Contract each stitched path before checking it
    pub shorten: bool,
    /// Component-wise tolerance for merging coincident configurations
    pub connect_tolerance: f64,
}

impl Default for ReplannerConfig {
    fn default() -> Self {
        Self {
            base_length: 3000,
            max_replans: 1001,
            escalation_fraction: 0.30,
            shorten: false,
            connect_tolerance: 1e-9,
        }
    }
}

impl ReplannerConfig {
    pub fn validate(&self) -> PlanningResult<()> {
        if self.base_length == 0 {
            return Err(PlanningError::InvalidParameter(
                "base_length must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.escalation_fraction) {
            return Err(PlanningError::InvalidParameter(format!(
                "escalation_fraction must lie in [0, 1], got {}",
                self.escalation_fraction
            )));
        }
        if !(self.connect_tolerance >= 0.0) {
            return Err(PlanningError::InvalidParameter(format!(
                "connect_tolerance must be non-negative, got {}",
                self.connect_tolerance
            )));
        }
        Ok(())
    }

    /// Parse and validate a TOML table of planner parameters
    pub fn from_toml_str(text: &str) -> PlanningResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Step budget for the 0-based `attempt`
    pub fn step_budget(&self, attempt: usize) -> usize {
        step_budget(attempt, self.base_length, self.max_replans, self.escalation_fraction)
    }
}
