//! Scenario files for the command-line planner
//!
//! A scenario is a TOML document describing the workspace, the obstacles of
//! the reference sphere world, the start and goal, and the planner and
//! predictor parameters.
//!
//! ```toml
//! start = [209.881, -84.3507, 49.0, 0.0, 0.0, 0.5425, 0.8401]
//! goal = [262.95, 75.05, 46.19, 0.0, 0.0, 0.0, 1.0]
//! timeout_secs = 120.0
//!
//! [[obstacles]]
//! center = [240.0, 0.0, 48.0]
//! radius = 20.0
//!
//! [planner]
//! base_length = 3000
//! max_replans = 1001
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::common::{Configuration, Goal, PlanningError, PlanningResult, CONFIG_DIM, POSITION_DIM};
use crate::mapping::sphere_world::{SphereObstacle, SphereWorld, WorkspaceBounds};
use crate::path_planning::neural_replanner::normalizer::{HOME_LOWER_BOUND, HOME_UPPER_BOUND};
use crate::path_planning::neural_replanner::{NormalizationBounds, ReplannerConfig, SteeringPredictor};

/// Workspace limits, also used for predictor normalization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundsConfig {
    pub lower: [f64; POSITION_DIM],
    pub upper: [f64; POSITION_DIM],
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            lower: HOME_LOWER_BOUND,
            upper: HOME_UPPER_BOUND,
        }
    }
}

/// Parameters of the reference steering predictor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Maximum step in normalized units
    pub step_size: f64,
    /// Standard deviation of the positional noise in normalized units
    pub noise_std: f64,
    pub seed: Option<u64>,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            step_size: 0.05,
            noise_std: 0.02,
            seed: None,
        }
    }
}

fn default_robot_radius() -> f64 {
    5.0
}

fn default_resolution() -> f64 {
    1.0
}

fn default_timeout_secs() -> f64 {
    120.0
}

/// Complete planning scenario
///
/// Tables come after plain values so the struct serializes as valid TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub start: [f64; CONFIG_DIM],
    pub goal: [f64; CONFIG_DIM],
    #[serde(default)]
    pub goal_tolerance: f64,
    #[serde(default = "default_robot_radius")]
    pub robot_radius: f64,
    /// Motion check sampling distance
    #[serde(default = "default_resolution")]
    pub resolution: f64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,
    /// Text file with one obstacle-encoding value per line
    #[serde(default)]
    pub obstacle_encoding: Option<PathBuf>,
    #[serde(default)]
    pub obstacles: Vec<SphereObstacle>,
    #[serde(default)]
    pub bounds: BoundsConfig,
    #[serde(default)]
    pub planner: ReplannerConfig,
    #[serde(default)]
    pub predictor: PredictorConfig,
}

impl Default for ScenarioConfig {
    /// Start and goal of the indoor "home" scene
    fn default() -> Self {
        Self {
            start: [209.881, -84.3507, 49.0, 0.0, 0.0, 0.5425, 0.8401],
            goal: [262.95, 75.05, 46.19, 0.0, 0.0, 0.0, 1.0],
            goal_tolerance: 0.0,
            robot_radius: default_robot_radius(),
            resolution: default_resolution(),
            timeout_secs: default_timeout_secs(),
            obstacle_encoding: None,
            obstacles: Vec::new(),
            bounds: BoundsConfig::default(),
            planner: ReplannerConfig::default(),
            predictor: PredictorConfig::default(),
        }
    }
}

impl ScenarioConfig {
    pub fn from_toml_str(text: &str) -> PlanningResult<Self> {
        let scenario: Self = toml::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> PlanningResult<Self> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> PlanningResult<()> {
        self.planner.validate()?;
        self.normalization_bounds()?;
        self.start_configuration().unit_orientation()?;
        self.goal().state.unit_orientation()?;
        if !(self.timeout_secs.is_finite() && self.timeout_secs >= 0.0) {
            return Err(PlanningError::InvalidParameter(format!(
                "timeout_secs must be finite and non-negative, got {}",
                self.timeout_secs
            )));
        }
        Ok(())
    }

    pub fn start_configuration(&self) -> Configuration {
        Configuration::new(
            self.start[0], self.start[1], self.start[2], self.start[3], self.start[4],
            self.start[5], self.start[6],
        )
    }

    pub fn goal(&self) -> Goal {
        let state = Configuration::new(
            self.goal[0], self.goal[1], self.goal[2], self.goal[3], self.goal[4], self.goal[5],
            self.goal[6],
        );
        Goal::new(state).with_tolerance(self.goal_tolerance)
    }

    pub fn normalization_bounds(&self) -> PlanningResult<NormalizationBounds> {
        NormalizationBounds::from_limits(self.bounds.lower, self.bounds.upper)
    }

    pub fn sphere_world(&self) -> PlanningResult<SphereWorld> {
        Ok(SphereWorld::new(self.obstacles.clone(), self.robot_radius, self.resolution)?
            .with_bounds(WorkspaceBounds::new(self.bounds.lower, self.bounds.upper)?))
    }

    pub fn steering_predictor(&self) -> PlanningResult<SteeringPredictor> {
        let predictor = SteeringPredictor::new(self.predictor.step_size, self.predictor.noise_std)?;
        Ok(match self.predictor.seed {
            Some(seed) => predictor.with_seed(seed),
            None => predictor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"
start = [209.881, -84.3507, 49.0, 0.0, 0.0, 0.5425, 0.8401]
goal = [262.95, 75.05, 46.19, 0.0, 0.0, 0.0, 1.0]
timeout_secs = 10.0

[[obstacles]]
center = [240.0, 0.0, 48.0]
radius = 20.0

[planner]
base_length = 100
shorten = true

[predictor]
seed = 42
"#;

    #[test]
    fn test_scenario_parsing() {
        let scenario = ScenarioConfig::from_toml_str(SCENARIO).unwrap();
        assert_eq!(scenario.obstacles, vec![SphereObstacle::new(240.0, 0.0, 48.0, 20.0)]);
        assert_eq!(scenario.planner.base_length, 100);
        assert_eq!(scenario.planner.max_replans, 1001);
        assert!(scenario.planner.shorten);
        assert_eq!(scenario.predictor.seed, Some(42));
        assert_eq!(scenario.robot_radius, 5.0);
        assert_eq!(scenario.bounds, BoundsConfig::default());
        assert_eq!(scenario.timeout_secs, 10.0);
        assert!(scenario.obstacle_encoding.is_none());
    }

    #[test]
    fn test_scenario_builds_collaborators() {
        let scenario = ScenarioConfig::from_toml_str(SCENARIO).unwrap();
        let world = scenario.sphere_world().unwrap();
        assert_eq!(world.obstacles().len(), 1);
        assert!(scenario.steering_predictor().is_ok());
        assert!((scenario.start_configuration().orientation_norm() - 1.0).abs() < 1e-4);
        assert_eq!(scenario.goal().state.position.x, 262.95);
    }

    #[test]
    fn test_scenario_rejects_degenerate_start() {
        let text = SCENARIO.replace("0.0, 0.0, 0.5425, 0.8401", "0.0, 0.0, 0.0, 0.0");
        assert!(matches!(
            ScenarioConfig::from_toml_str(&text),
            Err(PlanningError::DegenerateOrientation(_))
        ));
    }

    #[test]
    fn test_scenario_rejects_unbounded_timeout() {
        for bad in ["inf", "nan", "-1.0"].iter() {
            let text = SCENARIO.replace("timeout_secs = 10.0", &format!("timeout_secs = {}", bad));
            assert!(
                matches!(
                    ScenarioConfig::from_toml_str(&text),
                    Err(PlanningError::InvalidParameter(_))
                ),
                "timeout_secs = {}",
                bad
            );
        }
    }

    #[test]
    fn test_scenario_requires_start() {
        assert!(matches!(
            ScenarioConfig::from_toml_str("goal = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]"),
            Err(PlanningError::Config(_))
        ));
    }

    #[test]
    fn test_default_scenario_round_trips_through_toml() {
        let text = toml::to_string(&ScenarioConfig::default()).unwrap();
        let parsed = ScenarioConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, ScenarioConfig::default());
    }
}
