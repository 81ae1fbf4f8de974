//! NeuralReplanning - learning-guided path replanning for rigid bodies
//!
//! This crate repairs a coarse start-to-goal path by asking a learned
//! predictor for intermediate configurations wherever a segment fails the
//! motion check, and retries with a growing step budget until the path is
//! valid or the attempt budget runs out.

// Core modules
pub mod common;
pub mod config;
pub mod utils;

// Algorithm modules
pub mod mapping;
pub mod path_planning;

// Re-export common types for convenience
pub use common::{ConfigPath, Configuration, Goal, ObstacleEncoding, ProblemDefinition};
pub use common::{MotionPredictor, PathPlanner, TerminationCondition, ValidityChecker};
pub use common::{PlannerSolution, PlannerStatus, Termination};
pub use common::{PlanningError, PlanningResult};
pub use path_planning::neural_replanner::{NeuralReplanner, Normalizer, ReplannerConfig};
