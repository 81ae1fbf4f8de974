//! Common types used throughout neural_replanning

use std::sync::Arc;

use itertools::Itertools;
use nalgebra::{Quaternion, Unit, UnitQuaternion, Vector3};

use crate::common::error::{PlanningError, PlanningResult};

/// Number of positional components in a configuration
pub const POSITION_DIM: usize = 3;
/// Number of orientation (quaternion) components in a configuration
pub const ORIENTATION_DIM: usize = 4;
/// Total configuration dimensionality
pub const CONFIG_DIM: usize = POSITION_DIM + ORIENTATION_DIM;

/// Smallest quaternion norm accepted as a rotation
pub const MIN_ORIENTATION_NORM: f64 = 1e-12;

/// Rigid-body configuration: position plus quaternion orientation
///
/// The flat layout used for I/O and for the predictor is
/// `[x, y, z, qx, qy, qz, qw]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Configuration {
    pub position: Vector3<f64>,
    pub orientation: Quaternion<f64>,
}

impl Configuration {
    pub fn new(x: f64, y: f64, z: f64, qx: f64, qy: f64, qz: f64, qw: f64) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            orientation: Quaternion::new(qw, qx, qy, qz),
        }
    }

    pub fn from_parts(position: Vector3<f64>, orientation: Quaternion<f64>) -> Self {
        Self { position, orientation }
    }

    /// Configuration at the given position with the identity orientation
    pub fn at_position(x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y, z, 0.0, 0.0, 0.0, 1.0)
    }

    /// Build from a flat `[x, y, z, qx, qy, qz, qw]` slice
    pub fn from_slice(values: &[f64]) -> PlanningResult<Self> {
        if values.len() != CONFIG_DIM {
            return Err(PlanningError::DimensionMismatch {
                expected: CONFIG_DIM,
                actual: values.len(),
            });
        }
        Ok(Self::new(
            values[0], values[1], values[2], values[3], values[4], values[5], values[6],
        ))
    }

    /// Flat `[x, y, z, qx, qy, qz, qw]` representation
    pub fn to_array(&self) -> [f64; CONFIG_DIM] {
        let q = &self.orientation;
        [
            self.position.x,
            self.position.y,
            self.position.z,
            q.i,
            q.j,
            q.k,
            q.w,
        ]
    }

    pub fn orientation_norm(&self) -> f64 {
        self.orientation.norm()
    }

    /// Orientation as a unit quaternion, rejecting zero-norm vectors
    pub fn unit_orientation(&self) -> PlanningResult<UnitQuaternion<f64>> {
        let norm = self.orientation_norm();
        if !norm.is_finite() || norm < MIN_ORIENTATION_NORM {
            return Err(PlanningError::DegenerateOrientation(norm));
        }
        Ok(UnitQuaternion::from_quaternion(self.orientation))
    }

    /// Build from a position and an axis-angle rotation
    pub fn from_axis_angle(position: Vector3<f64>, axis: Vector3<f64>, angle: f64) -> PlanningResult<Self> {
        let rotation = match Unit::try_new(axis, MIN_ORIENTATION_NORM) {
            Some(axis) => UnitQuaternion::from_axis_angle(&axis, angle),
            None if angle == 0.0 => UnitQuaternion::identity(),
            None => {
                return Err(PlanningError::InvalidParameter(
                    "rotation axis has zero length".to_string(),
                ))
            }
        };
        Ok(Self::from_parts(position, rotation.into_inner()))
    }

    /// Orientation as (unit axis, angle); the identity maps to (+z, 0)
    pub fn axis_angle(&self) -> PlanningResult<(Vector3<f64>, f64)> {
        let rotation = self.unit_orientation()?;
        Ok(match rotation.axis_angle() {
            Some((axis, angle)) => (axis.into_inner(), angle),
            None => (Vector3::z(), 0.0),
        })
    }

    /// Euclidean distance between positions
    pub fn position_distance(&self, other: &Configuration) -> f64 {
        (self.position - other.position).norm()
    }

    /// Rotation angle between orientations, zero if either is degenerate
    pub fn rotation_distance(&self, other: &Configuration) -> f64 {
        match (self.unit_orientation(), other.unit_orientation()) {
            (Ok(a), Ok(b)) => a.angle_to(&b),
            _ => 0.0,
        }
    }

    /// SE(3)-style distance: position distance plus rotation angle
    pub fn distance(&self, other: &Configuration) -> f64 {
        self.position_distance(other) + self.rotation_distance(other)
    }

    /// Linear interpolation of position and spherical interpolation of orientation
    pub fn interpolate(&self, other: &Configuration, t: f64) -> Configuration {
        let position = self.position.lerp(&other.position, t);
        let orientation = match (self.unit_orientation(), other.unit_orientation()) {
            (Ok(a), Ok(b)) => a
                .try_slerp(&b, t, 1e-9)
                .unwrap_or_else(|| a.nlerp(&b, t))
                .into_inner(),
            _ => self.orientation.lerp(&other.orientation, t),
        };
        Configuration::from_parts(position, orientation)
    }

    /// Component-wise comparison of the flat representations
    pub fn approx_eq(&self, other: &Configuration, tolerance: f64) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

/// Ordered sequence of configurations from start to goal
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigPath {
    pub states: Vec<Configuration>,
}

impl ConfigPath {
    pub fn new() -> Self {
        Self { states: Vec::new() }
    }

    pub fn from_states(states: Vec<Configuration>) -> Self {
        Self { states }
    }

    /// Two-configuration path `[start, goal]`
    pub fn endpoints(start: Configuration, goal: Configuration) -> Self {
        Self { states: vec![start, goal] }
    }

    pub fn push(&mut self, state: Configuration) {
        self.states.push(state);
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn first(&self) -> Option<&Configuration> {
        self.states.first()
    }

    pub fn last(&self) -> Option<&Configuration> {
        self.states.last()
    }

    /// Consecutive pairs `(states[i], states[i + 1])`
    pub fn segments(&self) -> impl Iterator<Item = (&Configuration, &Configuration)> + '_ {
        self.states.iter().tuple_windows()
    }

    pub fn total_length(&self) -> f64 {
        self.segments().map(|(a, b)| a.distance(b)).sum()
    }
}

/// Static environment embedding shared read-only by every predictor call
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleEncoding {
    values: Arc<[f64]>,
}

impl ObstacleEncoding {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values: values.into() }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Goal state together with the distance at which it counts as reached
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Goal {
    pub state: Configuration,
    pub tolerance: f64,
}

impl Goal {
    pub fn new(state: Configuration) -> Self {
        Self { state, tolerance: 0.0 }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn distance_to(&self, state: &Configuration) -> f64 {
        self.state.distance(state)
    }

    pub fn is_satisfied(&self, state: &Configuration) -> bool {
        self.distance_to(state) <= self.tolerance
    }
}

/// Why the replan loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Every segment of the path is valid
    Solved,
    /// The attempt budget ran out
    BudgetExhausted,
    /// The termination condition fired
    Cancelled,
}

/// Path reported by a planner
#[derive(Debug, Clone)]
pub struct PlannerSolution {
    pub path: ConfigPath,
    /// `true` when some segment of `path` is not known to be valid
    pub approximate: bool,
    /// Remaining distance to the goal for approximate solutions
    pub approximate_difference: Option<f64>,
    /// Number of replan attempts that were run
    pub attempts: usize,
    pub termination: Termination,
    pub planner_name: String,
}

impl PlannerSolution {
    pub fn is_exact(&self) -> bool {
        !self.approximate
    }
}

/// Outcome flags returned by `PathPlanner::solve`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerStatus {
    pub solved: bool,
    pub approximate: bool,
}

impl PlannerStatus {
    pub fn exact() -> Self {
        Self { solved: true, approximate: false }
    }

    pub fn approximate() -> Self {
        Self { solved: true, approximate: true }
    }
}

/// Start states, goal, and the solutions recorded for them
#[derive(Debug, Clone)]
pub struct ProblemDefinition {
    pub starts: Vec<Configuration>,
    pub goal: Goal,
    solutions: Vec<PlannerSolution>,
}

impl ProblemDefinition {
    pub fn new(start: Configuration, goal: Goal) -> Self {
        Self {
            starts: vec![start],
            goal,
            solutions: Vec::new(),
        }
    }

    pub fn add_start(&mut self, start: Configuration) {
        self.starts.push(start);
    }

    pub fn add_solution_path(&mut self, solution: PlannerSolution) {
        self.solutions.push(solution);
    }

    pub fn solutions(&self) -> &[PlannerSolution] {
        &self.solutions
    }

    pub fn has_exact_solution(&self) -> bool {
        self.solutions.iter().any(PlannerSolution::is_exact)
    }

    /// Best recorded solution: the latest exact one, else the latest one
    pub fn solution(&self) -> Option<&PlannerSolution> {
        self.solutions
            .iter()
            .rev()
            .find(|s| s.is_exact())
            .or_else(|| self.solutions.last())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_flat_layout() {
        let c = Configuration::new(1.0, 2.0, 3.0, 0.0, 0.0, 0.5425, 0.8401);
        assert_eq!(c.to_array(), [1.0, 2.0, 3.0, 0.0, 0.0, 0.5425, 0.8401]);
        assert_eq!(Configuration::from_slice(&c.to_array()).unwrap(), c);
        assert!(matches!(
            Configuration::from_slice(&[0.0; 6]),
            Err(PlanningError::DimensionMismatch { expected: 7, actual: 6 })
        ));
    }

    #[test]
    fn test_degenerate_orientation_rejected() {
        let c = Configuration::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        assert!(matches!(
            c.unit_orientation(),
            Err(PlanningError::DegenerateOrientation(_))
        ));
    }

    #[test]
    fn test_axis_angle_round_trip() {
        let axis = Vector3::new(0.0, 0.0, 1.0);
        let angle = 1.147;
        let c = Configuration::from_axis_angle(Vector3::new(1.0, 2.0, 3.0), axis, angle).unwrap();
        let (out_axis, out_angle) = c.axis_angle().unwrap();
        assert!((out_angle - angle).abs() < 1e-10);
        assert!((out_axis - axis).norm() < 1e-10);

        let identity = Configuration::at_position(0.0, 0.0, 0.0);
        assert_eq!(identity.axis_angle().unwrap(), (Vector3::z(), 0.0));
    }

    #[test]
    fn test_distance_and_interpolation() {
        let a = Configuration::at_position(0.0, 0.0, 0.0);
        let b = Configuration::at_position(3.0, 4.0, 0.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-10);

        let mid = a.interpolate(&b, 0.5);
        assert!(mid.approx_eq(&Configuration::at_position(1.5, 2.0, 0.0), 1e-12));
    }

    #[test]
    fn test_rotation_distance() {
        let a = Configuration::at_position(0.0, 0.0, 0.0);
        let half = std::f64::consts::FRAC_PI_2;
        let b = Configuration::from_axis_angle(Vector3::zeros(), Vector3::x(), half).unwrap();
        assert!((a.rotation_distance(&b) - half).abs() < 1e-10);
    }

    #[test]
    fn test_path_total_length() {
        let path = ConfigPath::from_states(vec![
            Configuration::at_position(0.0, 0.0, 0.0),
            Configuration::at_position(1.0, 0.0, 0.0),
            Configuration::at_position(1.0, 1.0, 0.0),
        ]);
        assert_eq!(path.segments().count(), 2);
        assert!((path.total_length() - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_problem_definition_prefers_exact_solution() {
        let start = Configuration::at_position(0.0, 0.0, 0.0);
        let goal = Goal::new(Configuration::at_position(1.0, 0.0, 0.0));
        let mut pdef = ProblemDefinition::new(start, goal);

        let solution = |approximate| PlannerSolution {
            path: ConfigPath::endpoints(start, goal.state),
            approximate,
            approximate_difference: None,
            attempts: 1,
            termination: Termination::Solved,
            planner_name: "test".to_string(),
        };
        pdef.add_solution_path(solution(false));
        pdef.add_solution_path(solution(true));

        assert!(pdef.has_exact_solution());
        assert!(pdef.solution().unwrap().is_exact());
    }
}
