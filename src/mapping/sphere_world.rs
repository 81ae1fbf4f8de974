//! Spherical-obstacle workspace used as a reference validity checker
//!
//! The robot is approximated by a sphere of `robot_radius` around its
//! position. Motions are checked by sampling the interpolated configuration
//! every `resolution` units of configuration distance, the way a discrete
//! motion validator walks a segment.

use std::sync::atomic::{AtomicUsize, Ordering};

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::common::{Configuration, PlanningError, PlanningResult, ValidityChecker};

/// Spherical obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereObstacle {
    pub center: [f64; 3],
    pub radius: f64,
}

impl SphereObstacle {
    pub fn new(x: f64, y: f64, z: f64, radius: f64) -> Self {
        Self { center: [x, y, z], radius }
    }

    pub fn center(&self) -> Vector3<f64> {
        Vector3::from(self.center)
    }

    /// Distance from `point` to the sphere surface (negative inside)
    pub fn clearance(&self, point: &Vector3<f64>) -> f64 {
        (point - self.center()).norm() - self.radius
    }
}

/// Axis-aligned box the robot position must stay inside
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkspaceBounds {
    lower: Vector3<f64>,
    upper: Vector3<f64>,
}

impl WorkspaceBounds {
    pub fn new(lower: [f64; 3], upper: [f64; 3]) -> PlanningResult<Self> {
        if lower.iter().zip(upper.iter()).any(|(lo, hi)| !(hi > lo)) {
            return Err(PlanningError::InvalidParameter(format!(
                "workspace upper bound {:?} must exceed lower bound {:?}",
                upper, lower
            )));
        }
        Ok(Self {
            lower: Vector3::from(lower),
            upper: Vector3::from(upper),
        })
    }

    pub fn contains(&self, point: &Vector3<f64>) -> bool {
        (0..3).all(|i| point[i] >= self.lower[i] && point[i] <= self.upper[i])
    }
}

/// Number of state and motion checks performed so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckCounts {
    pub states: usize,
    pub motions: usize,
}

/// Workspace of spherical obstacles with optional bounds
#[derive(Debug)]
pub struct SphereWorld {
    obstacles: Vec<SphereObstacle>,
    bounds: Option<WorkspaceBounds>,
    robot_radius: f64,
    resolution: f64,
    state_checks: AtomicUsize,
    motion_checks: AtomicUsize,
}

impl SphereWorld {
    pub fn new(obstacles: Vec<SphereObstacle>, robot_radius: f64, resolution: f64) -> PlanningResult<Self> {
        if !(resolution > 0.0) {
            return Err(PlanningError::InvalidParameter(format!(
                "motion check resolution must be positive, got {}",
                resolution
            )));
        }
        if !(robot_radius >= 0.0) {
            return Err(PlanningError::InvalidParameter(format!(
                "robot_radius must be non-negative, got {}",
                robot_radius
            )));
        }
        Ok(Self {
            obstacles,
            bounds: None,
            robot_radius,
            resolution,
            state_checks: AtomicUsize::new(0),
            motion_checks: AtomicUsize::new(0),
        })
    }

    /// Reject configurations whose position lies outside `bounds`
    pub fn with_bounds(mut self, bounds: WorkspaceBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn obstacles(&self) -> &[SphereObstacle] {
        &self.obstacles
    }

    pub fn check_counts(&self) -> CheckCounts {
        CheckCounts {
            states: self.state_checks.load(Ordering::Relaxed),
            motions: self.motion_checks.load(Ordering::Relaxed),
        }
    }

    fn is_free(&self, state: &Configuration) -> bool {
        if let Some(bounds) = &self.bounds {
            if !bounds.contains(&state.position) {
                return false;
            }
        }
        self.obstacles
            .iter()
            .all(|obs| obs.clearance(&state.position) > self.robot_radius)
    }
}

impl ValidityChecker for SphereWorld {
    fn is_valid_state(&self, state: &Configuration) -> bool {
        self.state_checks.fetch_add(1, Ordering::Relaxed);
        self.is_free(state)
    }

    fn is_valid_motion(&self, from: &Configuration, to: &Configuration) -> bool {
        self.motion_checks.fetch_add(1, Ordering::Relaxed);
        if !self.is_free(from) || !self.is_free(to) {
            return false;
        }
        let n_steps = (from.distance(to) / self.resolution).ceil() as usize;
        (1..n_steps).all(|k| self.is_free(&from.interpolate(to, k as f64 / n_steps as f64)))
    }
}
