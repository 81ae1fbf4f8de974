//! Scripted collaborators shared by the replanner unit tests
//!
//! Configurations are identified by their x coordinate; every test path runs
//! along the x axis with the identity orientation.

use std::cell::{Cell, RefCell};

use crate::common::{
    ConfigPath, Configuration, MotionPredictor, ObstacleEncoding, PlanningResult, ValidityChecker,
};

use super::context::ReplanContext;
use super::normalizer::{NormalizationBounds, Normalizer};
use super::predictor::split_predictor_input;

pub const START_X: f64 = 0.0;
pub const GOAL_X: f64 = 10.0;
const X_TOLERANCE: f64 = 1e-9;

pub fn at(x: f64) -> Configuration {
    Configuration::at_position(x, 0.0, 0.0)
}

pub fn start() -> Configuration {
    at(START_X)
}

pub fn goal() -> Configuration {
    at(GOAL_X)
}

pub fn midpoint() -> Configuration {
    at(5.0)
}

pub fn path_of(xs: &[f64]) -> ConfigPath {
    ConfigPath::from_states(xs.iter().map(|&x| at(x)).collect())
}

pub fn xs(path: &ConfigPath) -> Vec<f64> {
    path.states.iter().map(|s| s.position.x).collect()
}

/// Power-of-two half range keeps small integer positions exact through a
/// normalize/denormalize round trip.
pub fn test_normalizer() -> Normalizer {
    Normalizer::new(
        NormalizationBounds::from_limits([-16.0, -16.0, -16.0], [16.0, 16.0, 16.0])
            .expect("valid test bounds"),
    )
}

fn raw(state: &Configuration) -> Vec<f64> {
    test_normalizer()
        .normalize(state)
        .expect("test configurations have unit orientation")
        .to_vec()
}

fn same_segment(from: &Configuration, to: &Configuration, a: f64, b: f64) -> bool {
    let (x0, x1) = (from.position.x, to.position.x);
    let close = |u: f64, v: f64| (u - v).abs() < X_TOLERANCE;
    (close(x0, a) && close(x1, b)) || (close(x0, b) && close(x1, a))
}

/// Free space except for listed segments and states
#[derive(Default)]
pub struct ScriptedChecker {
    blocked: Vec<(f64, f64)>,
    blocked_once: RefCell<Vec<(f64, f64)>>,
    invalid_states: Vec<f64>,
    reject_all_states: bool,
    motion_queries: Cell<usize>,
}

impl ScriptedChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block_segment(mut self, a: f64, b: f64) -> Self {
        self.blocked.push((a, b));
        self
    }

    /// Block a segment for its first query only
    pub fn block_segment_once(self, a: f64, b: f64) -> Self {
        self.blocked_once.borrow_mut().push((a, b));
        self
    }

    pub fn invalid_state_at(mut self, x: f64) -> Self {
        self.invalid_states.push(x);
        self
    }

    pub fn reject_all_states(mut self) -> Self {
        self.reject_all_states = true;
        self
    }

    pub fn motion_queries(&self) -> usize {
        self.motion_queries.get()
    }
}

impl ValidityChecker for ScriptedChecker {
    fn is_valid_state(&self, state: &Configuration) -> bool {
        !self.reject_all_states
            && !self
                .invalid_states
                .iter()
                .any(|&x| (state.position.x - x).abs() < X_TOLERANCE)
    }

    fn is_valid_motion(&self, from: &Configuration, to: &Configuration) -> bool {
        self.motion_queries.set(self.motion_queries.get() + 1);
        let mut once = self.blocked_once.borrow_mut();
        if let Some(i) = once.iter().position(|&(a, b)| same_segment(from, to, a, b)) {
            once.remove(i);
            return false;
        }
        !self.blocked.iter().any(|&(a, b)| same_segment(from, to, a, b))
    }
}

/// Always proposes the same world configuration
pub struct FixedPredictor {
    output: Vec<f64>,
}

impl FixedPredictor {
    pub fn world(state: Configuration) -> Self {
        Self { output: raw(&state) }
    }
}

impl MotionPredictor for FixedPredictor {
    fn predict(&mut self, _input: &[f64]) -> PlanningResult<Vec<f64>> {
        Ok(self.output.clone())
    }
}

/// Returns the same raw (normalized-space) vector on every call
pub struct RawPredictor {
    output: Vec<f64>,
}

impl RawPredictor {
    pub fn new(output: Vec<f64>) -> Self {
        Self { output }
    }
}

impl MotionPredictor for RawPredictor {
    fn predict(&mut self, _input: &[f64]) -> PlanningResult<Vec<f64>> {
        Ok(self.output.clone())
    }
}

/// Cycles through a list of world configurations
pub struct SequencePredictor {
    outputs: Vec<Vec<f64>>,
    calls: usize,
}

impl SequencePredictor {
    pub fn world(states: Vec<Configuration>) -> Self {
        Self {
            outputs: states.iter().map(raw).collect(),
            calls: 0,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl MotionPredictor for SequencePredictor {
    fn predict(&mut self, _input: &[f64]) -> PlanningResult<Vec<f64>> {
        let out = self.outputs[self.calls % self.outputs.len()].clone();
        self.calls += 1;
        Ok(out)
    }
}

/// Records each (start, goal) query in world coordinates
pub struct RecordingPredictor {
    output: Vec<f64>,
    queries: Vec<(Configuration, Configuration)>,
}

impl RecordingPredictor {
    pub fn world(state: Configuration) -> Self {
        Self {
            output: raw(&state),
            queries: Vec::new(),
        }
    }

    pub fn queries(&self) -> &[(Configuration, Configuration)] {
        &self.queries
    }
}

impl MotionPredictor for RecordingPredictor {
    fn predict(&mut self, input: &[f64]) -> PlanningResult<Vec<f64>> {
        let (_, start, goal) = split_predictor_input(input)?;
        let normalizer = test_normalizer();
        self.queries
            .push((normalizer.denormalize(start)?, normalizer.denormalize(goal)?));
        Ok(self.output.clone())
    }
}

/// Read-only session data for building a `ReplanContext`
pub struct Fixture {
    pub obstacles: ObstacleEncoding,
    pub normalizer: Normalizer,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            obstacles: ObstacleEncoding::new(vec![0.25; 4]),
            normalizer: test_normalizer(),
        }
    }

    pub fn context<'a>(
        &'a self,
        checker: &'a dyn ValidityChecker,
        predictor: &'a mut dyn MotionPredictor,
    ) -> ReplanContext<'a> {
        ReplanContext::new(checker, predictor, &self.obstacles, &self.normalizer)
    }
}
