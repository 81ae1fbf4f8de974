//! Replan loop
//!
//! ```text
//! Init -> EscalateBudget -> Stitch -> [Shorten] -> ValidityCheck -> Done
//!              ^                                        |
//!              +------------------ Retry <--------------+
//!                                    |
//!                                  Abort (attempt budget / termination)
//! ```
//!
//! The termination condition is polled once per attempt, before the budget
//! is chosen. Stitching and shortening run to completion once started.

use tracing::{debug, error, info, trace, warn};

use crate::common::{
    ConfigPath, Configuration, Goal, MotionPredictor, ObstacleEncoding, PathPlanner,
    PlannerSolution, PlannerStatus, PlanningError, PlanningResult, ProblemDefinition, Termination,
    TerminationCondition, ValidityChecker,
};

use super::context::ReplanContext;
use super::normalizer::Normalizer;
use super::shortener::shorten_path;
use super::stitcher::stitch_path;
use super::ReplannerConfig;

/// Step budget for the 0-based `attempt`
///
/// The first attempt gets `base_length`, attempts below
/// `fraction * max_replans` get twice that, all later ones three times.
pub fn step_budget(attempt: usize, base_length: usize, max_replans: usize, fraction: f64) -> usize {
    if attempt == 0 {
        base_length
    } else if (attempt as f64) < fraction * max_replans as f64 {
        base_length * 2
    } else {
        base_length * 3
    }
}

/// Whether every segment of `path` passes the motion check
pub fn is_feasible(checker: &dyn ValidityChecker, path: &ConfigPath) -> bool {
    path.segments().all(|(a, b)| checker.is_valid_motion(a, b))
}

/// Remaining distance to the goal from the end of the longest valid prefix,
/// zero once that end lies within the goal tolerance
fn remaining_distance(checker: &dyn ValidityChecker, path: &ConfigPath, goal: &Goal) -> Option<f64> {
    let reached = path
        .segments()
        .take_while(|(a, b)| checker.is_valid_motion(a, b))
        .map(|(_, b)| b)
        .last()
        .or_else(|| path.first())?;
    if goal.is_satisfied(reached) {
        Some(0.0)
    } else {
        Some(goal.distance_to(reached))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ReplanState {
    Init,
    EscalateBudget,
    Stitch,
    Shorten,
    ValidityCheck,
    Retry,
    Done,
    Abort(Termination),
}

/// Learning-guided replanner
///
/// Holds the collaborators of one planning session: the validity checker,
/// the predictor, the obstacle encoding computed for the scene, and the
/// normalization used to talk to the predictor.
pub struct NeuralReplanner<V: ValidityChecker, P: MotionPredictor> {
    name: String,
    config: ReplannerConfig,
    checker: V,
    predictor: P,
    obstacles: ObstacleEncoding,
    normalizer: Normalizer,
}

impl<V: ValidityChecker, P: MotionPredictor> NeuralReplanner<V, P> {
    /// Create a new replanner
    pub fn new(
        checker: V,
        predictor: P,
        obstacles: ObstacleEncoding,
        normalizer: Normalizer,
        config: ReplannerConfig,
    ) -> PlanningResult<Self> {
        config.validate()?;
        Ok(Self {
            name: "NeuralReplanner".to_string(),
            config,
            checker,
            predictor,
            obstacles,
            normalizer,
        })
    }

    pub fn config(&self) -> &ReplannerConfig {
        &self.config
    }

    pub fn checker(&self) -> &V {
        &self.checker
    }

    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    /// Run the replan loop from `start` toward `goal`
    ///
    /// Always returns a path once the inputs are usable: exact when every
    /// segment is valid, otherwise the last attempt flagged approximate.
    pub fn replan(
        &mut self,
        start: Configuration,
        goal: &Goal,
        termination: &dyn TerminationCondition,
    ) -> PlanningResult<PlannerSolution> {
        // Reject unusable orientations before any predictor query.
        self.normalizer.normalize(&start)?;
        self.normalizer.normalize(&goal.state)?;

        let config = self.config.clone();
        let mut ctx = ReplanContext::new(&self.checker, &mut self.predictor, &self.obstacles, &self.normalizer)
            .with_merge_tolerance(config.connect_tolerance);

        let mut path = ConfigPath::endpoints(start, goal.state);
        let mut attempt = 0;
        let mut attempts_run = 0;
        let mut budget = config.base_length;
        let mut state = ReplanState::Init;

        let outcome = loop {
            trace!(?state, attempt, "replan state");
            state = match state {
                ReplanState::Init => ReplanState::EscalateBudget,
                ReplanState::EscalateBudget => {
                    if termination.should_terminate() {
                        ReplanState::Abort(Termination::Cancelled)
                    } else {
                        budget = config.step_budget(attempt);
                        ReplanState::Stitch
                    }
                }
                ReplanState::Stitch => {
                    let stitched = stitch_path(&mut ctx, &path, budget)?;
                    attempts_run += 1;
                    debug!(
                        attempt,
                        budget,
                        len = stitched.path.len(),
                        repaired = stitched.repaired,
                        unrepaired = stitched.unrepaired,
                        "replan attempt"
                    );
                    path = stitched.path;
                    if config.shorten {
                        ReplanState::Shorten
                    } else {
                        ReplanState::ValidityCheck
                    }
                }
                ReplanState::Shorten => {
                    path = shorten_path(ctx.checker, path);
                    ReplanState::ValidityCheck
                }
                ReplanState::ValidityCheck => {
                    if is_feasible(ctx.checker, &path) {
                        ReplanState::Done
                    } else {
                        ReplanState::Retry
                    }
                }
                ReplanState::Retry => {
                    attempt += 1;
                    if attempt > config.max_replans {
                        ReplanState::Abort(Termination::BudgetExhausted)
                    } else {
                        ReplanState::EscalateBudget
                    }
                }
                ReplanState::Done => break Termination::Solved,
                ReplanState::Abort(reason) => break reason,
            };
        };

        let approximate = outcome != Termination::Solved;
        let approximate_difference = if approximate {
            remaining_distance(ctx.checker, &path, goal)
        } else {
            None
        };
        match outcome {
            Termination::Solved => info!(
                "{}: Found exact solution with {} states after {} attempts",
                self.name,
                path.len(),
                attempts_run
            ),
            Termination::BudgetExhausted => warn!(
                "{}: Attempt budget exhausted after {} attempts, reporting approximate solution",
                self.name, attempts_run
            ),
            Termination::Cancelled => warn!(
                "{}: Termination requested after {} attempts, reporting approximate solution",
                self.name, attempts_run
            ),
        }

        Ok(PlannerSolution {
            path,
            approximate,
            approximate_difference,
            attempts: attempts_run,
            termination: outcome,
            planner_name: self.name.clone(),
        })
    }
}

impl<V: ValidityChecker, P: MotionPredictor> PathPlanner for NeuralReplanner<V, P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn solve(
        &mut self,
        pdef: &mut ProblemDefinition,
        termination: &dyn TerminationCondition,
    ) -> PlanningResult<PlannerStatus> {
        let valid_starts: Vec<Configuration> = pdef
            .starts
            .iter()
            .filter(|s| self.checker.is_valid_state(s))
            .copied()
            .collect();
        let start = match valid_starts.first() {
            Some(start) => *start,
            None => {
                error!("{}: There are no valid initial states!", self.name);
                return Err(PlanningError::NoValidStart);
            }
        };
        info!(
            "{}: Starting planning with {} valid start states",
            self.name,
            valid_starts.len()
        );

        let goal = pdef.goal;
        let solution = self.replan(start, &goal, termination)?;
        let status = if solution.approximate {
            PlannerStatus::approximate()
        } else {
            PlannerStatus::exact()
        };
        pdef.add_solution_path(solution);
        Ok(status)
    }
}
