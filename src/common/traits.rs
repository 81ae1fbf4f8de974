//! Common traits defining the collaborators of the replanner

use std::time::{Duration, Instant};

use crate::common::error::PlanningResult;
use crate::common::types::*;

/// State and motion validity queries (collision checking)
pub trait ValidityChecker {
    /// Whether a single configuration is collision free
    fn is_valid_state(&self, state: &Configuration) -> bool;

    /// Whether the straight-line motion between two configurations is collision free
    fn is_valid_motion(&self, from: &Configuration, to: &Configuration) -> bool;
}

impl<T: ValidityChecker + ?Sized> ValidityChecker for &T {
    fn is_valid_state(&self, state: &Configuration) -> bool {
        (**self).is_valid_state(state)
    }

    fn is_valid_motion(&self, from: &Configuration, to: &Configuration) -> bool {
        (**self).is_valid_motion(from, to)
    }
}

/// Learned model proposing an intermediate configuration
///
/// `input` is the flat vector `[obstacle encoding | start | goal]` with start
/// and goal already normalized. The returned raw vector is in normalized
/// space and has `CONFIG_DIM` components. Outputs may differ between calls
/// with the same input.
pub trait MotionPredictor {
    fn predict(&mut self, input: &[f64]) -> PlanningResult<Vec<f64>>;
}

impl<T: MotionPredictor + ?Sized> MotionPredictor for Box<T> {
    fn predict(&mut self, input: &[f64]) -> PlanningResult<Vec<f64>> {
        (**self).predict(input)
    }
}

/// Cooperative cancellation signal polled by planners
pub trait TerminationCondition {
    fn should_terminate(&self) -> bool;
}

/// Condition that never fires
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverTerminate;

impl TerminationCondition for NeverTerminate {
    fn should_terminate(&self) -> bool {
        false
    }
}

/// Wall-clock planning budget
///
/// A budget too large for the clock (including an infinite one) never fires.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutCondition {
    deadline: Option<Instant>,
}

impl TimeoutCondition {
    pub fn new(budget: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(budget),
        }
    }

    /// Negative and NaN budgets expire immediately
    pub fn from_secs_f64(seconds: f64) -> Self {
        match Duration::try_from_secs_f64(seconds.max(0.0)) {
            Ok(budget) => Self::new(budget),
            Err(_) => Self { deadline: None },
        }
    }
}

impl TerminationCondition for TimeoutCondition {
    fn should_terminate(&self) -> bool {
        self.deadline.map_or(false, |deadline| Instant::now() >= deadline)
    }
}

/// Adapter turning a closure into a termination condition
pub struct TerminationFn<F: Fn() -> bool>(pub F);

impl<F: Fn() -> bool> TerminationCondition for TerminationFn<F> {
    fn should_terminate(&self) -> bool {
        (self.0)()
    }
}

/// Trait for planners that solve a problem definition
pub trait PathPlanner {
    fn name(&self) -> &str;

    /// Plan until solved or `termination` fires, recording the result in `pdef`
    fn solve(
        &mut self,
        pdef: &mut ProblemDefinition,
        termination: &dyn TerminationCondition,
    ) -> PlanningResult<PlannerStatus>;

    /// Drop any state kept from a previous run
    fn clear(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_timeout_condition() {
        assert!(TimeoutCondition::new(Duration::from_secs(0)).should_terminate());
        assert!(!TimeoutCondition::new(Duration::from_secs(3600)).should_terminate());
        assert!(TimeoutCondition::from_secs_f64(-1.0).should_terminate());
        assert!(TimeoutCondition::from_secs_f64(f64::NAN).should_terminate());
    }

    #[test]
    fn test_unbounded_timeout_never_fires() {
        assert!(!TimeoutCondition::from_secs_f64(f64::INFINITY).should_terminate());
        assert!(!TimeoutCondition::from_secs_f64(1e300).should_terminate());
        assert!(!TimeoutCondition::new(Duration::MAX).should_terminate());
    }

    #[test]
    fn test_termination_fn() {
        let polls = Cell::new(0);
        let condition = TerminationFn(|| {
            polls.set(polls.get() + 1);
            polls.get() > 2
        });
        assert!(!condition.should_terminate());
        assert!(!condition.should_terminate());
        assert!(condition.should_terminate());
        assert!(!NeverTerminate.should_terminate());
    }
}
