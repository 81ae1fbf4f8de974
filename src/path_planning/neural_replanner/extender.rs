//! Bidirectional neural extension between two configurations
//!
//! Two frontiers grow toward each other, start side first, each step asking
//! the predictor for the next configuration toward the opposite frontier.
//! Candidates failing the state check, or carrying a zero-norm orientation,
//! are dropped and that frontier stays put. After every pair of half-steps the frontiers are tested for a direct
//! connection.

use tracing::trace;

use crate::common::{ConfigPath, Configuration, PlanningError, PlanningResult};

use super::context::ReplanContext;

/// Result of one bidirectional extension
#[derive(Debug, Clone)]
pub struct Extension {
    /// Path from the original start to the original goal
    pub path: ConfigPath,
    /// Whether the two frontiers were joined
    pub connected: bool,
    /// Number of iterations used
    pub steps: usize,
}

/// Grow two frontiers from `start` and `goal` until they can be joined
/// directly or `max_steps` iterations have been spent.
///
/// On failure the grown configurations are discarded and the returned path
/// is just `[start, goal]`.
pub fn extend_bidirectional(
    ctx: &mut ReplanContext<'_>,
    start: &Configuration,
    goal: &Configuration,
    max_steps: usize,
) -> PlanningResult<Extension> {
    let mut start_side = vec![*start];
    let mut goal_side = vec![*goal];
    let mut connected = false;
    let mut steps = 0;

    while steps < max_steps {
        let start_front = *last(&start_side);
        let goal_front = *last(&goal_side);
        if let Some(candidate) = propose(ctx, &start_front, &goal_front)? {
            start_side.push(candidate);
        }

        let start_front = *last(&start_side);
        if let Some(candidate) = propose(ctx, &goal_front, &start_front)? {
            goal_side.push(candidate);
        }

        if ctx.checker.is_valid_motion(last(&start_side), last(&goal_side)) {
            connected = true;
            break;
        }
        steps += 1;
    }

    if !connected {
        trace!(
            steps,
            discarded = start_side.len() + goal_side.len() - 2,
            "extension budget exhausted, falling back to endpoints"
        );
        return Ok(Extension {
            path: ConfigPath::endpoints(*start, *goal),
            connected: false,
            steps,
        });
    }

    trace!(
        steps,
        start_side = start_side.len(),
        goal_side = goal_side.len(),
        "frontiers connected"
    );
    let joined: Vec<Configuration> = start_side
        .into_iter()
        .chain(goal_side.into_iter().rev())
        .collect();
    Ok(Extension {
        path: ConfigPath::from_states(merge_coincident(joined, ctx.merge_tolerance)),
        connected: true,
        steps,
    })
}

/// Predicted next configuration from `from` toward `toward`, or `None` when
/// the prediction is unusable or fails the state check
fn propose(
    ctx: &mut ReplanContext<'_>,
    from: &Configuration,
    toward: &Configuration,
) -> PlanningResult<Option<Configuration>> {
    let candidate = match ctx.predict(from, toward) {
        Ok(candidate) => candidate,
        Err(PlanningError::DegenerateOrientation(norm)) => {
            trace!(norm, "discarding prediction with degenerate orientation");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };
    Ok(Some(candidate).filter(|c| ctx.checker.is_valid_state(c)))
}

fn last(side: &[Configuration]) -> &Configuration {
    // Each side starts with its anchor and only ever grows.
    &side[side.len() - 1]
}

/// Collapse runs of coincident configurations, keeping the first one of each
/// run. The final configuration is always the last input (the goal anchor).
fn merge_coincident(states: Vec<Configuration>, tolerance: f64) -> Vec<Configuration> {
    let total = states.len();
    let mut merged: Vec<Configuration> = Vec::with_capacity(total);
    for (i, state) in states.into_iter().enumerate() {
        let is_goal = i + 1 == total;
        let coincident = merged
            .last()
            .map_or(false, |prev| prev.approx_eq(&state, tolerance));
        if !coincident || (is_goal && merged.len() == 1) {
            merged.push(state);
        } else if is_goal {
            let end = merged.len() - 1;
            merged[end] = state;
        }
    }
    merged
}
