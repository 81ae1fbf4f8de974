//! Segment-wise repair of a coarse path
//!
//! Interior configurations that fail the state check are dropped, then every
//! consecutive pair that cannot be joined directly is replaced by the output
//! of a bidirectional extension. Directly connectable segments are kept as
//! they are.

use itertools::Itertools;
use tracing::trace;

use crate::common::{ConfigPath, Configuration, PlanningResult};

use super::context::ReplanContext;
use super::extender::extend_bidirectional;

/// Repaired path plus per-segment bookkeeping
#[derive(Debug, Clone)]
pub struct StitchOutcome {
    pub path: ConfigPath,
    /// Interior configurations removed by the state filter
    pub dropped: usize,
    /// Segments replaced by a connected extension
    pub repaired: usize,
    /// Segments whose extension ran out of budget
    pub unrepaired: usize,
}

/// Repair every invalid segment of `path`, giving each extension `max_steps`
/// iterations.
///
/// The first and last configurations are always kept so the path stays
/// anchored at the start and goal.
pub fn stitch_path(
    ctx: &mut ReplanContext<'_>,
    path: &ConfigPath,
    max_steps: usize,
) -> PlanningResult<StitchOutcome> {
    let mut outcome = StitchOutcome {
        path: path.clone(),
        dropped: 0,
        repaired: 0,
        unrepaired: 0,
    };
    if path.len() < 2 {
        return Ok(outcome);
    }

    let last = path.len() - 1;
    let filtered: Vec<Configuration> = path
        .states
        .iter()
        .enumerate()
        .filter(|&(i, state)| i == 0 || i == last || ctx.checker.is_valid_state(state))
        .map(|(_, state)| *state)
        .collect();
    outcome.dropped = path.len() - filtered.len();

    let mut stitched = Vec::with_capacity(filtered.len());
    stitched.push(filtered[0]);
    for (from, to) in filtered.iter().tuple_windows() {
        if ctx.checker.is_valid_motion(from, to) {
            stitched.push(*to);
            continue;
        }
        let extension = extend_bidirectional(ctx, from, to, max_steps)?;
        if extension.connected {
            outcome.repaired += 1;
        } else {
            outcome.unrepaired += 1;
        }
        stitched.extend(extension.path.states.into_iter().skip(1));
    }

    trace!(
        input = path.len(),
        output = stitched.len(),
        dropped = outcome.dropped,
        repaired = outcome.repaired,
        unrepaired = outcome.unrepaired,
        "stitched path"
    );
    outcome.path = ConfigPath::from_states(stitched);
    Ok(outcome)
}
