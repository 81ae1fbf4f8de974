//! Lazy vertex contraction
//!
//! Repeatedly finds the first pair `(i, j)`, scanning `i` upward and `j`
//! downward from the end, whose direct segment is valid, and removes every
//! configuration strictly between them. The scan restarts on the shortened
//! path until no contraction applies. Each contraction removes at least one
//! configuration, so the loop runs at most `len - 2` times.

use tracing::trace;

use crate::common::{ConfigPath, Configuration, ValidityChecker};

/// Remove redundant intermediate configurations from `path`
///
/// The result is a subsequence of the input with the same endpoints.
pub fn shorten_path(checker: &dyn ValidityChecker, path: ConfigPath) -> ConfigPath {
    let mut states = path.states;
    let original = states.len();
    let mut contractions = 0;

    while let Some((i, j)) = find_contraction(checker, &states) {
        states.drain(i + 1..j);
        contractions += 1;
    }

    if contractions > 0 {
        trace!(original, shortened = states.len(), contractions, "contracted path");
    }
    ConfigPath::from_states(states)
}

fn find_contraction(checker: &dyn ValidityChecker, states: &[Configuration]) -> Option<(usize, usize)> {
    let n = states.len();
    for i in 0..n.saturating_sub(2) {
        for j in (i + 2..n).rev() {
            if checker.is_valid_motion(&states[i], &states[j]) {
                return Some((i, j));
            }
        }
    }
    None
}
