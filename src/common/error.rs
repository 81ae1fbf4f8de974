//! Error types for neural_replanning

use thiserror::Error;

/// Main error type for the replanning pipeline
///
/// Expected planning outcomes (a segment that cannot be connected, an
/// exhausted step or attempt budget, a cancellation) are not errors: they are
/// reported through the returned solution. Only inputs the planner cannot work
/// with end up here.
#[derive(Debug, Error)]
pub enum PlanningError {
    /// Orientation sub-vector has zero (or non-finite) norm
    #[error("degenerate orientation: quaternion norm is {0}")]
    DegenerateOrientation(f64),
    /// No start configuration passes the validity checker
    #[error("there are no valid initial states")]
    NoValidStart,
    /// A raw vector does not have the expected length
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    /// Invalid parameter
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// The predictor could not produce an output
    #[error("predictor error: {0}")]
    Predictor(String),
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed numeric text input
    #[error("parse error: {0}")]
    Parse(String),
    /// Malformed scenario or planner configuration
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),
    /// Visualization error
    #[error("visualization error: {0}")]
    Visualization(String),
}

/// Result type alias for planning operations
pub type PlanningResult<T> = Result<T, PlanningError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlanningError::DimensionMismatch { expected: 7, actual: 6 };
        assert_eq!(format!("{}", err), "dimension mismatch: expected 7, got 6");
        assert_eq!(
            format!("{}", PlanningError::NoValidStart),
            "there are no valid initial states"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PlanningError = io_err.into();
        assert!(matches!(err, PlanningError::Io(_)));
    }
}
