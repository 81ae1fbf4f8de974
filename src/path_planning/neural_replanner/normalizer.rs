//! Mapping between world configurations and the predictor's normalized space
//!
//! Positions are scaled into `[-1, 1]` per axis using the workspace bounds.
//! Orientations are only rescaled to unit norm, in both directions.

use nalgebra::Vector3;

use crate::common::{Configuration, PlanningError, PlanningResult, CONFIG_DIM, POSITION_DIM};

/// Lower bounds of the indoor "home" scene workspace
pub const HOME_LOWER_BOUND: [f64; POSITION_DIM] = [-383.8, -371.47, -0.2];
/// Upper bounds of the indoor "home" scene workspace
pub const HOME_UPPER_BOUND: [f64; POSITION_DIM] = [324.0, 337.89, 142.33];

/// Per-axis (lower bound, half range) of the workspace
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationBounds {
    lower: Vector3<f64>,
    half_range: Vector3<f64>,
}

impl NormalizationBounds {
    pub fn from_limits(lower: [f64; POSITION_DIM], upper: [f64; POSITION_DIM]) -> PlanningResult<Self> {
        for i in 0..POSITION_DIM {
            if !(upper[i] > lower[i]) || !lower[i].is_finite() || !upper[i].is_finite() {
                return Err(PlanningError::InvalidParameter(format!(
                    "bound {}: upper ({}) must be greater than lower ({})",
                    i, upper[i], lower[i]
                )));
            }
        }
        let lower = Vector3::from(lower);
        let upper = Vector3::from(upper);
        Ok(Self {
            lower,
            half_range: (upper - lower) / 2.0,
        })
    }

    pub fn lower(&self) -> Vector3<f64> {
        self.lower
    }

    pub fn upper(&self) -> Vector3<f64> {
        self.lower + self.half_range * 2.0
    }

    pub fn half_range(&self) -> Vector3<f64> {
        self.half_range
    }
}

impl Default for NormalizationBounds {
    fn default() -> Self {
        let lower = Vector3::from(HOME_LOWER_BOUND);
        let upper = Vector3::from(HOME_UPPER_BOUND);
        Self {
            lower,
            half_range: (upper - lower) / 2.0,
        }
    }
}

/// Converts configurations to and from predictor space
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Normalizer {
    bounds: NormalizationBounds,
}

impl Normalizer {
    pub fn new(bounds: NormalizationBounds) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> &NormalizationBounds {
        &self.bounds
    }

    /// `n_i = (x_i - lower_i) / half_range_i - 1`, orientation rescaled to unit norm
    pub fn normalize(&self, state: &Configuration) -> PlanningResult<[f64; CONFIG_DIM]> {
        let orientation = unit_orientation(&state.to_array()[POSITION_DIM..])?;
        let mut out = [0.0; CONFIG_DIM];
        for i in 0..POSITION_DIM {
            out[i] = (state.position[i] - self.bounds.lower[i]) / self.bounds.half_range[i] - 1.0;
        }
        out[POSITION_DIM..].copy_from_slice(&orientation);
        Ok(out)
    }

    /// Inverse of `normalize` for the position; the orientation is only
    /// rescaled to unit norm, not transformed back.
    pub fn denormalize(&self, raw: &[f64]) -> PlanningResult<Configuration> {
        if raw.len() != CONFIG_DIM {
            return Err(PlanningError::DimensionMismatch {
                expected: CONFIG_DIM,
                actual: raw.len(),
            });
        }
        let orientation = unit_orientation(&raw[POSITION_DIM..])?;
        let mut out = [0.0; CONFIG_DIM];
        for i in 0..POSITION_DIM {
            out[i] = (raw[i] + 1.0) * self.bounds.half_range[i] + self.bounds.lower[i];
        }
        out[POSITION_DIM..].copy_from_slice(&orientation);
        Configuration::from_slice(&out)
    }
}

fn unit_orientation(q: &[f64]) -> PlanningResult<[f64; 4]> {
    let norm = q.iter().map(|v| v * v).sum::<f64>().sqrt();
    if !norm.is_finite() || norm < crate::common::MIN_ORIENTATION_NORM {
        return Err(PlanningError::DegenerateOrientation(norm));
    }
    Ok([q[0] / norm, q[1] / norm, q[2] / norm, q[3] / norm])
}
