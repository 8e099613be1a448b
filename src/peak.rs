//! Sub-sample peak refinement by 3-point Gaussian interpolation.
//!
//! Fitting `y = A·exp(-(x - s)² / 2σ²)` through three samples gives the peak
//! location in closed form from the logarithms of the sample ratios.

use crate::errors::{DepthError, Result};
use serde::{Deserialize, Serialize};

/// Result of a three-point Gaussian fit.
///
/// Only `location` is estimated; `amplitude` and `width` are reported as 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianPeak {
    pub location: f32,
    pub amplitude: f32,
    pub width: f32,
}

impl GaussianPeak {
    fn at(location: f32) -> Self {
        Self {
            location,
            amplitude: 1.0,
            width: 1.0,
        }
    }
}

/// Locate the peak of the Gaussian through `(x[i], y[i])`.
///
/// `x` must hold three strictly increasing abscissas and `y` three samples.
/// When the closed form is undefined (a zero sample or a flat log-ratio) the
/// abscissa of the largest sample is returned instead.
pub fn refine_peak(x: &[f32], y: &[f32]) -> Result<GaussianPeak> {
    if x.len() != 3 || y.len() != 3 {
        return Err(DepthError::InvalidArgument(format!(
            "peak refinement needs 3 samples, got x={} y={}",
            x.len(),
            y.len()
        )));
    }
    if !(x[0] < x[1] && x[1] < x[2]) {
        return Err(DepthError::InvalidArgument(
            "peak abscissas must be strictly increasing".to_string(),
        ));
    }

    let [x0, x1, x2] = [x[0] as f64, x[1] as f64, x[2] as f64];
    let [y0, y1, y2] = [y[0] as f64, y[1] as f64, y[2] as f64];

    if y0 == 0.0 || y1 == 0.0 || y2 == 0.0 {
        return Ok(GaussianPeak::at(x[argmax(y)]));
    }

    let num = (y1 / y2).ln() * (x1 * x1 - x0 * x0) - (y1 / y0).ln() * (x1 * x1 - x2 * x2);
    let denom = 2.0 * (x2 - x1) * ((y1 * y1) / (y0 * y2)).ln();

    if denom == 0.0 || !denom.is_finite() || !num.is_finite() {
        return Ok(GaussianPeak::at(x[argmax(y)]));
    }

    Ok(GaussianPeak::at((num / denom) as f32))
}

/// Index of the first largest value.
pub fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}
