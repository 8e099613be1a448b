//! Depth map smoothing and shared image kernels
//!
//! Provides the smoothing applied to a raw depth map before error analysis:
//! 1. None: identity copy
//! 2. Box: window mean
//! 3. Gaussian: separable blur, sigma derived from the kernel size
//! 4. Median: brute-force window median
//!
//! The convolution primitives are shared with the focus measures and the
//! stack pre-filter.
pub mod convolve;
pub mod gaussian;
pub mod median;

pub use convolve::{border_index, box_filter, convolve_separable, BorderMode};
pub use gaussian::{gaussian_blur, gaussian_blur_u8, gaussian_kernel};
pub use median::median_blur;

use crate::errors::Result;
use crate::map::FloatMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Smoothing applied to the raw depth map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    None,
    Box,
    Gaussian,
    #[default]
    Median,
}

impl FilterType {
    pub const ALL: [FilterType; 4] = [
        FilterType::None,
        FilterType::Box,
        FilterType::Gaussian,
        FilterType::Median,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::None => "none",
            FilterType::Box => "box",
            FilterType::Gaussian => "gaussian",
            FilterType::Median => "median",
        }
    }

    /// Smooth `depth` with this filter.
    ///
    /// `None` ignores the kernel size. `Box` needs a positive kernel,
    /// `Gaussian` an odd positive one; `Median` accepts any size.
    pub fn apply(&self, depth: &FloatMap, kernel_size: usize) -> Result<FloatMap> {
        log::debug!(
            "Filtering {}x{} depth map: {} k={}",
            depth.width(),
            depth.height(),
            self.as_str(),
            kernel_size
        );

        match self {
            FilterType::None => Ok(depth.clone()),
            FilterType::Box => box_filter(depth, kernel_size, true, BorderMode::Reflect101),
            FilterType::Gaussian => gaussian_blur(depth, kernel_size),
            FilterType::Median => Ok(median_blur(depth, kernel_size)),
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        FilterType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown filter type: {}", s))
    }
}
