//! Focus measures
//!
//! Turns a focus-swept stack into a focus volume: one sharpness map per
//! stack image, aligned by index with the stack.
//!
//! Two measures are provided:
//! - Gradient: squared central-difference magnitude, summed over a window
//! - Variance: local sum of squared deviations from the window mean
pub mod gradient;
pub mod variance;

pub use gradient::GradientFocusMeasure;
pub use variance::VarianceFocusMeasure;

use crate::assert_invariant;
use crate::errors::{DepthError, Result};
use crate::map::FloatMap;
use crate::stack::ImageStack;
use image::GrayImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Per-image sharpness measure
pub trait FocusMeasure: Send + Sync {
    fn name(&self) -> &'static str;

    /// Sharpness map for a single image.
    fn measure_image(&self, image: &GrayImage, kernel_size: usize) -> Result<FloatMap>;

    /// Focus volume for a whole stack, one map per image in stack order.
    fn compute(&self, stack: &ImageStack, kernel_size: usize) -> Result<FocusVolume> {
        if kernel_size == 0 {
            return Err(DepthError::zero_kernel(self.name()));
        }

        log::info!(
            "Computing {} focus measure over {} images (k={})",
            self.name(),
            stack.len(),
            kernel_size
        );

        let maps = stack
            .images()
            .par_iter()
            .map(|image| self.measure_image(image, kernel_size))
            .collect::<Result<Vec<_>>>()?;

        let volume = FocusVolume::new(maps)?;
        assert_invariant!(
            volume.len() == stack.len(),
            "Focus volume length equals stack length",
            "focus::compute"
        );
        Ok(volume)
    }
}

/// Focus measure selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusMeasureKind {
    #[default]
    Gradient,
    Variance,
}

impl FocusMeasureKind {
    pub const ALL: [FocusMeasureKind; 2] = [FocusMeasureKind::Gradient, FocusMeasureKind::Variance];

    pub fn as_str(&self) -> &'static str {
        match self {
            FocusMeasureKind::Gradient => "gradient",
            FocusMeasureKind::Variance => "variance",
        }
    }

    pub fn measure(&self) -> Box<dyn FocusMeasure> {
        match self {
            FocusMeasureKind::Gradient => Box::new(GradientFocusMeasure),
            FocusMeasureKind::Variance => Box::new(VarianceFocusMeasure),
        }
    }

    pub fn compute(&self, stack: &ImageStack, kernel_size: usize) -> Result<FocusVolume> {
        self.measure().compute(stack, kernel_size)
    }
}

impl fmt::Display for FocusMeasureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FocusMeasureKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gradient" => Ok(FocusMeasureKind::Gradient),
            "variance" => Ok(FocusMeasureKind::Variance),
            _ => Err(format!("unknown focus measure: {}", s)),
        }
    }
}

/// One focus map per stack image, all of the same size
#[derive(Debug, Clone)]
pub struct FocusVolume {
    maps: Vec<FloatMap>,
    width: usize,
    height: usize,
}

impl FocusVolume {
    pub fn new(maps: Vec<FloatMap>) -> Result<Self> {
        let first = maps.first().ok_or(DepthError::InsufficientImages {
            required: 1,
            provided: 0,
        })?;
        let (width, height) = (first.width(), first.height());

        for map in &maps[1..] {
            first.ensure_same_size(map)?;
        }

        Ok(Self {
            maps,
            width,
            height,
        })
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn maps(&self) -> &[FloatMap] {
        &self.maps
    }

    pub fn map(&self, index: usize) -> Option<&FloatMap> {
        self.maps.get(index)
    }

    /// Focus scores of pixel `(x, y)` across the stack, in stack order.
    pub fn scores_at(&self, x: usize, y: usize) -> Vec<f32> {
        let mut scores = Vec::with_capacity(self.maps.len());
        self.scores_into(x, y, &mut scores);
        scores
    }

    /// Like [`scores_at`](Self::scores_at) but reuses `out`.
    pub fn scores_into(&self, x: usize, y: usize, out: &mut Vec<f32>) {
        out.clear();
        out.extend(self.maps.iter().map(|m| m.get(x, y)));
    }

    /// Bounds-checked [`scores_at`](Self::scores_at).
    pub fn try_scores_at(&self, x: usize, y: usize) -> Result<Vec<f32>> {
        if x >= self.width || y >= self.height {
            return Err(DepthError::InvalidArgument(format!(
                "pixel ({}, {}) outside {}x{} volume",
                x, y, self.width, self.height
            )));
        }
        Ok(self.scores_at(x, y))
    }
}

/// Image as a float map of raw intensity levels.
pub(crate) fn to_float_map(image: &GrayImage) -> FloatMap {
    let (width, height) = image.dimensions();
    FloatMap::from_fn(width as usize, height as usize, |x, y| {
        image.get_pixel(x as u32, y as u32)[0] as f32
    })
}
