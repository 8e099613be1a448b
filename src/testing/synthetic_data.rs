//! Synthetic focus stacks with known depth
//!
//! The scene is a block texture whose in-focus stack index grows linearly
//! from the left edge (index 0) to the right edge (index `len - 1`). Texture
//! contrast falls off as a Gaussian of the distance to that index, which is
//! what a real lens sweep does to fine detail.

use crate::distance::FocusDistance;
use crate::errors::Result;
use crate::map::FloatMap;
use crate::stack::ImageStack;
use image::{GrayImage, Luma};

/// Gray level the texture oscillates around
pub const BASE_LEVEL: u8 = 128;

/// Peak texture contrast of an in-focus pixel
pub const PEAK_CONTRAST: f32 = 100.0;

/// Defocus falloff in stack indices
pub const DEFOCUS_SIGMA: f32 = 1.0;

/// In-focus index of column `x` in a `width`-wide, `len`-deep synthetic stack.
pub fn synthetic_focus_index(x: usize, width: usize, len: usize) -> f32 {
    if width < 2 {
        return 0.0;
    }
    x as f32 * (len as f32 - 1.0) / (width as f32 - 1.0)
}

/// Focus-swept stack of a depth ramp along x.
pub fn synthetic_stack(width: u32, height: u32, len: usize) -> Result<ImageStack> {
    let images = (0..len)
        .map(|i| {
            GrayImage::from_fn(width, height, |x, y| {
                let focus = synthetic_focus_index(x as usize, width as usize, len);
                let defocus = (i as f32 - focus) / DEFOCUS_SIGMA;
                let contrast = PEAK_CONTRAST * (-0.5 * defocus * defocus).exp();
                let sign = if (x / 2 + y / 2) % 2 == 0 { 1.0 } else { -1.0 };
                let v = BASE_LEVEL as f32 + sign * contrast;
                Luma([v.round().clamp(0.0, 255.0) as u8])
            })
        })
        .collect();
    ImageStack::new(images)
}

/// Ground-truth depth of [`synthetic_stack`] under `distance`.
pub fn synthetic_depth(width: u32, height: u32, len: usize, distance: &dyn FocusDistance) -> FloatMap {
    FloatMap::from_fn(width as usize, height as usize, |x, _| {
        distance.distance(synthetic_focus_index(x, width as usize, len))
    })
}

/// Uniform gray stack where the left neighbour of `(x, y)` is offset by
/// `offsets[i]` levels in image `i`.
///
/// With the gradient measure and a 1×1 window the focus score of `(x, y)` in
/// image `i` is `(offsets[i] / 2)²`.
pub fn single_pixel_peak_stack(
    width: u32,
    height: u32,
    x: u32,
    y: u32,
    offsets: &[u8],
) -> Result<ImageStack> {
    let images = offsets
        .iter()
        .map(|&offset| {
            let mut image = GrayImage::from_pixel(width, height, Luma([BASE_LEVEL]));
            if x > 0 {
                image.put_pixel(x - 1, y, Luma([BASE_LEVEL.saturating_add(offset)]));
            }
            image
        })
        .collect();
    ImageStack::new(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::LinearFocusDistance;

    #[test]
    fn test_stack_shape() {
        let stack = synthetic_stack(20, 10, 5).unwrap();
        assert_eq!(stack.len(), 5);
        assert_eq!(stack.dimensions(), (20, 10));
    }

    #[test]
    fn test_focus_index_spans_stack() {
        assert_eq!(synthetic_focus_index(0, 11, 6), 0.0);
        assert_eq!(synthetic_focus_index(10, 11, 6), 5.0);
        assert_eq!(synthetic_focus_index(3, 1, 6), 0.0);
    }

    #[test]
    fn test_contrast_peaks_at_focus_index() {
        let stack = synthetic_stack(11, 4, 6).unwrap();
        // Column 10 is in focus in the last image
        let first = stack.images()[0].get_pixel(10, 0)[0] as i32;
        let last = stack.images()[5].get_pixel(10, 0)[0] as i32;
        assert!((last - BASE_LEVEL as i32).abs() > (first - BASE_LEVEL as i32).abs());
    }

    #[test]
    fn test_ground_truth() {
        let depth = synthetic_depth(11, 2, 6, &LinearFocusDistance::new(1.0, 2.0));
        assert_eq!(depth.get(0, 1), 1.0);
        assert_eq!(depth.get(10, 0), 11.0);
    }
}
