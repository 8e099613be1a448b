//! Min–max rescale of float maps to 8-bit display images.

use crate::map::FloatMap;
use image::{GrayImage, Luma};

/// Linearly map `[min, max]` of `map` onto `[0, 255]`.
///
/// A constant map has no range to stretch and comes out all black.
pub fn normalize_to_u8(map: &FloatMap) -> GrayImage {
    let width = map.width() as u32;
    let height = map.height() as u32;

    let Some((min, max)) = map.min_max() else {
        return GrayImage::new(width, height);
    };

    let range = max as f64 - min as f64;
    let scale = if range > f64::EPSILON {
        255.0 / range
    } else {
        0.0
    };
    let shift = -(min as f64) * scale;

    GrayImage::from_fn(width, height, |x, y| {
        let v = map.get(x as usize, y as usize) as f64 * scale + shift;
        Luma([v.round().clamp(0.0, 255.0) as u8])
    })
}
