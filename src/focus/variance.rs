//! Local variance focus measure.
//!
//! The window mean comes from a normalized `k × k` box filter with mirrored
//! borders. Squared deviations from that mean are then summed over the
//! half-open span `[i - k/2, i + k/2)` on each axis, cut at the image edges.

use super::{to_float_map, FocusMeasure};
use crate::errors::Result;
use crate::filters::{box_filter, BorderMode};
use crate::map::FloatMap;
use image::GrayImage;
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, Default)]
pub struct VarianceFocusMeasure;

impl FocusMeasure for VarianceFocusMeasure {
    fn name(&self) -> &'static str {
        "variance"
    }

    fn measure_image(&self, image: &GrayImage, kernel_size: usize) -> Result<FloatMap> {
        let intensity = to_float_map(image);
        let mean = box_filter(&intensity, kernel_size, true, BorderMode::Reflect)?;
        Ok(local_deviation_energy(&intensity, &mean, kernel_size))
    }
}

/// Span of the summation window along one axis.
#[inline]
fn window_span(i: usize, len: usize, half: usize) -> (usize, usize) {
    let start = if i > half { i - half } else { 0 };
    let end = if i < len.saturating_sub(half) {
        i + half
    } else {
        len
    };
    (start, end)
}

fn local_deviation_energy(intensity: &FloatMap, mean: &FloatMap, kernel_size: usize) -> FloatMap {
    let width = intensity.width();
    let height = intensity.height();
    let half = kernel_size / 2;

    let mut out = FloatMap::zeros(width, height);
    if width == 0 {
        return out;
    }

    out.as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, out_row)| {
            let (y0, y1) = window_span(y, height, half);
            for (x, out) in out_row.iter_mut().enumerate() {
                let (x0, x1) = window_span(x, width, half);
                let center_mean = mean.get(x, y);
                let mut energy = 0.0f32;
                for sy in y0..y1 {
                    for &v in &intensity.row(sy)[x0..x1] {
                        let diff = v - center_mean;
                        energy += diff * diff;
                    }
                }
                *out = energy;
            }
        });

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_window_span() {
        assert_eq!(window_span(5, 10, 2), (3, 7));
        assert_eq!(window_span(0, 10, 2), (0, 2));
        assert_eq!(window_span(9, 10, 2), (7, 10));
        assert_eq!(window_span(1, 3, 5), (0, 3));
    }

    #[test]
    fn test_flat_image_has_zero_variance() {
        let image = GrayImage::from_pixel(8, 6, Luma([77]));
        let map = VarianceFocusMeasure.measure_image(&image, 5).unwrap();
        assert!(map.as_slice().iter().all(|&v| v.abs() < 1e-3));
    }

    #[test]
    fn test_textured_region_scores_higher() {
        let image = GrayImage::from_fn(16, 16, |x, y| {
            if x < 8 {
                Luma([if (x + y) % 2 == 0 { 40 } else { 200 }])
            } else {
                Luma([120])
            }
        });
        let map = VarianceFocusMeasure.measure_image(&image, 5).unwrap();
        assert!(map.get(3, 8) > 1000.0);
        assert!(map.get(13, 8) < 1e-3);
    }

    #[test]
    fn test_output_matches_image_size() {
        let image = GrayImage::new(9, 4);
        let map = VarianceFocusMeasure.measure_image(&image, 3).unwrap();
        assert_eq!((map.width(), map.height()), (9, 4));
    }
}
