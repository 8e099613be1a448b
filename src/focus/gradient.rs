//! Gradient energy focus measure.
//!
//! Per pixel, `g = |left - right| / 2 + |up - down| / 2` in integer levels,
//! with a missing neighbour replaced by the centre value. `g²` is then summed
//! (not averaged) over a `k × k` window.

use super::FocusMeasure;
use crate::errors::Result;
use crate::filters::{box_filter, BorderMode};
use crate::map::FloatMap;
use image::GrayImage;
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, Default)]
pub struct GradientFocusMeasure;

impl FocusMeasure for GradientFocusMeasure {
    fn name(&self) -> &'static str {
        "gradient"
    }

    fn measure_image(&self, image: &GrayImage, kernel_size: usize) -> Result<FloatMap> {
        let mut energy = gradient_magnitude(image);
        for v in energy.as_mut_slice() {
            *v *= *v;
        }
        box_filter(&energy, kernel_size, false, BorderMode::Reflect101)
    }
}

/// Central-difference gradient magnitude proxy with clamp-to-centre edges.
pub fn gradient_magnitude(image: &GrayImage) -> FloatMap {
    let width = image.width() as usize;
    let height = image.height() as usize;
    let raw = image.as_raw();
    let at = |x: usize, y: usize| raw[y * width + x] as i32;

    let mut out = FloatMap::zeros(width, height);
    if width == 0 {
        return out;
    }

    out.as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, out_row)| {
            for (x, out) in out_row.iter_mut().enumerate() {
                let center = at(x, y);
                let left = if x > 0 { at(x - 1, y) } else { center };
                let right = if x + 1 < width { at(x + 1, y) } else { center };
                let up = if y > 0 { at(x, y - 1) } else { center };
                let down = if y + 1 < height { at(x, y + 1) } else { center };

                let g = (left - right).abs() / 2 + (up - down).abs() / 2;
                *out = g as f32;
            }
        });

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_flat_image_has_no_energy() {
        let image = GrayImage::from_pixel(6, 5, Luma([120]));
        let map = GradientFocusMeasure.measure_image(&image, 3).unwrap();
        assert!(map.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_integer_halving() {
        // |0 - 3| / 2 truncates to 1
        let image = GrayImage::from_raw(3, 1, vec![0, 9, 3]).unwrap();
        let g = gradient_magnitude(&image);
        assert_eq!(g.get(1, 0), 1.0);
        // Edges use the centre value for the missing neighbour
        assert_eq!(g.get(0, 0), 4.0);
        assert_eq!(g.get(2, 0), 3.0);
    }

    #[test]
    fn test_kernel_one_is_squared_gradient() {
        let mut image = GrayImage::from_pixel(5, 5, Luma([100]));
        image.put_pixel(1, 2, Luma([104]));
        let map = GradientFocusMeasure.measure_image(&image, 1).unwrap();
        // Left neighbour of (2,2) differs by 4, g = 2, g² = 4
        assert_eq!(map.get(2, 2), 4.0);
    }

    #[test]
    fn test_window_sums_energy() {
        let mut image = GrayImage::from_pixel(7, 7, Luma([100]));
        image.put_pixel(2, 3, Luma([104]));
        let point = GradientFocusMeasure.measure_image(&image, 1).unwrap();
        let summed = GradientFocusMeasure.measure_image(&image, 3).unwrap();

        let mut expected = 0.0;
        for y in 2..=4 {
            for x in 2..=4 {
                expected += point.get(x, y);
            }
        }
        assert_eq!(summed.get(3, 3), expected);
    }
}
