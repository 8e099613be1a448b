//! Brute-force median filter for float maps.
//!
//! The window spans `[i - k/2, i + k/2)` on each axis, a half-open range, so
//! for odd `k` it holds `(k-1)²` samples and for even `k` exactly `k²`,
//! both biased towards the top-left neighbour. Out-of-range coordinates are
//! clamped to the nearest row/column. When `k/2 == 0` the window collapses
//! to the centre pixel and the filter is the identity.

use crate::map::FloatMap;
use rayon::prelude::*;

pub fn median_blur(src: &FloatMap, kernel_size: usize) -> FloatMap {
    let half = (kernel_size / 2) as isize;
    if half == 0 {
        return src.clone();
    }

    let width = src.width();
    let height = src.height();
    let max_x = width as isize - 1;
    let max_y = height as isize - 1;

    let mut dst = FloatMap::zeros(width, height);
    if width == 0 || height == 0 {
        return dst;
    }

    dst.as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, out_row)| {
            let mut window = Vec::with_capacity((2 * half * 2 * half) as usize);
            for (x, out) in out_row.iter_mut().enumerate() {
                window.clear();
                for wy in (y as isize - half)..(y as isize + half) {
                    let sy = wy.clamp(0, max_y) as usize;
                    let row = src.row(sy);
                    for wx in (x as isize - half)..(x as isize + half) {
                        window.push(row[wx.clamp(0, max_x) as usize]);
                    }
                }
                window.sort_unstable_by(f32::total_cmp);
                *out = window[window.len() / 2];
            }
        });

    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_window_is_identity() {
        let src = FloatMap::from_fn(5, 4, |x, y| (x * x + 3 * y) as f32);
        assert_eq!(median_blur(&src, 0), src);
        assert_eq!(median_blur(&src, 1), src);
    }

    #[test]
    fn test_removes_isolated_spike() {
        let mut src = FloatMap::filled(7, 7, 1.0);
        src.set(3, 3, 100.0);
        let out = median_blur(&src, 4);
        assert!(out.as_slice().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_window_is_half_open() {
        // k = 2: the 2x2 window covers the pixel and its upper-left
        // neighbours; the upper of the two middle samples is taken.
        let src = FloatMap::from_fn(4, 4, |x, y| (y * 4 + x) as f32);
        let out = median_blur(&src, 2);
        // {5, 6, 9, 10}
        assert_eq!(out.get(2, 2), src.get(1, 2));
        // {2, 3, 6, 7}
        assert_eq!(out.get(3, 1), src.get(2, 1));
        // Clamped corner sees only (0, 0)
        assert_eq!(out.get(0, 0), src.get(0, 0));
    }

    #[test]
    fn test_window_excludes_lower_right_neighbours() {
        let mut src = FloatMap::zeros(4, 4);
        src.set(3, 2, 50.0);
        src.set(2, 3, 50.0);
        src.set(3, 3, 50.0);
        // The window at (2, 2) is [1, 3) on both axes, so none of the 50s are in it
        assert_eq!(median_blur(&src, 2).get(2, 2), 0.0);
        // At (3, 3) three of the four samples are 50
        assert_eq!(median_blur(&src, 2).get(3, 3), 50.0);
    }
}
