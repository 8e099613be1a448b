//! Separable convolution with explicit border handling.
//!
//! Kernels are anchored at `len / 2`, so an even-length kernel reaches one
//! sample further towards negative offsets than positive ones.

use crate::errors::{DepthError, Result};
use crate::map::FloatMap;
use rayon::prelude::*;

/// How samples outside the map are synthesized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderMode {
    /// `dcb|abcd|cba` (edge sample not repeated)
    Reflect101,
    /// `cba|abcd|dcb` (edge sample repeated)
    Reflect,
    /// `aaa|abcd|ddd`
    Replicate,
}

/// Map a possibly out-of-range coordinate onto `0..len`.
#[inline]
pub fn border_index(index: isize, len: usize, mode: BorderMode) -> usize {
    let n = len as isize;
    if n == 1 {
        return 0;
    }
    match mode {
        BorderMode::Replicate => index.clamp(0, n - 1) as usize,
        BorderMode::Reflect101 => {
            let mut i = index;
            loop {
                if i < 0 {
                    i = -i;
                } else if i >= n {
                    i = 2 * n - 2 - i;
                } else {
                    return i as usize;
                }
            }
        }
        BorderMode::Reflect => {
            let mut i = index;
            loop {
                if i < 0 {
                    i = -i - 1;
                } else if i >= n {
                    i = 2 * n - 1 - i;
                } else {
                    return i as usize;
                }
            }
        }
    }
}

/// Convolve rows with `kernel_x`, then columns with `kernel_y`.
pub fn convolve_separable(
    src: &FloatMap,
    kernel_x: &[f64],
    kernel_y: &[f64],
    border: BorderMode,
) -> FloatMap {
    let width = src.width();
    let height = src.height();
    if width == 0 || height == 0 {
        return src.clone();
    }

    let anchor_x = (kernel_x.len() / 2) as isize;
    let anchor_y = (kernel_y.len() / 2) as isize;

    // Column indices are the same for every row, resolve them once.
    let x_taps: Vec<Vec<usize>> = (0..width as isize)
        .map(|x| {
            (0..kernel_x.len() as isize)
                .map(|k| border_index(x + k - anchor_x, width, border))
                .collect()
        })
        .collect();

    let mut horizontal = vec![0.0f64; width * height];
    horizontal
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, out_row)| {
            let row = src.row(y);
            for (x, out) in out_row.iter_mut().enumerate() {
                *out = x_taps[x]
                    .iter()
                    .zip(kernel_x)
                    .map(|(&sx, &w)| row[sx] as f64 * w)
                    .sum();
            }
        });

    let mut dst = FloatMap::zeros(width, height);
    dst.as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, out_row)| {
            let rows: Vec<usize> = (0..kernel_y.len() as isize)
                .map(|k| border_index(y as isize + k - anchor_y, height, border))
                .collect();
            for (x, out) in out_row.iter_mut().enumerate() {
                let sum: f64 = rows
                    .iter()
                    .zip(kernel_y)
                    .map(|(&sy, &w)| horizontal[sy * width + x] * w)
                    .sum();
                *out = sum as f32;
            }
        });

    dst
}

/// Box filter over a `kernel_size × kernel_size` window.
///
/// With `normalize` the window mean is produced, otherwise the plain sum.
pub fn box_filter(
    src: &FloatMap,
    kernel_size: usize,
    normalize: bool,
    border: BorderMode,
) -> Result<FloatMap> {
    if kernel_size == 0 {
        return Err(DepthError::zero_kernel("box filter"));
    }

    let weight = if normalize {
        1.0 / kernel_size as f64
    } else {
        1.0
    };
    let kernel = vec![weight; kernel_size];
    Ok(convolve_separable(src, &kernel, &kernel, border))
}
