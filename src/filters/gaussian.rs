//! Gaussian blur with sigma derived from the kernel size.

use super::convolve::{convolve_separable, BorderMode};
use crate::errors::{DepthError, Result};
use crate::map::FloatMap;
use image::{GrayImage, Luma};

/// Fixed binomial kernels used for the small odd sizes.
const SMALL_KERNELS: [&[f64]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[
        0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
    ],
];

/// Sigma picked for a kernel of `size` taps when none is given.
pub fn auto_sigma(size: usize) -> f64 {
    0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1-D Gaussian kernel of odd length `size`.
pub fn gaussian_kernel(size: usize) -> Result<Vec<f64>> {
    if size == 0 || size % 2 == 0 {
        return Err(DepthError::odd_kernel("gaussian blur", size));
    }

    if size <= 7 {
        return Ok(SMALL_KERNELS[size / 2].to_vec());
    }

    let sigma = auto_sigma(size);
    let scale = -0.5 / (sigma * sigma);
    let center = (size - 1) as f64 * 0.5;
    let mut kernel: Vec<f64> = (0..size)
        .map(|i| {
            let d = i as f64 - center;
            (scale * d * d).exp()
        })
        .collect();

    let sum: f64 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    Ok(kernel)
}

/// Blur a float map, mirroring at the borders.
pub fn gaussian_blur(src: &FloatMap, kernel_size: usize) -> Result<FloatMap> {
    let kernel = gaussian_kernel(kernel_size)?;
    Ok(convolve_separable(
        src,
        &kernel,
        &kernel,
        BorderMode::Reflect101,
    ))
}

/// Blur an 8-bit image, rounding back to the nearest integer level.
pub fn gaussian_blur_u8(src: &GrayImage, kernel_size: usize) -> Result<GrayImage> {
    let (width, height) = src.dimensions();
    let as_float = FloatMap::from_fn(width as usize, height as usize, |x, y| {
        src.get_pixel(x as u32, y as u32)[0] as f32
    });

    let blurred = gaussian_blur(&as_float, kernel_size)?;

    Ok(GrayImage::from_fn(width, height, |x, y| {
        let v = blurred.get(x as usize, y as usize);
        Luma([v.round().clamp(0.0, 255.0) as u8])
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_sums_to_one() {
        for size in [1, 3, 5, 7, 9, 15, 31] {
            let kernel = gaussian_kernel(size).unwrap();
            assert_eq!(kernel.len(), size);
            let sum: f64 = kernel.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "size {} sums to {}", size, sum);
        }
    }

    #[test]
    fn test_kernel_is_symmetric_and_peaked() {
        let kernel = gaussian_kernel(11).unwrap();
        for i in 0..5 {
            assert!((kernel[i] - kernel[10 - i]).abs() < 1e-12);
            assert!(kernel[i] < kernel[i + 1]);
        }
    }

    #[test]
    fn test_even_or_zero_kernel_rejected() {
        assert!(gaussian_kernel(0).is_err());
        assert!(gaussian_kernel(4).is_err());
    }

    #[test]
    fn test_auto_sigma() {
        assert!((auto_sigma(3) - 0.8).abs() < 1e-12);
        assert!((auto_sigma(9) - 1.7).abs() < 1e-12);
    }

    #[test]
    fn test_blur_preserves_constant() {
        let src = FloatMap::filled(8, 5, 3.5);
        let out = gaussian_blur(&src, 5).unwrap();
        assert!(out.as_slice().iter().all(|&v| (v - 3.5).abs() < 1e-5));
    }

    #[test]
    fn test_blur_u8_smooths_spike() {
        let mut img = GrayImage::new(7, 7);
        img.put_pixel(3, 3, Luma([255]));
        let out = gaussian_blur_u8(&img, 3).unwrap();
        assert_eq!(out.get_pixel(3, 3)[0], 64);
        assert_eq!(out.get_pixel(2, 3)[0], 32);
        assert_eq!(out.get_pixel(0, 0)[0], 0);
    }
}
