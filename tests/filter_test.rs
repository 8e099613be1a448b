//! Depth map smoothing tests

use depthfocus::filters::{box_filter, gaussian_blur_u8, median_blur, BorderMode};
use depthfocus::{DepthError, FilterType, FloatMap};
use image::{GrayImage, Luma};

fn ramp(width: usize, height: usize) -> FloatMap {
    FloatMap::from_fn(width, height, |x, y| (x + 2 * y) as f32)
}

#[test]
fn test_none_is_identity_for_any_kernel() {
    let depth = ramp(7, 5);
    for k in [0, 1, 4, 9] {
        assert_eq!(FilterType::None.apply(&depth, k).unwrap(), depth);
    }
}

#[test]
fn test_constant_map_is_preserved() {
    let depth = FloatMap::filled(9, 6, 2.5);
    for (filter, k) in [
        (FilterType::Box, 3),
        (FilterType::Box, 4),
        (FilterType::Gaussian, 3),
        (FilterType::Gaussian, 7),
        (FilterType::Median, 5),
    ] {
        let out = filter.apply(&depth, k).unwrap();
        for &v in out.as_slice() {
            assert!((v - 2.5).abs() < 1e-5, "{} k={} gave {}", filter, k, v);
        }
    }
}

#[test]
fn test_median_removes_outlier() {
    let mut depth = FloatMap::zeros(7, 7);
    depth.set(3, 3, 100.0);
    let out = FilterType::Median.apply(&depth, 5).unwrap();
    assert!(out.as_slice().iter().all(|&v| v == 0.0));
}

#[test]
fn test_median_unit_kernel_is_identity() {
    let depth = ramp(5, 5);
    assert_eq!(median_blur(&depth, 1), depth);
    assert_eq!(median_blur(&depth, 0), depth);
}

#[test]
fn test_box_filter_averages_neighbourhood() {
    let mut depth = FloatMap::zeros(5, 5);
    depth.set(2, 2, 9.0);
    let out = FilterType::Box.apply(&depth, 3).unwrap();
    for y in 1..=3 {
        for x in 1..=3 {
            assert!((out.get(x, y) - 1.0).abs() < 1e-6);
        }
    }
    assert_eq!(out.get(0, 0), 0.0);
}

#[test]
fn test_unnormalized_box_sums() {
    let depth = FloatMap::filled(4, 4, 1.0);
    let out = box_filter(&depth, 3, false, BorderMode::Reflect101).unwrap();
    assert!(out.as_slice().iter().all(|&v| (v - 9.0).abs() < 1e-6));
}

#[test]
fn test_box_unit_kernel_is_identity() {
    let depth = ramp(6, 4);
    assert_eq!(FilterType::Box.apply(&depth, 1).unwrap(), depth);
}

#[test]
fn test_gaussian_three_tap_weights() {
    let mut depth = FloatMap::zeros(5, 5);
    depth.set(2, 2, 16.0);
    let out = FilterType::Gaussian.apply(&depth, 3).unwrap();
    // [1 2 1] / 4 in both directions
    assert!((out.get(2, 2) - 4.0).abs() < 1e-5);
    assert!((out.get(1, 2) - 2.0).abs() < 1e-5);
    assert!((out.get(1, 1) - 1.0).abs() < 1e-5);
}

#[test]
fn test_invalid_kernels_rejected() {
    let depth = ramp(5, 5);
    assert!(matches!(
        FilterType::Box.apply(&depth, 0),
        Err(DepthError::InvalidKernelSize { .. })
    ));
    assert!(matches!(
        FilterType::Gaussian.apply(&depth, 4),
        Err(DepthError::InvalidKernelSize { .. })
    ));
    assert!(matches!(
        FilterType::Gaussian.apply(&depth, 0),
        Err(DepthError::InvalidKernelSize { .. })
    ));
}

#[test]
fn test_filter_type_parsing() {
    assert_eq!("median".parse::<FilterType>().unwrap(), FilterType::Median);
    assert_eq!("Gaussian".parse::<FilterType>().unwrap(), FilterType::Gaussian);
    assert_eq!("NONE".parse::<FilterType>().unwrap(), FilterType::None);
    assert!("bilateral".parse::<FilterType>().is_err());
    assert_eq!(FilterType::default(), FilterType::Median);
}

#[test]
fn test_pre_filter_blurs_u8_image() {
    let mut image = GrayImage::from_pixel(5, 5, Luma([0]));
    image.put_pixel(2, 2, Luma([255]));
    let out = gaussian_blur_u8(&image, 3).unwrap();
    assert!(out.get_pixel(2, 2)[0] < 255);
    assert!(out.get_pixel(1, 2)[0] > 0);
    assert!(gaussian_blur_u8(&image, 2).is_err());
}
