//! Owned single-channel f32 map in row-major layout.
//!
//! Used for focus scores, depth, reference depth and error maps.

use crate::errors::{DepthError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct FloatMap {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl FloatMap {
    /// Zero-initialized map of size `width × height`.
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    pub fn filled(width: usize, height: usize, value: f32) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Wrap existing row-major data.
    pub fn from_vec(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != width * height {
            return Err(DepthError::InvalidArgument(format!(
                "map data has {} values, expected {}x{}",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a map by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width as u32, self.height as u32)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        self.data[y * self.width + x] = value;
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[f32] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Fail unless `other` has the same width and height.
    pub fn ensure_same_size(&self, other: &FloatMap) -> Result<()> {
        if self.width != other.width || self.height != other.height {
            return Err(DepthError::DimensionMismatch {
                expected: self.dimensions(),
                got: other.dimensions(),
            });
        }
        Ok(())
    }

    /// Smallest and largest value, `None` for an empty map.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        let mut iter = self.data.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fn_layout() {
        let map = FloatMap::from_fn(3, 2, |x, y| (y * 10 + x) as f32);
        assert_eq!(map.get(2, 1), 12.0);
        assert_eq!(map.row(1), &[10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        assert!(FloatMap::from_vec(2, 2, vec![0.0; 3]).is_err());
        assert!(FloatMap::from_vec(2, 2, vec![0.0; 4]).is_ok());
    }

    #[test]
    fn test_min_max() {
        let map = FloatMap::from_vec(2, 2, vec![3.0, -1.0, 7.5, 0.0]).unwrap();
        assert_eq!(map.min_max(), Some((-1.0, 7.5)));
        assert_eq!(FloatMap::zeros(0, 0).min_max(), None);
    }

    #[test]
    fn test_size_check() {
        let a = FloatMap::zeros(4, 3);
        let b = FloatMap::zeros(3, 4);
        assert!(matches!(
            a.ensure_same_size(&b),
            Err(DepthError::DimensionMismatch { .. })
        ));
    }
}
