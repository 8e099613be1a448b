//! Ordered focus-swept stack of 8-bit grayscale images.

use crate::errors::{DepthError, Result};
use crate::filters::gaussian::gaussian_blur_u8;
use image::GrayImage;

/// Fewest images a depth-from-focus stack can hold
pub const MIN_STACK_LEN: usize = 2;

#[derive(Debug, Clone)]
pub struct ImageStack {
    images: Vec<GrayImage>,
    width: u32,
    height: u32,
}

#[allow(clippy::len_without_is_empty)]
impl ImageStack {
    /// Validate and take ownership of the stack images.
    ///
    /// Needs at least [`MIN_STACK_LEN`] non-empty images that all share the
    /// dimensions of the first one.
    pub fn new(images: Vec<GrayImage>) -> Result<Self> {
        if images.len() < MIN_STACK_LEN {
            return Err(DepthError::InsufficientImages {
                required: MIN_STACK_LEN,
                provided: images.len(),
            });
        }

        let (width, height) = images[0].dimensions();
        if width == 0 || height == 0 {
            return Err(DepthError::InvalidArgument(
                "stack images must not be empty".to_string(),
            ));
        }

        for image in images.iter().skip(1) {
            if image.dimensions() != (width, height) {
                return Err(DepthError::DimensionMismatch {
                    expected: (width, height),
                    got: image.dimensions(),
                });
            }
        }

        Ok(Self {
            images,
            width,
            height,
        })
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn images(&self) -> &[GrayImage] {
        &self.images
    }

    pub fn get(&self, index: usize) -> Option<&GrayImage> {
        self.images.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GrayImage> {
        self.images.iter()
    }

    /// Copy of the stack with every image Gaussian-blurred.
    ///
    /// A kernel size of 0 disables the pre-filter and returns a plain copy.
    pub fn pre_filtered(&self, kernel_size: usize) -> Result<ImageStack> {
        if kernel_size == 0 {
            return Ok(self.clone());
        }

        log::debug!(
            "Pre-filtering {} images with {}x{} Gaussian",
            self.len(),
            kernel_size,
            kernel_size
        );

        let images = self
            .images
            .iter()
            .map(|image| gaussian_blur_u8(image, kernel_size))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            images,
            width: self.width,
            height: self.height,
        })
    }
}

impl<'a> IntoIterator for &'a ImageStack {
    type Item = &'a GrayImage;
    type IntoIter = std::slice::Iter<'a, GrayImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}
