//! Image decode/encode for stacks, reference depth and results.
//!
//! - `load_stack`: ordered image paths → 8-bit grayscale [`ImageStack`]
//! - `load_depth_map`: float (OpenEXR) or integer image → [`FloatMap`]
//! - `save_depth_map`: [`FloatMap`] → OpenEXR float image
//! - `save_display_map`: 8-bit display image → PNG (or any format by extension)

use crate::errors::{DepthError, Result};
use crate::map::FloatMap;
use crate::stack::{ImageStack, MIN_STACK_LEN};
use image::{DynamicImage, GrayImage, ImageFormat, Rgb32FImage};
use std::path::Path;
use std::sync::Once;

static CODEC_INIT: Once = Once::new();

/// One-time, process-wide codec setup. Runs before the first decode.
pub fn init_codecs() {
    CODEC_INIT.call_once(|| {
        let float_formats: Vec<&str> = [ImageFormat::OpenExr, ImageFormat::Hdr, ImageFormat::Tiff]
            .iter()
            .filter(|f| f.reading_enabled())
            .filter_map(|f| f.extensions_str().first().copied())
            .collect();
        log::info!("Image codecs ready; float formats: {:?}", float_formats);
        if !ImageFormat::OpenExr.reading_enabled() {
            log::warn!("OpenEXR support is not compiled in, float depth maps cannot be read");
        }
    });
}

/// Load an 8-bit grayscale image.
pub fn load_grayscale<P: AsRef<Path>>(path: P) -> Result<GrayImage> {
    init_codecs();
    let path = path.as_ref();
    log::debug!("Loading {:?}", path);
    Ok(image::open(path)?.to_luma8())
}

/// Load an ordered list of images into a stack.
pub fn load_stack<P: AsRef<Path>>(paths: &[P]) -> Result<ImageStack> {
    if paths.len() < MIN_STACK_LEN {
        return Err(DepthError::InsufficientImages {
            required: MIN_STACK_LEN,
            provided: paths.len(),
        });
    }

    log::info!("Loading stack of {} images", paths.len());
    let images = paths
        .iter()
        .map(load_grayscale)
        .collect::<Result<Vec<_>>>()?;
    ImageStack::new(images)
}

/// Load a depth map.
///
/// Float images keep their values (first channel). Integer images are read
/// as raw luma levels without rescaling.
pub fn load_depth_map<P: AsRef<Path>>(path: P) -> Result<FloatMap> {
    init_codecs();
    let path = path.as_ref();
    log::info!("Loading reference depth map {:?}", path);

    let image = image::open(path)?;
    let (width, height) = (image.width() as usize, image.height() as usize);

    let data: Vec<f32> = match &image {
        DynamicImage::ImageRgb32F(buf) => buf.pixels().map(|p| p[0]).collect(),
        DynamicImage::ImageRgba32F(buf) => buf.pixels().map(|p| p[0]).collect(),
        DynamicImage::ImageLuma16(buf) => buf.pixels().map(|p| p[0] as f32).collect(),
        DynamicImage::ImageLumaA16(buf) => buf.pixels().map(|p| p[0] as f32).collect(),
        DynamicImage::ImageRgb16(_) | DynamicImage::ImageRgba16(_) => {
            image.to_luma16().pixels().map(|p| p[0] as f32).collect()
        }
        other => other.to_luma8().pixels().map(|p| p[0] as f32).collect(),
    };

    FloatMap::from_vec(width, height, data)
}

/// Save a depth map as a float image; OpenEXR unless the extension says otherwise.
pub fn save_depth_map<P: AsRef<Path>>(map: &FloatMap, path: P) -> Result<()> {
    let path = path.as_ref();
    let buffer = Rgb32FImage::from_fn(map.width() as u32, map.height() as u32, |x, y| {
        let v = map.get(x as usize, y as usize);
        image::Rgb([v, v, v])
    });

    let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::OpenExr);
    DynamicImage::ImageRgb32F(buffer).save_with_format(path, format)?;
    log::info!("Saved depth map to {:?}", path);
    Ok(())
}

/// Save an 8-bit display map.
pub fn save_display_map<P: AsRef<Path>>(image: &GrayImage, path: P) -> Result<()> {
    let path = path.as_ref();
    let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);
    image.save_with_format(path, format)?;
    log::info!("Saved display map to {:?}", path);
    Ok(())
}
