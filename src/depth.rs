//! Per-pixel depth estimation from a focus volume.

use crate::assert_invariant;
use crate::distance::FocusDistance;
use crate::errors::{DepthError, Result};
use crate::focus::FocusVolume;
use crate::map::FloatMap;
use crate::peak::{argmax, refine_peak};
use rayon::prelude::*;

/// Focus index of the sharpest image for one score curve.
///
/// Interior maxima are refined with a 3-point Gaussian fit; a maximum on the
/// first or last image is returned as is.
pub fn focus_index(scores: &[f32]) -> Result<f32> {
    if scores.is_empty() {
        return Err(DepthError::InvalidArgument(
            "empty focus score sequence".to_string(),
        ));
    }

    let max_index = argmax(scores);
    if max_index == 0 || max_index + 1 == scores.len() {
        return Ok(max_index as f32);
    }

    let m = max_index as f32;
    let peak = refine_peak(&[m - 1.0, m, m + 1.0], &scores[max_index - 1..=max_index + 1])?;
    Ok(peak.location)
}

/// Raw depth map: the focus distance of each pixel's refined focus index.
pub fn estimate_depth(volume: &FocusVolume, distance: &dyn FocusDistance) -> Result<FloatMap> {
    let width = volume.width();
    let height = volume.height();

    log::info!(
        "Estimating depth for {}x{} pixels over {} focus maps",
        width,
        height,
        volume.len()
    );

    let mut depth = FloatMap::zeros(width, height);
    if width > 0 {
        depth
            .as_mut_slice()
            .par_chunks_mut(width)
            .enumerate()
            .try_for_each(|(y, out_row)| -> Result<()> {
                let mut scores = Vec::with_capacity(volume.len());
                for (x, out) in out_row.iter_mut().enumerate() {
                    volume.scores_into(x, y, &mut scores);
                    *out = distance.distance(focus_index(&scores)?);
                }
                Ok(())
            })?;
    }

    assert_invariant!(
        depth.width() == volume.width() && depth.height() == volume.height(),
        "Depth map matches focus volume dimensions",
        "depth::estimate_depth"
    );
    Ok(depth)
}
