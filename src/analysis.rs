//! Error analysis of a filtered depth map against a reference depth map.
//!
//! Produces the absolute error map, summary statistics and a fixed-size
//! histogram whose bins span `[0, max_error]`.

use crate::assert_invariant;
use crate::errors::Result;
use crate::map::FloatMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Number of histogram bins
pub const HISTOGRAM_BINS: usize = 500;

const PARALLEL_CHUNK: usize = 4096;

/// Summary statistics of an error map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorStatistics {
    pub mean: f64,
    pub min: f32,
    pub max: f32,
    pub median: f32,
}

/// Error value counts over `HISTOGRAM_BINS` equal-width bins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorHistogram {
    pub counts: Vec<u64>,
    pub max_error: f32,
}

impl ErrorHistogram {
    /// Bin all values of `errors`, whose largest value is `max_error`.
    ///
    /// Bin of `e` is `floor(e · (bins - 1) / max_error)`. An all-zero map
    /// (`max_error == 0`) puts every pixel in bin 0.
    pub fn from_errors(errors: &FloatMap, max_error: f32) -> Self {
        let counts = errors
            .as_slice()
            .par_chunks(PARALLEL_CHUNK)
            .fold(
                || vec![0u64; HISTOGRAM_BINS],
                |mut partial, chunk| {
                    for &e in chunk {
                        partial[bin_index(e, max_error)] += 1;
                    }
                    partial
                },
            )
            .reduce(
                || vec![0u64; HISTOGRAM_BINS],
                |mut a, b| {
                    for (x, y) in a.iter_mut().zip(b) {
                        *x += y;
                    }
                    a
                },
            );

        Self { counts, max_error }
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Width of one bin on the error axis.
    pub fn bin_width(&self) -> f32 {
        self.max_error / HISTOGRAM_BINS as f32
    }

    /// Error axis position of bin `index`.
    pub fn bin_start(&self, index: usize) -> f32 {
        index as f32 * self.max_error / HISTOGRAM_BINS as f32
    }
}

#[inline]
fn bin_index(error: f32, max_error: f32) -> usize {
    if max_error <= 0.0 || !max_error.is_finite() {
        return 0;
    }
    let scaled = error as f64 * (HISTOGRAM_BINS - 1) as f64 / max_error as f64;
    // NaN casts to 0
    (scaled as usize).min(HISTOGRAM_BINS - 1)
}

/// Output of [`analyze`]
#[derive(Debug, Clone)]
pub struct ErrorAnalysis {
    pub error_map: FloatMap,
    pub statistics: ErrorStatistics,
    pub histogram: ErrorHistogram,
}

/// Compare `filtered` with `reference`.
///
/// Returns `Ok(None)` when there is no reference to compare against.
pub fn analyze(filtered: &FloatMap, reference: Option<&FloatMap>) -> Result<Option<ErrorAnalysis>> {
    let Some(reference) = reference else {
        log::debug!("No reference depth map, skipping error analysis");
        return Ok(None);
    };
    filtered.ensure_same_size(reference)?;

    let error_map = absolute_error(filtered, reference);
    let statistics = error_statistics(&error_map);
    let histogram = ErrorHistogram::from_errors(&error_map, statistics.max);

    assert_invariant!(
        histogram.total() == error_map.len() as u64,
        "Histogram counts sum to pixel count",
        "analysis::analyze"
    );

    log::info!(
        "Depth error: mean={:.4} median={:.4} min={:.4} max={:.4}",
        statistics.mean,
        statistics.median,
        statistics.min,
        statistics.max
    );

    Ok(Some(ErrorAnalysis {
        error_map,
        statistics,
        histogram,
    }))
}

/// Per-pixel `|a - b|`. Both maps must share dimensions.
pub fn absolute_error(a: &FloatMap, b: &FloatMap) -> FloatMap {
    let mut out = FloatMap::zeros(a.width(), a.height());
    out.as_mut_slice()
        .par_iter_mut()
        .zip(a.as_slice().par_iter().zip(b.as_slice()))
        .for_each(|(out, (&x, &y))| *out = (x - y).abs());
    out
}

/// Mean, min, max and median of a map. All zero for an empty map.
pub fn error_statistics(errors: &FloatMap) -> ErrorStatistics {
    let values = errors.as_slice();
    if values.is_empty() {
        return ErrorStatistics {
            mean: 0.0,
            min: 0.0,
            max: 0.0,
            median: 0.0,
        };
    }

    let (sum, min, max) = values
        .par_chunks(PARALLEL_CHUNK)
        .map(|chunk| {
            chunk.iter().fold(
                (0.0f64, f32::INFINITY, f32::NEG_INFINITY),
                |(s, lo, hi), &v| (s + v as f64, lo.min(v), hi.max(v)),
            )
        })
        .reduce(
            || (0.0, f32::INFINITY, f32::NEG_INFINITY),
            |(s1, lo1, hi1), (s2, lo2, hi2)| (s1 + s2, lo1.min(lo2), hi1.max(hi2)),
        );

    let mut sorted = values.to_vec();
    sorted.par_sort_unstable_by(f32::total_cmp);
    let median = sorted[sorted.len() / 2];

    ErrorStatistics {
        mean: sum / values.len() as f64,
        min,
        max,
        median,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_reference_is_unavailable() {
        let filtered = FloatMap::zeros(4, 4);
        assert!(analyze(&filtered, None).unwrap().is_none());
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let filtered = FloatMap::zeros(4, 4);
        let reference = FloatMap::zeros(4, 5);
        assert!(analyze(&filtered, Some(&reference)).is_err());
    }

    #[test]
    fn test_identical_maps() {
        let depth = FloatMap::from_fn(10, 7, |x, y| (x + y) as f32);
        let result = analyze(&depth, Some(&depth)).unwrap().unwrap();
        assert!(result.error_map.as_slice().iter().all(|&e| e == 0.0));
        assert_eq!(result.statistics.mean, 0.0);
        assert_eq!(result.statistics.max, 0.0);
        assert_eq!(result.histogram.counts[0], 70);
        assert_eq!(result.histogram.total(), 70);
        assert_eq!(result.histogram.bin_width(), 0.0);
    }

    #[test]
    fn test_statistics() {
        let errors = FloatMap::from_vec(5, 1, vec![4.0, 1.0, 3.0, 0.0, 2.0]).unwrap();
        let stats = error_statistics(&errors);
        assert_eq!(stats.mean, 2.0);
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.median, 2.0);
    }

    #[test]
    fn test_median_takes_upper_middle() {
        let errors = FloatMap::from_vec(4, 1, vec![4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(error_statistics(&errors).median, 3.0);
    }

    #[test]
    fn test_bin_index() {
        assert_eq!(bin_index(0.0, 2.0), 0);
        assert_eq!(bin_index(2.0, 2.0), HISTOGRAM_BINS - 1);
        assert_eq!(bin_index(1.0, 2.0), 249);
        assert_eq!(bin_index(5.0, 0.0), 0);
        assert_eq!(bin_index(f32::NAN, 1.0), 0);
    }

    #[test]
    fn test_histogram_axis() {
        let errors = FloatMap::from_vec(2, 1, vec![0.0, 5.0]).unwrap();
        let hist = ErrorHistogram::from_errors(&errors, 5.0);
        assert_eq!(hist.bin_width(), 0.01);
        assert_eq!(hist.bin_start(100), 1.0);
        assert_eq!(hist.counts[0], 1);
        assert_eq!(hist.counts[HISTOGRAM_BINS - 1], 1);
    }
}
