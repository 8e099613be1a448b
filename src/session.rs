//! Depth-from-focus session
//!
//! A session owns one image stack and its derived data. Stages run in order:
//! 1. `compute_focus`: pre-filter + focus measure → focus volume
//! 2. `estimate_depth`: focus volume + distance law → raw depth map
//! 3. `apply_filter`: raw depth → filtered depth (+ display map), then error
//!    analysis when a reference depth map is present
//!
//! Re-filtering only repeats step 3.

use crate::analysis::{analyze, ErrorAnalysis, ErrorHistogram, ErrorStatistics};
use crate::config::PipelineConfig;
use crate::depth::estimate_depth;
use crate::distance::FocusDistance;
use crate::errors::{DepthError, Result};
use crate::filters::FilterType;
use crate::focus::{FocusMeasureKind, FocusVolume};
use crate::io;
use crate::map::FloatMap;
use crate::normalize::normalize_to_u8;
use crate::stack::ImageStack;
use image::GrayImage;
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct DepthSession {
    stack: ImageStack,
    reference: Option<FloatMap>,
    volume: Option<FocusVolume>,
    depth: Option<FloatMap>,
    filtered: Option<FilteredDepth>,
    analysis: Option<AnalyzedError>,
}

#[derive(Debug, Clone)]
struct FilteredDepth {
    map: FloatMap,
    display: GrayImage,
}

#[derive(Debug, Clone)]
struct AnalyzedError {
    analysis: ErrorAnalysis,
    display: GrayImage,
}

impl DepthSession {
    /// Start a session over a loaded stack and optional reference depth map.
    pub fn open(stack: ImageStack, reference: Option<FloatMap>) -> Result<Self> {
        if let Some(reference) = &reference {
            let expected = stack.dimensions();
            if reference.dimensions() != expected {
                return Err(DepthError::DimensionMismatch {
                    expected,
                    got: reference.dimensions(),
                });
            }
        }

        log::info!(
            "Opened session: {} images of {}x{}, reference {}",
            stack.len(),
            stack.width(),
            stack.height(),
            if reference.is_some() { "present" } else { "absent" }
        );

        Ok(Self {
            stack,
            reference,
            volume: None,
            depth: None,
            filtered: None,
            analysis: None,
        })
    }

    /// Load stack images (and reference depth) from disk and open a session.
    pub fn open_paths<P: AsRef<Path>>(images: &[P], reference: Option<&Path>) -> Result<Self> {
        let stack = io::load_stack(images)?;
        let reference = reference.map(io::load_depth_map).transpose()?;
        Self::open(stack, reference)
    }

    /// Stage 1: focus volume of the (optionally pre-filtered) stack.
    ///
    /// Invalidates everything derived from a previous focus volume.
    pub fn compute_focus(
        &mut self,
        measure: FocusMeasureKind,
        kernel_size: usize,
        pre_filter_kernel_size: usize,
    ) -> Result<&FocusVolume> {
        let start = Instant::now();
        let volume = if pre_filter_kernel_size > 0 {
            let filtered = self.stack.pre_filtered(pre_filter_kernel_size)?;
            measure.compute(&filtered, kernel_size)?
        } else {
            measure.compute(&self.stack, kernel_size)?
        };
        log::info!("Focus volume ready in {}ms", start.elapsed().as_millis());

        self.depth = None;
        self.filtered = None;
        self.analysis = None;
        Ok(self.volume.insert(volume))
    }

    /// Stage 2: raw depth map from the focus volume.
    pub fn estimate_depth(&mut self, distance: &dyn FocusDistance) -> Result<&FloatMap> {
        let volume = self
            .volume
            .as_ref()
            .ok_or(DepthError::NotReady("focus volume has not been computed"))?;

        let start = Instant::now();
        let depth = estimate_depth(volume, distance)?;
        log::info!("Depth map ready in {}ms", start.elapsed().as_millis());

        self.filtered = None;
        self.analysis = None;
        Ok(self.depth.insert(depth))
    }

    /// Stage 3: smooth the raw depth map and refresh the error analysis.
    ///
    /// On failure the previous filtered map and analysis are kept.
    pub fn apply_filter(&mut self, filter: FilterType, kernel_size: usize) -> Result<&FloatMap> {
        let depth = self
            .depth
            .as_ref()
            .ok_or(DepthError::NotReady("depth map has not been estimated"))?;

        let map = filter.apply(depth, kernel_size)?;
        let analysis = analyze(&map, self.reference.as_ref())?.map(|analysis| {
            let display = normalize_to_u8(&analysis.error_map);
            AnalyzedError { analysis, display }
        });
        let display = normalize_to_u8(&map);

        self.analysis = analysis;
        let filtered = self.filtered.insert(FilteredDepth { map, display });
        Ok(&filtered.map)
    }

    /// Run every stage with the given configuration.
    pub fn run(&mut self, config: &PipelineConfig) -> Result<()> {
        config.validate()?;
        let start = Instant::now();

        self.compute_focus(
            config.focus.measure,
            config.focus.kernel_size,
            config.focus.pre_filter_kernel_size,
        )?;
        self.estimate_depth(&config.depth.distance())?;
        self.apply_filter(config.filter.filter_type, config.filter.kernel_size)?;

        log::info!("Pipeline complete in {}ms", start.elapsed().as_millis());
        Ok(())
    }

    /// Run every stage on a blocking worker thread and hand the session back.
    pub async fn run_in_background(mut self, config: PipelineConfig) -> Result<Self> {
        tokio::task::spawn_blocking(move || -> Result<Self> {
            self.run(&config)?;
            Ok(self)
        })
        .await
        .map_err(|e| DepthError::Worker(format!("Task join error: {}", e)))?
    }

    /// Re-filter on a blocking worker thread without recomputing focus or depth.
    pub async fn refilter_in_background(
        mut self,
        filter: FilterType,
        kernel_size: usize,
    ) -> Result<Self> {
        tokio::task::spawn_blocking(move || -> Result<Self> {
            self.apply_filter(filter, kernel_size)?;
            Ok(self)
        })
        .await
        .map_err(|e| DepthError::Worker(format!("Task join error: {}", e)))?
    }

    pub fn stack(&self) -> &ImageStack {
        &self.stack
    }

    pub fn reference(&self) -> Option<&FloatMap> {
        self.reference.as_ref()
    }

    pub fn focus_volume(&self) -> Option<&FocusVolume> {
        self.volume.as_ref()
    }

    /// Focus score curve of one pixel across the stack.
    pub fn focus_scores_at(&self, x: usize, y: usize) -> Result<Vec<f32>> {
        self.volume
            .as_ref()
            .ok_or(DepthError::NotReady("focus volume has not been computed"))?
            .try_scores_at(x, y)
    }

    pub fn depth_map(&self) -> Option<&FloatMap> {
        self.depth.as_ref()
    }

    pub fn filtered_depth_map(&self) -> Option<&FloatMap> {
        self.filtered.as_ref().map(|f| &f.map)
    }

    pub fn normalized_depth_map(&self) -> Option<&GrayImage> {
        self.filtered.as_ref().map(|f| &f.display)
    }

    pub fn error_analysis(&self) -> Option<&ErrorAnalysis> {
        self.analysis.as_ref().map(|a| &a.analysis)
    }

    pub fn error_map(&self) -> Option<&FloatMap> {
        self.error_analysis().map(|a| &a.error_map)
    }

    pub fn normalized_error_map(&self) -> Option<&GrayImage> {
        self.analysis.as_ref().map(|a| &a.display)
    }

    pub fn error_statistics(&self) -> Option<&ErrorStatistics> {
        self.error_analysis().map(|a| &a.statistics)
    }

    pub fn error_histogram(&self) -> Option<&ErrorHistogram> {
        self.error_analysis().map(|a| &a.histogram)
    }

    /// Write the filtered depth map as a float image.
    pub fn save_depth_map<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let map = self
            .filtered_depth_map()
            .ok_or(DepthError::NotReady("no filtered depth map to save"))?;
        io::save_depth_map(map, path)
    }

    pub fn save_normalized_depth<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let image = self
            .normalized_depth_map()
            .ok_or(DepthError::NotReady("no filtered depth map to save"))?;
        io::save_display_map(image, path)
    }

    pub fn save_normalized_error<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let image = self
            .normalized_error_map()
            .ok_or(DepthError::NotReady("no error map to save"))?;
        io::save_display_map(image, path)
    }
}
