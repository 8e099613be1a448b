//! depthfocus: depth-from-focus estimation for focus-swept image stacks
//!
//! Given a stack of grayscale images of one scene, each taken at a different
//! focus distance, this crate scores per-pixel sharpness in every image,
//! locates the sharpest image per pixel with sub-image precision, converts
//! that index to a depth value and smooths the resulting map. When a
//! reference depth map is available the smoothed map is compared against it.
//!
//! # Features
//! - Gradient and variance focus measures
//! - Gaussian peak refinement of the focus curve
//! - Median, box and Gaussian depth map smoothing
//! - Error map, summary statistics and a 500-bin error histogram
//! - EXR/TIFF float depth map I/O and 8-bit display maps
//!
//! # Usage
//! ```rust,ignore
//! use depthfocus::{DepthSession, PipelineConfig};
//!
//! let mut session = DepthSession::open_paths(&paths, Some(reference.as_path()))?;
//! session.run(&PipelineConfig::load_or_default())?;
//! session.save_depth_map("depth.exr")?;
//! if let Some(stats) = session.error_statistics() {
//!     println!("mean error {}", stats.mean);
//! }
//! ```
pub mod analysis;
pub mod config;
pub mod depth;
pub mod distance;
pub mod errors;
pub mod filters;
pub mod focus;
pub mod invariant_ppt;
pub mod io;
pub mod map;
pub mod normalize;
pub mod peak;
pub mod session;
pub mod stack;

// Testing utilities - synthetic stacks with known depth
pub mod testing;

// Re-exports for convenience
pub use analysis::{ErrorAnalysis, ErrorHistogram, ErrorStatistics, HISTOGRAM_BINS};
pub use config::{DepthConfig, FilterConfig, FocusConfig, PipelineConfig};
pub use distance::{FocusDistance, LinearFocusDistance};
pub use errors::{DepthError, Result};
pub use filters::FilterType;
pub use focus::{FocusMeasure, FocusMeasureKind, FocusVolume};
pub use map::FloatMap;
pub use peak::GaussianPeak;
pub use session::DepthSession;
pub use stack::ImageStack;

/// Initialize logging for the pipeline
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "depthfocus=info");
    }
    let _ = env_logger::try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get crate information
pub fn get_info() -> CrateInfo {
    CrateInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
        focus_measures: FocusMeasureKind::ALL.iter().map(|m| m.to_string()).collect(),
        filters: FilterType::ALL.iter().map(|f| f.to_string()).collect(),
    }
}

/// Crate information structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CrateInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub focus_measures: Vec<String>,
    pub filters: Vec<String>,
}

#[cfg(test)]
mod lib_tests {
    use super::*;

    #[test]
    fn test_crate_info() {
        let info = get_info();
        assert_eq!(info.name, "depthfocus");
        assert!(!info.version.is_empty());
        assert!(!info.description.is_empty());
        assert_eq!(info.focus_measures, vec!["gradient", "variance"]);
        assert_eq!(info.filters.len(), 4);
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging();
        init_logging();
    }
}
