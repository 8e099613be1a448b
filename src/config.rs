//! Configuration management for the depth-from-focus pipeline
//!
//! Provides loading, saving and validation of the pipeline settings:
//! focus measure and kernel, stack pre-filter, focus distance law and
//! depth map smoothing.

use crate::distance::LinearFocusDistance;
use crate::errors::{DepthError, Result};
use crate::filters::FilterType;
use crate::focus::FocusMeasureKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PipelineConfig {
    #[serde(default)]
    pub focus: FocusConfig,
    #[serde(default)]
    pub depth: DepthConfig,
    #[serde(default)]
    pub filter: FilterConfig,
}

/// Focus measure configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// Sharpness measure applied to every stack image
    pub measure: FocusMeasureKind,
    /// Window size of the focus measure (> 0)
    pub kernel_size: usize,
    /// Gaussian pre-filter kernel, 0 disables it (odd otherwise)
    pub pre_filter_kernel_size: usize,
}

/// Focus index to depth mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthConfig {
    /// Depth of the first stack image
    pub initial_depth: f32,
    /// Depth step between consecutive stack images
    pub depth_increment: f32,
}

/// Depth map smoothing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub filter_type: FilterType,
    pub kernel_size: usize,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            measure: FocusMeasureKind::Gradient,
            kernel_size: 9,
            pre_filter_kernel_size: 3,
        }
    }
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            initial_depth: 0.0,
            depth_increment: 1.0,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            filter_type: FilterType::Median,
            kernel_size: 5,
        }
    }
}

impl DepthConfig {
    pub fn distance(&self) -> LinearFocusDistance {
        LinearFocusDistance::new(self.initial_depth, self.depth_increment)
    }
}

impl PipelineConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;

        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| DepthError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| DepthError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, toml_string)?;

        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get default config file path
    pub fn default_path() -> PathBuf {
        PathBuf::from("depthfocus.toml")
    }

    /// Load from default location or fall back to defaults
    pub fn load_or_default() -> Self {
        Self::load_from_file(Self::default_path()).unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.focus.kernel_size == 0 {
            return Err(DepthError::InvalidConfig(
                "Focus kernel size must be positive".to_string(),
            ));
        }
        let pre = self.focus.pre_filter_kernel_size;
        if pre != 0 && pre % 2 == 0 {
            return Err(DepthError::InvalidConfig(
                "Pre-filter kernel size must be 0 or odd".to_string(),
            ));
        }

        if !self.depth.initial_depth.is_finite() || !self.depth.depth_increment.is_finite() {
            return Err(DepthError::InvalidConfig(
                "Depth law parameters must be finite".to_string(),
            ));
        }

        let k = self.filter.kernel_size;
        match self.filter.filter_type {
            FilterType::Box if k == 0 => {
                return Err(DepthError::InvalidConfig(
                    "Box filter kernel size must be positive".to_string(),
                ))
            }
            FilterType::Gaussian if k % 2 == 0 => {
                return Err(DepthError::InvalidConfig(
                    "Gaussian filter kernel size must be odd".to_string(),
                ))
            }
            _ => {}
        }

        Ok(())
    }
}
