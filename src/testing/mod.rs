//! Testing utilities for depthfocus
//!
//! Provides synthetic focus stacks with known ground-truth depth for
//! offline tests and benchmarks.

pub mod synthetic_data;

pub use synthetic_data::{
    single_pixel_peak_stack,
    synthetic_depth,
    synthetic_focus_index,
    synthetic_stack,
};
