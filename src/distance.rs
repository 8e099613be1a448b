//! Mapping from (fractional) stack index to physical focus distance.

use serde::{Deserialize, Serialize};

pub trait FocusDistance: Send + Sync {
    /// Physical depth for a focus index; fractional indices come from peak refinement.
    fn distance(&self, index: f32) -> f32;
}

/// `initial + increment · index`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFocusDistance {
    pub initial: f32,
    pub increment: f32,
}

impl LinearFocusDistance {
    pub fn new(initial: f32, increment: f32) -> Self {
        Self { initial, increment }
    }
}

impl Default for LinearFocusDistance {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

impl FocusDistance for LinearFocusDistance {
    fn distance(&self, index: f32) -> f32 {
        self.initial + self.increment * index
    }
}

impl<F> FocusDistance for F
where
    F: Fn(f32) -> f32 + Send + Sync,
{
    fn distance(&self, index: f32) -> f32 {
        self(index)
    }
}
