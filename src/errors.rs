use thiserror::Error;

/// Errors produced by the depth-from-focus pipeline
#[derive(Debug, Error)]
pub enum DepthError {
    /// Not enough source images
    #[error("Insufficient images: need {required}, got {provided}")]
    InsufficientImages { required: usize, provided: usize },

    /// Image or map dimensions don't match
    #[error("Image dimension mismatch: expected {}x{}, got {}x{}", expected.0, expected.1, got.0, got.1)]
    DimensionMismatch {
        expected: (u32, u32),
        got: (u32, u32),
    },

    /// Kernel size not accepted by the selected operation
    #[error("Invalid kernel size {size} for {operation}: {reason}")]
    InvalidKernelSize {
        operation: &'static str,
        size: usize,
        reason: &'static str,
    },

    /// Bad argument to a numeric routine
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// A stage was invoked before the stage it depends on
    #[error("Pipeline stage not ready: {0}")]
    NotReady(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Config parse error: {0}")]
    Config(String),

    /// Background worker failed to complete
    #[error("Worker error: {0}")]
    Worker(String),
}

pub type Result<T> = std::result::Result<T, DepthError>;

impl DepthError {
    pub fn odd_kernel(operation: &'static str, size: usize) -> Self {
        Self::InvalidKernelSize {
            operation,
            size,
            reason: "kernel size must be odd and positive",
        }
    }

    pub fn zero_kernel(operation: &'static str) -> Self {
        Self::InvalidKernelSize {
            operation,
            size: 0,
            reason: "kernel size must be positive",
        }
    }
}
