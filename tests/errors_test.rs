#[cfg(test)]
mod error_tests {
    use depthfocus::errors::DepthError;
    use std::error::Error;

    #[test]
    fn test_insufficient_images_display() {
        let error = DepthError::InsufficientImages {
            required: 2,
            provided: 0,
        };
        assert_eq!(error.to_string(), "Insufficient images: need 2, got 0");
    }

    #[test]
    fn test_dimension_mismatch_display() {
        let error = DepthError::DimensionMismatch {
            expected: (640, 480),
            got: (320, 240),
        };
        assert_eq!(
            error.to_string(),
            "Image dimension mismatch: expected 640x480, got 320x240"
        );
    }

    #[test]
    fn test_kernel_size_display() {
        let error = DepthError::odd_kernel("gaussian blur", 4);
        let message = error.to_string();
        assert!(message.contains("gaussian blur"));
        assert!(message.contains('4'));
        assert!(message.contains("odd"));

        let error = DepthError::zero_kernel("box filter");
        assert!(error.to_string().contains("must be positive"));
    }

    #[test]
    fn test_not_ready_display() {
        let error = DepthError::NotReady("depth map has not been estimated");
        assert_eq!(
            error.to_string(),
            "Pipeline stage not ready: depth map has not been estimated"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error: DepthError = io_error.into();
        assert!(matches!(error, DepthError::Io(_)));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_string_variants_have_no_source() {
        let error = DepthError::InvalidConfig("bad".to_string());
        assert!(error.source().is_none());
        assert_eq!(error.to_string(), "Invalid config: bad");
    }

    #[test]
    fn test_error_debug_format() {
        let error = DepthError::Worker("Debug test".to_string());
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("Worker"));
        assert!(debug_str.contains("Debug test"));
    }

    #[test]
    fn test_errors_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<DepthError>();
    }
}
