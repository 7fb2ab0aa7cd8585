// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Pose inference configuration.
//!
//! This module defines the [`PoseConfig`] struct, which controls the keypoint
//! confidence threshold, the inference thread count, and the model input size.

/// Configuration for pose inference.
///
/// This struct is used to customize the behavior of the pose engine and the
/// overlay session. It uses a builder pattern for convenient construction.
///
/// # Example
///
/// ```rust
/// use movenet_inference::PoseConfig;
///
/// let config = PoseConfig::new()
///     .with_confidence(0.3)
///     .with_threads(2);
/// ```
#[derive(Debug, Clone)]
pub struct PoseConfig {
    /// Keypoint confidence threshold (0.0 to 1.0).
    /// Keypoints and joint-lines below this score are not drawn. Filtering is
    /// a presentation decision; decoded results always carry all keypoints.
    pub confidence_threshold: f32,
    /// Number of intra-op threads for the inference runtime.
    pub num_threads: usize,
    /// Model input size as (height, width).
    pub input_size: (usize, usize),
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.2,
            num_threads: 4,
            input_size: (192, 192),
        }
    }
}

impl PoseConfig {
    /// Create a new configuration with default values.
    ///
    /// # Returns
    ///
    /// * A new `PoseConfig` instance with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the keypoint confidence threshold.
    ///
    /// # Arguments
    ///
    /// * `threshold` - The minimum keypoint score (0.0 to 1.0) for drawing.
    ///
    /// # Returns
    ///
    /// * The modified `PoseConfig`.
    #[must_use]
    pub const fn with_confidence(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Set the number of threads for inference.
    ///
    /// # Arguments
    ///
    /// * `threads` - The number of intra-op threads (>= 1).
    ///
    /// # Returns
    ///
    /// * The modified `PoseConfig`.
    #[must_use]
    pub const fn with_threads(mut self, threads: usize) -> Self {
        self.num_threads = threads;
        self
    }

    /// Set the model input size.
    ///
    /// # Arguments
    ///
    /// * `height` - The model input height.
    /// * `width` - The model input width.
    ///
    /// # Returns
    ///
    /// * The modified `PoseConfig`.
    #[must_use]
    pub const fn with_input_size(mut self, height: usize, width: usize) -> Self {
        self.input_size = (height, width);
        self
    }
}
