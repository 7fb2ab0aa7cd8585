// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Result types for pose inference output.
//!
//! Keypoint coordinates in these types are normalized to [0, 1] model space.
//! Denormalization to frame pixels is the consumer's responsibility, via
//! [`Keypoint::to_pixel`], so the pose engine stays resolution-agnostic.

/// Timing information for inference operations (in milliseconds).
///
/// All fields are zero at construction and never negative.
#[derive(Debug, Clone, Default)]
pub struct Speed {
    /// Time spent on preprocessing.
    pub preprocess: f64,
    /// Time spent on model inference.
    pub inference: f64,
    /// Time spent on postprocessing.
    pub postprocess: f64,
}

impl Speed {
    /// Create a new Speed instance with all timings.
    ///
    /// # Arguments
    ///
    /// * `preprocess` - Time in milliseconds.
    /// * `inference` - Time in milliseconds.
    /// * `postprocess` - Time in milliseconds.
    ///
    /// # Returns
    ///
    /// * A new `Speed` instance.
    #[must_use]
    pub const fn new(preprocess: f64, inference: f64, postprocess: f64) -> Self {
        Self {
            preprocess,
            inference,
            postprocess,
        }
    }

    /// Get total pipeline time.
    ///
    /// # Returns
    ///
    /// * Sum of preprocess, inference, and postprocess times in milliseconds.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.preprocess + self.inference + self.postprocess
    }
}

/// One predicted anatomical landmark with position and confidence.
///
/// Coordinates are normalized [0, 1] fractions of the model input resolution;
/// the score is a per-joint confidence in [0, 1]. Immutable once produced for
/// a given frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    /// Horizontal position, normalized [0, 1].
    pub x: f32,
    /// Vertical position, normalized [0, 1].
    pub y: f32,
    /// Per-joint confidence score in [0, 1].
    pub score: f32,
}

impl Keypoint {
    /// Create a new keypoint.
    #[must_use]
    pub const fn new(x: f32, y: f32, score: f32) -> Self {
        Self { x, y, score }
    }

    /// Denormalize to pixel coordinates for a frame of the given size.
    ///
    /// Scales x by the frame width and y by the frame height, truncating
    /// toward zero (floor, since normalized coordinates are non-negative).
    /// A keypoint at (0.5, 0.5) on an even-sized W×H frame therefore lands
    /// exactly on (W/2, H/2).
    ///
    /// # Arguments
    ///
    /// * `width` - Frame width in pixels.
    /// * `height` - Frame height in pixels.
    ///
    /// # Returns
    ///
    /// * Pixel coordinates as (x, y).
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn to_pixel(&self, width: u32, height: u32) -> (i32, i32) {
        ((self.x * width as f32) as i32, (self.y * height as f32) as i32)
    }
}

/// One detected person's full set of keypoints.
///
/// The keypoint sequence has fixed length [`crate::skeleton::NUM_KEYPOINTS`];
/// coordinate and score sequences are one struct per joint, so they always
/// have equal length.
#[derive(Debug, Clone)]
pub struct Body {
    /// Keypoints in model output order.
    pub keypoints: Vec<Keypoint>,
    /// Overall body confidence score in [0, 1].
    pub score: f32,
}

impl Body {
    /// Create a new body from its keypoints and overall score.
    #[must_use]
    pub const fn new(keypoints: Vec<Keypoint>, score: f32) -> Self {
        Self { keypoints, score }
    }

    /// Get the number of keypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    /// Check if the body has no keypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }

    /// Count keypoints with a score at or above `threshold`.
    #[must_use]
    pub fn confident_keypoints(&self, threshold: f32) -> usize {
        self.keypoints.iter().filter(|k| k.score >= threshold).count()
    }
}

/// Per-frame pose inference result.
///
/// Single-body models populate exactly one `Body`.
#[derive(Debug, Clone, Default)]
pub struct PoseResult {
    /// Detected bodies for the frame.
    pub bodies: Vec<Body>,
    /// Per-phase timing information.
    pub speed: Speed,
}

impl PoseResult {
    /// Create a new result from bodies and timings.
    #[must_use]
    pub const fn new(bodies: Vec<Body>, speed: Speed) -> Self {
        Self { bodies, speed }
    }

    /// Get the number of detected bodies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Check if no bodies were detected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Generate a verbose log string describing the result.
    ///
    /// # Returns
    ///
    /// * A string summary (e.g., "1 body, ").
    #[must_use]
    pub fn verbose(&self) -> String {
        if self.is_empty() {
            return "(no bodies), ".to_string();
        }
        let suffix = if self.len() > 1 { "bodies" } else { "body" };
        format!("{} {suffix}, ", self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_zero_at_construction() {
        let speed = Speed::default();
        assert!(speed.preprocess.abs() < f64::EPSILON);
        assert!(speed.inference.abs() < f64::EPSILON);
        assert!(speed.postprocess.abs() < f64::EPSILON);
    }

    #[test]
    fn test_speed_total() {
        let speed = Speed::new(10.0, 20.0, 5.0);
        assert!((speed.total() - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_keypoint_to_pixel_center() {
        // Normalized (0.5, 0.5) lands exactly on the frame center.
        let kpt = Keypoint::new(0.5, 0.5, 1.0);
        assert_eq!(kpt.to_pixel(640, 480), (320, 240));
    }

    #[test]
    fn test_keypoint_to_pixel_truncates() {
        let kpt = Keypoint::new(0.999, 0.999, 1.0);
        // 0.999 * 100 = 99.9, truncated toward zero.
        assert_eq!(kpt.to_pixel(100, 100), (99, 99));

        let origin = Keypoint::new(0.0, 0.0, 1.0);
        assert_eq!(origin.to_pixel(100, 100), (0, 0));
    }

    #[test]
    fn test_body_confident_keypoints() {
        let body = Body::new(
            vec![
                Keypoint::new(0.1, 0.1, 0.9),
                Keypoint::new(0.2, 0.2, 0.1),
                Keypoint::new(0.3, 0.3, 0.2),
            ],
            0.4,
        );
        assert_eq!(body.len(), 3);
        assert_eq!(body.confident_keypoints(0.2), 2);
    }

    #[test]
    fn test_result_verbose() {
        let result = PoseResult::default();
        assert!(result.is_empty());
        assert_eq!(result.verbose(), "(no bodies), ");

        let result = PoseResult::new(vec![Body::new(vec![], 0.0)], Speed::default());
        assert_eq!(result.verbose(), "1 body, ");
    }
}
