// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Pose engine: the core inference orchestrator.
//!
//! A [`PoseEngine`] exclusively owns one inference runtime and the input and
//! output tensor descriptors. Construction is initialization (the runtime
//! session is live once `load` returns) and drop is finalization; the
//! at-most-one-live-engine policy belongs to [`crate::session::PoseSession`].

use std::path::Path;
use std::time::Instant;

use image::RgbImage;

use crate::config::PoseConfig;
use crate::error::{PoseError, Result};
use crate::postprocessing::decode_keypoints;
use crate::preprocessing::preprocess_image;
use crate::results::{PoseResult, Speed};
use crate::runtime::{InferenceRuntime, OrtRuntime, TensorInfo};
use crate::skeleton::NUM_KEYPOINTS;

/// Model file name resolved under the work directory.
pub const MODEL_FILE: &str = "movenet_singlepose_lightning.onnx";

/// Pose estimation engine.
///
/// Runs the full per-frame pipeline: preprocess, runtime invocation, and
/// keypoint decode, timing each phase. Keypoints in the returned result stay
/// in normalized [0, 1] model space; the engine is resolution-agnostic.
///
/// # Example
///
/// ```no_run
/// use movenet_inference::{PoseConfig, PoseEngine};
///
/// let mut engine = PoseEngine::load("models/", PoseConfig::default()).unwrap();
/// let frame = image::open("frame.jpg").unwrap().to_rgb8();
/// let result = engine.process(&frame).unwrap();
/// println!("{} keypoints", result.bodies[0].len());
/// ```
pub struct PoseEngine {
    /// Model execution backend.
    runtime: Box<dyn InferenceRuntime>,
    /// Declared input tensor descriptors.
    input_info: Vec<TensorInfo>,
    /// Declared output tensor descriptors.
    output_info: Vec<TensorInfo>,
    /// Inference configuration.
    config: PoseConfig,
}

impl PoseEngine {
    /// Load the pose model from a work directory.
    ///
    /// Resolves [`MODEL_FILE`] under `work_dir`, builds the tensor
    /// descriptors for the fixed single-body architecture, and configures the
    /// ONNX Runtime backend with the requested thread count.
    ///
    /// # Arguments
    ///
    /// * `work_dir` - Directory containing the model file.
    /// * `config` - Inference configuration.
    ///
    /// # Errors
    ///
    /// Returns `PoseError::ModelLoadError` if the model file is missing,
    /// unreadable, or incompatible with the declared descriptors.
    pub fn load<P: AsRef<Path>>(work_dir: P, config: PoseConfig) -> Result<Self> {
        let model_path = work_dir.as_ref().join(MODEL_FILE);
        let (input_info, output_info) = Self::tensor_descriptors(&config);

        let runtime = OrtRuntime::load(&model_path, config.num_threads, &input_info, &output_info)?;

        Ok(Self {
            runtime: Box::new(runtime),
            input_info,
            output_info,
            config,
        })
    }

    /// Create an engine over a caller-supplied runtime backend.
    ///
    /// Seam for custom [`InferenceRuntime`] implementations and for tests
    /// that stub out model execution.
    #[must_use]
    pub fn from_runtime(runtime: Box<dyn InferenceRuntime>, config: PoseConfig) -> Self {
        let (input_info, output_info) = Self::tensor_descriptors(&config);
        Self {
            runtime,
            input_info,
            output_info,
            config,
        }
    }

    /// Build the descriptor lists for the fixed single-body architecture:
    /// one RGB image input, one keypoint regression output.
    fn tensor_descriptors(config: &PoseConfig) -> (Vec<TensorInfo>, Vec<TensorInfo>) {
        let (h, w) = config.input_size;
        let inputs = vec![TensorInfo::new("input", vec![1, 3, h, w])];
        let outputs = vec![TensorInfo::new("output_0", vec![1, 1, NUM_KEYPOINTS, 3])];
        (inputs, outputs)
    }

    /// Run the full pipeline on one frame.
    ///
    /// # Arguments
    ///
    /// * `frame` - Input RGB frame of arbitrary non-zero dimensions. Never
    ///   mutated; overlay drawing is the session's job.
    ///
    /// # Returns
    ///
    /// A [`PoseResult`] with one `Body` per output body slot and the three
    /// per-phase timings in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `PoseError::InvalidInput` for empty frames and
    /// `PoseError::InferenceError` for runtime faults or shape mismatches.
    pub fn process(&mut self, frame: &RgbImage) -> Result<PoseResult> {
        let start_preprocess = Instant::now();
        let preprocessed = preprocess_image(frame, self.config.input_size)?;
        let preprocess_time = start_preprocess.elapsed().as_secs_f64() * 1000.0;

        let start_inference = Instant::now();
        let outputs = self.runtime.run(&preprocessed.tensor)?;
        let inference_time = start_inference.elapsed().as_secs_f64() * 1000.0;

        let start_postprocess = Instant::now();
        let (data, shape) = outputs
            .first()
            .ok_or_else(|| PoseError::InferenceError("model produced no output tensors".to_string()))?;
        let bodies = decode_keypoints(data, shape)?;
        let postprocess_time = start_postprocess.elapsed().as_secs_f64() * 1000.0;

        Ok(PoseResult::new(
            bodies,
            Speed::new(preprocess_time, inference_time, postprocess_time),
        ))
    }

    /// Get the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &PoseConfig {
        &self.config
    }

    /// Get the model input size as (height, width).
    #[must_use]
    pub const fn input_size(&self) -> (usize, usize) {
        self.config.input_size
    }

    /// Get the declared input tensor descriptors.
    #[must_use]
    pub fn input_info(&self) -> &[TensorInfo] {
        &self.input_info
    }

    /// Get the declared output tensor descriptors.
    #[must_use]
    pub fn output_info(&self) -> &[TensorInfo] {
        &self.output_info
    }
}

impl std::fmt::Debug for PoseEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoseEngine")
            .field("input_size", &self.config.input_size)
            .field("num_threads", &self.config.num_threads)
            .field("inputs", &self.input_info)
            .field("outputs", &self.output_info)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;

    struct StubRuntime {
        score: f32,
    }

    impl InferenceRuntime for StubRuntime {
        fn run(&mut self, _input: &Array4<f32>) -> Result<Vec<(Vec<f32>, Vec<usize>)>> {
            let mut data = Vec::with_capacity(NUM_KEYPOINTS * 3);
            for _ in 0..NUM_KEYPOINTS {
                data.extend_from_slice(&[0.5, 0.5, self.score]);
            }
            Ok(vec![(data, vec![1, 1, NUM_KEYPOINTS, 3])])
        }
    }

    struct EmptyRuntime;

    impl InferenceRuntime for EmptyRuntime {
        fn run(&mut self, _input: &Array4<f32>) -> Result<Vec<(Vec<f32>, Vec<usize>)>> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_load_missing_model() {
        let result = PoseEngine::load("nonexistent_dir", PoseConfig::default());
        assert!(matches!(result, Err(PoseError::ModelLoadError(_))));
    }

    #[test]
    fn test_process_single_body_and_timings() {
        let mut engine =
            PoseEngine::from_runtime(Box::new(StubRuntime { score: 0.8 }), PoseConfig::default());
        let frame = RgbImage::new(320, 240);

        let result = engine.process(&frame).unwrap();
        assert_eq!(result.bodies.len(), 1);
        assert_eq!(result.bodies[0].len(), NUM_KEYPOINTS);
        assert!(result.speed.preprocess >= 0.0);
        assert!(result.speed.inference >= 0.0);
        assert!(result.speed.postprocess >= 0.0);
    }

    #[test]
    fn test_process_rejects_empty_frame() {
        let mut engine =
            PoseEngine::from_runtime(Box::new(StubRuntime { score: 0.8 }), PoseConfig::default());
        let frame = RgbImage::new(0, 0);
        assert!(matches!(
            engine.process(&frame),
            Err(PoseError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_process_requires_output_tensor() {
        let mut engine = PoseEngine::from_runtime(Box::new(EmptyRuntime), PoseConfig::default());
        let frame = RgbImage::new(64, 64);
        assert!(matches!(
            engine.process(&frame),
            Err(PoseError::InferenceError(_))
        ));
    }

    #[test]
    fn test_descriptors_follow_config() {
        let engine = PoseEngine::from_runtime(
            Box::new(StubRuntime { score: 0.0 }),
            PoseConfig::default().with_input_size(256, 256),
        );
        assert_eq!(engine.input_info()[0].shape, vec![1, 3, 256, 256]);
        assert_eq!(engine.output_info()[0].shape, vec![1, 1, NUM_KEYPOINTS, 3]);
    }
}
