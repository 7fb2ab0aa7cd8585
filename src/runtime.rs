// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Inference runtime adapter.
//!
//! The pose engine delegates model execution to an opaque capability behind
//! the [`InferenceRuntime`] trait: given the preprocessed input tensor, it
//! produces the raw output tensors. [`OrtRuntime`] is the ONNX Runtime
//! implementation; custom backends (or test stubs) implement the trait.

use std::path::Path;

use ndarray::Array4;
use ort::session::Session;
use ort::value::TensorRef;

use crate::error::{PoseError, Result};

/// Static metadata describing one model input or output tensor.
///
/// Created once at engine construction and read-only thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorInfo {
    /// Tensor name as declared by the model.
    pub name: String,
    /// Tensor shape, outermost dimension first.
    pub shape: Vec<usize>,
}

impl TensorInfo {
    /// Create a new tensor descriptor.
    #[must_use]
    pub fn new(name: &str, shape: Vec<usize>) -> Self {
        Self {
            name: name.to_string(),
            shape,
        }
    }

    /// Number of elements in a tensor of this shape.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.shape.iter().product()
    }
}

/// Opaque model-execution capability.
///
/// `run` is synchronous and blocking with no cancellation or timeout: a hung
/// backend call blocks the caller indefinitely. The backend may parallelize
/// internally across its configured thread count.
pub trait InferenceRuntime {
    /// Execute the model on one preprocessed input tensor.
    ///
    /// # Arguments
    ///
    /// * `input` - NCHW FP32 input tensor matching the declared input shape.
    ///
    /// # Returns
    ///
    /// One (data, shape) pair per model output tensor, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns `PoseError::InferenceError` on shape mismatch or backend fault.
    fn run(&mut self, input: &Array4<f32>) -> Result<Vec<(Vec<f32>, Vec<usize>)>>;
}

/// ONNX Runtime implementation of [`InferenceRuntime`].
pub struct OrtRuntime {
    /// ONNX Runtime session.
    session: Session,
    /// Input tensor name.
    input_name: String,
    /// Output tensor names.
    output_names: Vec<String>,
    /// Declared input shape, checked on every `run`.
    input_shape: Vec<usize>,
}

impl OrtRuntime {
    /// Load a model file and configure the runtime session.
    ///
    /// # Arguments
    ///
    /// * `model_path` - Path to the ONNX model file.
    /// * `num_threads` - Intra-op thread count for the session.
    /// * `inputs` - Declared input tensor descriptors.
    /// * `outputs` - Declared output tensor descriptors.
    ///
    /// # Errors
    ///
    /// Returns `PoseError::ModelLoadError` if the file is missing or can't be
    /// loaded, or if the model's input/output arity does not match the
    /// declared descriptors.
    pub fn load(
        model_path: &Path,
        num_threads: usize,
        inputs: &[TensorInfo],
        outputs: &[TensorInfo],
    ) -> Result<Self> {
        if !model_path.exists() {
            return Err(PoseError::ModelLoadError(format!(
                "Model file not found: {}",
                model_path.display()
            )));
        }

        let session = Session::builder()
            .map_err(|e| {
                PoseError::ModelLoadError(format!("Failed to create session builder: {e}"))
            })?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)
            .map_err(|e| {
                PoseError::ModelLoadError(format!("Failed to set optimization level: {e}"))
            })?
            .with_intra_threads(num_threads)
            .map_err(|e| {
                PoseError::ModelLoadError(format!("Failed to set intra-thread count: {e}"))
            })?
            .commit_from_file(model_path)
            .map_err(|e| PoseError::ModelLoadError(format!("Failed to load model: {e}")))?;

        // Architectural compatibility: the model must expose exactly the
        // declared tensor arity.
        if session.inputs.len() != inputs.len() || session.outputs.len() != outputs.len() {
            return Err(PoseError::ModelLoadError(format!(
                "Model has {} inputs / {} outputs, expected {} / {}",
                session.inputs.len(),
                session.outputs.len(),
                inputs.len(),
                outputs.len()
            )));
        }

        // The session's own names win over the declared ones; descriptor
        // names are a convention, not a contract with every export tool.
        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| inputs[0].name.clone());
        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();

        let input_shape = inputs[0].shape.clone();

        Ok(Self {
            session,
            input_name,
            output_names,
            input_shape,
        })
    }
}

impl InferenceRuntime for OrtRuntime {
    fn run(&mut self, input: &Array4<f32>) -> Result<Vec<(Vec<f32>, Vec<usize>)>> {
        if input.shape() != self.input_shape.as_slice() {
            return Err(PoseError::InferenceError(format!(
                "input tensor shape {:?} does not match declared shape {:?}",
                input.shape(),
                self.input_shape
            )));
        }

        // Ensure input is contiguous in memory (CowArray).
        let input_contiguous = input.as_standard_layout();

        let input_tensor = TensorRef::from_array_view(&input_contiguous).map_err(|e| {
            PoseError::InferenceError(format!("Failed to create input tensor: {e}"))
        })?;

        let inputs = ort::inputs![&self.input_name => input_tensor];

        let session_outputs = self
            .session
            .run(inputs)
            .map_err(|e| PoseError::InferenceError(format!("Inference failed: {e}")))?;

        let mut results = Vec::with_capacity(self.output_names.len());
        for output_name in &self.output_names {
            let output = session_outputs.get(output_name.as_str()).ok_or_else(|| {
                PoseError::InferenceError(format!("Output '{output_name}' not found"))
            })?;

            let (shape, data) = output.try_extract_tensor::<f32>().map_err(|e| {
                PoseError::InferenceError(format!("Failed to extract output: {e}"))
            })?;

            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let shape_vec: Vec<usize> = shape.iter().map(|&d| d as usize).collect();
            results.push((data.to_vec(), shape_vec));
        }

        Ok(results)
    }
}

impl std::fmt::Debug for OrtRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtRuntime")
            .field("input_name", &self.input_name)
            .field("output_names", &self.output_names)
            .field("input_shape", &self.input_shape)
            .finish_non_exhaustive()
    }
}
