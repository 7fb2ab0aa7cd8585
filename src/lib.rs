// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

#![allow(clippy::multiple_crate_versions)]

//! # MoveNet Pose Inference Library
//!
//! Single-body pose estimation inference library written in Rust: runs a
//! MoveNet-style network against video frames and converts the raw output
//! tensor into a structured skeleton (per-body keypoint coordinates and
//! confidence scores), rendered as an overlay with FPS and latency
//! diagnostics.
//!
//! ## Features
//!
//! - **ONNX Runtime** - Model execution via `ort` with configurable intra-op
//!   threading
//! - **Resolution-agnostic decode** - Keypoints stay in normalized [0, 1]
//!   model space until the consumer denormalizes against its own frame size
//! - **Overlay rendering** - Joint-line and marker passes gated independently
//!   by a configurable confidence threshold, plus an FPS/latency banner
//! - **Explicit sessions** - A caller-owned [`PoseSession`] with a strict
//!   initialize/process/finalize state machine, no hidden globals
//! - **Pluggable backends** - The [`runtime::InferenceRuntime`] trait admits
//!   custom execution backends and test stubs
//!
//! ## Quick Start (Library)
//!
//! ```no_run
//! use movenet_inference::{PoseConfig, PoseSession};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // The work directory holds the model file (and optional Arial.ttf).
//!     let mut session = PoseSession::new();
//!     session.initialize("models/", PoseConfig::default())?;
//!
//!     let mut frame = image::open("frame.jpg")?.to_rgb8();
//!     let result = session.process(&mut frame)?;
//!
//!     for body in &result.bodies {
//!         println!(
//!             "body score {:.2}, {} keypoints",
//!             body.score,
//!             body.len()
//!         );
//!     }
//!     println!(
//!         "pre {:.1}ms / infer {:.1}ms / post {:.1}ms",
//!         result.speed.preprocess, result.speed.inference, result.speed.postprocess
//!     );
//!
//!     session.finalize()?;
//!     Ok(())
//! }
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # Run on a single image
//! movenet-inference predict --model-dir models/ --source image.jpg
//!
//! # Run on a directory of frames and save annotated results
//! movenet-inference predict -m models/ -s frames/ --save
//!
//! # Custom threshold and thread count
//! movenet-inference predict -m models/ -s image.jpg --conf 0.3 --threads 2
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`session`] | [`PoseSession`] facade: per-frame invocation and overlay |
//! | [`engine`] | [`PoseEngine`] core orchestrator: preprocess, run, decode |
//! | [`runtime`] | [`runtime::InferenceRuntime`] trait and the ONNX backend |
//! | [`results`] | Output types ([`PoseResult`], [`Body`], [`Keypoint`], [`Speed`]) |
//! | [`preprocessing`] | Frame-to-tensor conversion |
//! | [`postprocessing`] | Keypoint regression decode |
//! | [`annotate`] | Skeleton drawing and the diagnostics banner |
//! | [`skeleton`] | Joint topology constants |
//! | [`config`] | [`PoseConfig`] for customizing inference settings |
//! | [`error`] | Error types ([`PoseError`], [`Result`]) |

// Modules
pub mod annotate;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod postprocessing;
pub mod preprocessing;
pub mod results;
pub mod runtime;
pub mod session;
pub mod skeleton;

// Re-export main types for convenience
pub use config::PoseConfig;
pub use engine::{MODEL_FILE, PoseEngine};
pub use error::{PoseError, Result};
pub use results::{Body, Keypoint, PoseResult, Speed};
pub use session::PoseSession;

// Re-export runtime types for advanced use
pub use runtime::{InferenceRuntime, TensorInfo};

// Re-export preprocessing utilities
pub use preprocessing::{PreprocessResult, preprocess_image};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        // Version should be semver format like "0.1.0"
        assert!(VERSION.contains('.'));
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "movenet-inference");
    }
}
