// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Per-frame overlay session (process facade).
//!
//! [`PoseSession`] is an explicit, caller-owned object replacing the
//! process-wide singleton of classic image-processor facades: each session
//! owns at most one live [`PoseEngine`] plus its own FPS timer, so
//! independent sessions cannot corrupt each other's state. The
//! single-active-engine policy survives as an explicit already-initialized
//! check.
//!
//! State machine: `Uninitialized -> (initialize ok) -> Ready ->
//! (finalize ok) -> Uninitialized`. `process` and `command` are only legal in
//! `Ready`; wrong-state calls fail without side effects.

use std::path::Path;
use std::time::Instant;

use ab_glyph::FontVec;
use image::RgbImage;

use crate::annotate;
use crate::config::PoseConfig;
use crate::engine::PoseEngine;
use crate::error::{PoseError, Result};
use crate::results::PoseResult;

/// Overlay session wrapping one pose engine.
///
/// # Example
///
/// ```no_run
/// use movenet_inference::{PoseConfig, PoseSession};
///
/// let mut session = PoseSession::new();
/// session.initialize("models/", PoseConfig::default()).unwrap();
///
/// let mut frame = image::open("frame.jpg").unwrap().to_rgb8();
/// let result = session.process(&mut frame).unwrap();
/// println!("inference: {:.1} ms", result.speed.inference);
///
/// session.finalize().unwrap();
/// ```
#[derive(Default)]
pub struct PoseSession {
    /// Live engine; `None` while uninitialized.
    engine: Option<PoseEngine>,
    /// Overlay font; `None` skips text overlays.
    font: Option<FontVec>,
    /// Keypoint confidence threshold for drawing.
    threshold: f32,
    /// Timestamp of the previous `process` call, for the rolling FPS
    /// estimate. Deliberately carried across frames; the only cross-frame
    /// state in the pipeline.
    last_frame: Option<Instant>,
}

impl PoseSession {
    /// Create a new, uninitialized session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialize the session: load the model and the overlay font from the
    /// work directory.
    ///
    /// # Arguments
    ///
    /// * `work_dir` - Directory containing the model file and optional
    ///   `Arial.ttf`.
    /// * `config` - Inference and drawing configuration.
    ///
    /// # Errors
    ///
    /// Returns `PoseError::AlreadyInitialized` if an engine is already live
    /// (the first session remains usable), or `PoseError::ModelLoadError` if
    /// the model cannot be loaded.
    pub fn initialize<P: AsRef<Path>>(&mut self, work_dir: P, config: PoseConfig) -> Result<()> {
        if self.engine.is_some() {
            return Err(PoseError::AlreadyInitialized);
        }

        let work_dir = work_dir.as_ref();
        let engine = PoseEngine::load(work_dir, config)?;
        self.font = annotate::load_font(work_dir);
        self.install(engine);
        Ok(())
    }

    /// Initialize the session with a preloaded engine.
    ///
    /// For custom [`crate::runtime::InferenceRuntime`] backends. No font is
    /// loaded, so text overlays are skipped.
    ///
    /// # Errors
    ///
    /// Returns `PoseError::AlreadyInitialized` if an engine is already live.
    pub fn initialize_with_engine(&mut self, engine: PoseEngine) -> Result<()> {
        if self.engine.is_some() {
            return Err(PoseError::AlreadyInitialized);
        }
        self.install(engine);
        Ok(())
    }

    fn install(&mut self, engine: PoseEngine) {
        self.threshold = engine.config().confidence_threshold;
        self.last_frame = None;
        self.engine = Some(engine);
    }

    /// Finalize the session, releasing the engine and descriptors.
    ///
    /// # Errors
    ///
    /// Returns `PoseError::NotInitialized` if no engine is live.
    pub fn finalize(&mut self) -> Result<()> {
        if self.engine.take().is_none() {
            return Err(PoseError::NotInitialized);
        }
        self.font = None;
        self.last_frame = None;
        Ok(())
    }

    /// Runtime command extension hook.
    ///
    /// Reserved for future runtime toggles; every command code is currently
    /// rejected. Legal only in the `Ready` state.
    ///
    /// # Errors
    ///
    /// Returns `PoseError::NotInitialized` before `initialize`, otherwise
    /// `PoseError::UnsupportedCommand` for every code.
    pub fn command(&mut self, cmd: i32) -> Result<()> {
        if self.engine.is_none() {
            return Err(PoseError::NotInitialized);
        }
        Err(PoseError::UnsupportedCommand(cmd))
    }

    /// Run inference on one frame and draw the overlay in place.
    ///
    /// For each body: denormalizes keypoints from [0, 1] model space to the
    /// frame's pixel dimensions, draws joint-lines where both endpoints
    /// clear the confidence threshold, then markers for each keypoint
    /// clearing it independently. Overlays a rolling FPS estimate (wall-clock
    /// delta between successive `process` calls, 0.0 before the second call)
    /// and the inference latency as text when a font is available.
    ///
    /// # Arguments
    ///
    /// * `frame` - Frame to process and mutate in place.
    ///
    /// # Returns
    ///
    /// The engine's [`PoseResult`] with its three timings unchanged.
    ///
    /// # Errors
    ///
    /// Returns `PoseError::NotInitialized` before `initialize` (frame
    /// untouched). Engine errors pass through; the session stays `Ready` and
    /// the next frame may be processed.
    pub fn process(&mut self, frame: &mut RgbImage) -> Result<PoseResult> {
        let engine = self.engine.as_mut().ok_or(PoseError::NotInitialized)?;
        let result = engine.process(frame)?;

        for body in &result.bodies {
            annotate::draw_skeleton(frame, body, self.threshold);
        }

        let now = Instant::now();
        let fps = self.last_frame.map_or(0.0, |previous| {
            let elapsed = now.duration_since(previous).as_secs_f64();
            if elapsed > 0.0 { 1.0 / elapsed } else { 0.0 }
        });
        self.last_frame = Some(now);

        if let Some(ref font) = self.font {
            let text = format!("FPS: {fps:.1}, Inference: {:.1} [ms]", result.speed.inference);
            annotate::draw_banner(frame, font, &text);
        }

        Ok(result)
    }

    /// Check whether the session is in the `Ready` state.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.engine.is_some()
    }

    /// Get the active drawing threshold.
    #[must_use]
    pub const fn threshold(&self) -> f32 {
        self.threshold
    }
}

impl std::fmt::Debug for PoseSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoseSession")
            .field("ready", &self.is_ready())
            .field("threshold", &self.threshold)
            .field("has_font", &self.font.is_some())
            .finish()
    }
}
