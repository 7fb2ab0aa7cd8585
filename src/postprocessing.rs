// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Post-processing for pose model outputs.
//!
//! Decodes the raw keypoint regression tensor into per-body keypoint lists.
//! The MoveNet single-pose head emits `[1, bodies, 17, 3]` where each joint
//! triple is (y, x, score), all normalized to [0, 1] relative to the model
//! input resolution. Some exports squeeze the body axis to `[1, 17, 3]`;
//! both layouts are accepted.
//!
//! Decode never rescales coordinates to frame pixels and never applies a
//! confidence threshold: denormalization and filtering are presentation
//! decisions owned by the consumer that knows the frame size.

use crate::error::{PoseError, Result};
use crate::results::{Body, Keypoint};
use crate::skeleton::NUM_KEYPOINTS;

/// Values per keypoint in the output tensor: (y, x, score).
const KPT_DIM: usize = 3;

/// Decode a raw keypoint regression tensor into bodies.
///
/// # Arguments
///
/// * `output` - Flat output tensor data.
/// * `shape` - Output tensor shape, `[1, B, 17, 3]` or `[1, 17, 3]`.
///
/// # Returns
///
/// One `Body` per body slot, keypoints clamped into [0, 1]. Single-body
/// models yield exactly one entry.
///
/// # Errors
///
/// Returns `PoseError::InferenceError` if the tensor shape or element count
/// does not match the declared keypoint layout.
pub fn decode_keypoints(output: &[f32], shape: &[usize]) -> Result<Vec<Body>> {
    let num_bodies = match *shape {
        [1, bodies, NUM_KEYPOINTS, KPT_DIM] => bodies,
        [1, NUM_KEYPOINTS, KPT_DIM] => 1,
        _ => {
            return Err(PoseError::InferenceError(format!(
                "unexpected output shape {shape:?}, expected [1, N, {NUM_KEYPOINTS}, {KPT_DIM}]"
            )));
        }
    };

    let expected_len = num_bodies * NUM_KEYPOINTS * KPT_DIM;
    if output.len() != expected_len {
        return Err(PoseError::InferenceError(format!(
            "output has {} elements, expected {expected_len} for shape {shape:?}",
            output.len()
        )));
    }

    let mut bodies = Vec::with_capacity(num_bodies);
    for b in 0..num_bodies {
        let mut keypoints = Vec::with_capacity(NUM_KEYPOINTS);
        let mut score_sum = 0.0f32;

        for k in 0..NUM_KEYPOINTS {
            let offset = (b * NUM_KEYPOINTS + k) * KPT_DIM;
            let y = sanitize(output[offset]);
            let x = sanitize(output[offset + 1]);
            let score = sanitize(output[offset + 2]);

            score_sum += score;
            keypoints.push(Keypoint::new(x, y, score));
        }

        // The regression head has no separate body confidence; report the
        // mean keypoint score.
        #[allow(clippy::cast_precision_loss)]
        let body_score = score_sum / NUM_KEYPOINTS as f32;
        bodies.push(Body::new(keypoints, body_score));
    }

    Ok(bodies)
}

/// Clamp a model output value into [0, 1], mapping NaN to 0.
fn sanitize(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_output(bodies: usize, triple: [f32; 3]) -> Vec<f32> {
        let mut out = Vec::with_capacity(bodies * NUM_KEYPOINTS * KPT_DIM);
        for _ in 0..bodies * NUM_KEYPOINTS {
            out.extend_from_slice(&triple);
        }
        out
    }

    #[test]
    fn test_decode_single_body() {
        let output = flat_output(1, [0.25, 0.75, 0.9]);
        let bodies = decode_keypoints(&output, &[1, 1, NUM_KEYPOINTS, 3]).unwrap();

        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0].len(), NUM_KEYPOINTS);
        // (y, x, score) ordering: y comes first in the tensor.
        assert!((bodies[0].keypoints[0].y - 0.25).abs() < 1e-6);
        assert!((bodies[0].keypoints[0].x - 0.75).abs() < 1e-6);
        assert!((bodies[0].keypoints[0].score - 0.9).abs() < 1e-6);
        assert!((bodies[0].score - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_decode_squeezed_shape() {
        let output = flat_output(1, [0.5, 0.5, 0.5]);
        let bodies = decode_keypoints(&output, &[1, NUM_KEYPOINTS, 3]).unwrap();
        assert_eq!(bodies.len(), 1);
    }

    #[test]
    fn test_decode_multi_body_slots() {
        let output = flat_output(3, [0.5, 0.5, 0.5]);
        let bodies = decode_keypoints(&output, &[1, 3, NUM_KEYPOINTS, 3]).unwrap();
        assert_eq!(bodies.len(), 3);
    }

    #[test]
    fn test_decode_clamps_coordinates() {
        let output = flat_output(1, [-0.5, 1.5, f32::NAN]);
        let bodies = decode_keypoints(&output, &[1, 1, NUM_KEYPOINTS, 3]).unwrap();

        let kpt = bodies[0].keypoints[0];
        assert!(kpt.y.abs() < 1e-6);
        assert!((kpt.x - 1.0).abs() < 1e-6);
        assert!(kpt.score.abs() < 1e-6);
    }

    #[test]
    fn test_decode_rejects_bad_shape() {
        let output = vec![0.0f32; 10];
        let result = decode_keypoints(&output, &[1, 10]);
        assert!(matches!(result, Err(PoseError::InferenceError(_))));

        // Right rank, wrong joint count.
        let output = vec![0.0f32; 5 * 3];
        let result = decode_keypoints(&output, &[1, 1, 5, 3]);
        assert!(matches!(result, Err(PoseError::InferenceError(_))));
    }

    #[test]
    fn test_decode_rejects_short_buffer() {
        let output = vec![0.0f32; NUM_KEYPOINTS]; // far too few elements
        let result = decode_keypoints(&output, &[1, 1, NUM_KEYPOINTS, 3]);
        assert!(matches!(result, Err(PoseError::InferenceError(_))));
    }
}
