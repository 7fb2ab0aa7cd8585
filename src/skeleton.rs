// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Skeleton topology constants for the single-body keypoint layout.

/// Number of keypoints predicted per body (COCO layout).
pub const NUM_KEYPOINTS: usize = 17;

/// Keypoint names in model output order (COCO layout).
pub const KEYPOINT_NAMES: [&str; NUM_KEYPOINTS] = [
    "nose",
    "left_eye",
    "right_eye",
    "left_ear",
    "right_ear",
    "left_shoulder",
    "right_shoulder",
    "left_elbow",
    "right_elbow",
    "left_wrist",
    "right_wrist",
    "left_hip",
    "right_hip",
    "left_knee",
    "right_knee",
    "left_ankle",
    "right_ankle",
];

/// Skeleton structure (pairs of keypoint indices).
/// Defines which keypoints connect to form a drawn joint-line. Anatomical
/// topology, not user-configurable.
pub const JOINT_LINES: [[usize; 2]; 16] = [
    // face
    [0, 2],   // nose to right eye
    [2, 4],   // right eye to right ear
    [0, 1],   // nose to left eye
    [1, 3],   // left eye to left ear
    // torso
    [6, 5],   // right shoulder to left shoulder
    [5, 11],  // left shoulder to left hip
    [11, 12], // left hip to right hip
    [12, 6],  // right hip to right shoulder
    // arms
    [6, 8],   // right shoulder to right elbow
    [8, 10],  // right elbow to right wrist
    [5, 7],   // left shoulder to left elbow
    [7, 9],   // left elbow to left wrist
    // legs
    [12, 14], // right hip to right knee
    [14, 16], // right knee to right ankle
    [11, 13], // left hip to left knee
    [13, 15], // left knee to left ankle
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_lines_indices_valid() {
        for line in &JOINT_LINES {
            assert!(line[0] < NUM_KEYPOINTS);
            assert!(line[1] < NUM_KEYPOINTS);
            assert_ne!(line[0], line[1]);
        }
    }

    #[test]
    fn test_keypoint_names_cover_layout() {
        assert_eq!(KEYPOINT_NAMES.len(), NUM_KEYPOINTS);
        assert_eq!(KEYPOINT_NAMES[0], "nose");
        assert_eq!(KEYPOINT_NAMES[16], "right_ankle");
    }
}
