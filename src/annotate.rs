// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Skeleton overlay drawing.
//!
//! Two independently-gated passes draw onto the frame: joint-line segments
//! where BOTH endpoints clear the confidence threshold, then a filled marker
//! at every keypoint clearing the threshold on its own. A keypoint can be
//! drawn with none of its incident lines, and vice versa.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut, draw_text_mut, text_size,
};
use imageproc::rect::Rect;

use crate::results::Body;
use crate::skeleton::JOINT_LINES;

/// Assets URL for downloading fonts.
const ASSETS_URL: &str = "https://github.com/ultralytics/assets/releases/download/v0.0.0";

/// Overlay font file name, looked up in the work directory first.
const FONT_NAME: &str = "Arial.ttf";

/// Joint-line color (light gray).
pub const LINE_COLOR: Rgb<u8> = Rgb([200, 200, 200]);

/// Joint-line thickness in pixels.
pub const LINE_WIDTH: u32 = 2;

/// Keypoint marker color (green).
pub const MARKER_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Keypoint marker radius in pixels.
pub const MARKER_RADIUS: i32 = 5;

/// Banner text color (black).
pub const BANNER_TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// Banner background color (light gray).
pub const BANNER_BG_COLOR: Rgb<u8> = Rgb([180, 180, 180]);

/// Banner text height in pixels.
const BANNER_SCALE: f32 = 16.0;

/// Banner padding around the text in pixels.
const BANNER_PAD: u32 = 4;

/// Select the joint-line segments to draw for a body.
///
/// A segment is drawn only when BOTH endpoint keypoints score at or above
/// `threshold`. Endpoints are denormalized to pixel coordinates for a frame
/// of `frame_size` (width, height).
#[must_use]
pub fn skeleton_segments(
    body: &Body,
    frame_size: (u32, u32),
    threshold: f32,
) -> Vec<((i32, i32), (i32, i32))> {
    let (width, height) = frame_size;
    JOINT_LINES
        .iter()
        .filter_map(|&[a, b]| {
            let (ka, kb) = (body.keypoints.get(a)?, body.keypoints.get(b)?);
            if ka.score >= threshold && kb.score >= threshold {
                Some((ka.to_pixel(width, height), kb.to_pixel(width, height)))
            } else {
                None
            }
        })
        .collect()
}

/// Select the keypoint markers to draw for a body.
///
/// Each keypoint is gated independently on its own score.
#[must_use]
pub fn visible_keypoints(body: &Body, frame_size: (u32, u32), threshold: f32) -> Vec<(i32, i32)> {
    let (width, height) = frame_size;
    body.keypoints
        .iter()
        .filter(|k| k.score >= threshold)
        .map(|k| k.to_pixel(width, height))
        .collect()
}

/// Draw the skeleton overlay for one body onto the frame.
///
/// # Arguments
///
/// * `frame` - Frame to mutate in place.
/// * `body` - Body with normalized keypoints.
/// * `threshold` - Confidence threshold gating both drawing passes.
pub fn draw_skeleton(frame: &mut RgbImage, body: &Body, threshold: f32) {
    let frame_size = frame.dimensions();

    for ((x0, y0), (x1, y1)) in skeleton_segments(body, frame_size, threshold) {
        // Emulate line thickness with vertically offset passes.
        #[allow(clippy::cast_precision_loss)]
        for t in 0..LINE_WIDTH {
            let dy = t as f32;
            draw_line_segment_mut(
                frame,
                (x0 as f32, y0 as f32 + dy),
                (x1 as f32, y1 as f32 + dy),
                LINE_COLOR,
            );
        }
    }

    for (x, y) in visible_keypoints(body, frame_size, threshold) {
        draw_filled_circle_mut(frame, (x, y), MARKER_RADIUS, MARKER_COLOR);
    }
}

/// Draw the diagnostics banner (text on a filled background) at the frame's
/// top-left corner.
pub fn draw_banner(frame: &mut RgbImage, font: &FontVec, text: &str) {
    let scale = PxScale::from(BANNER_SCALE);
    let (text_w, text_h) = text_size(scale, font, text);

    let rect_w = (text_w + 2 * BANNER_PAD).min(frame.width());
    let rect_h = (text_h + 2 * BANNER_PAD).min(frame.height());
    if rect_w == 0 || rect_h == 0 {
        return;
    }

    draw_filled_rect_mut(
        frame,
        Rect::at(0, 0).of_size(rect_w, rect_h),
        BANNER_BG_COLOR,
    );
    #[allow(clippy::cast_possible_wrap)]
    draw_text_mut(
        frame,
        BANNER_TEXT_COLOR,
        BANNER_PAD as i32,
        BANNER_PAD as i32,
        scale,
        font,
        text,
    );
}

/// Resolve the overlay font.
///
/// Looks for [`FONT_NAME`] in the work directory first, then in the user
/// config cache, downloading into the cache as a last resort. Returns `None`
/// when no font can be found; the session then skips text overlays.
#[must_use]
pub fn load_font(work_dir: &Path) -> Option<FontVec> {
    let local = work_dir.join(FONT_NAME);
    let font_path = if local.exists() {
        local
    } else {
        check_font(FONT_NAME)?
    };

    let mut buffer = Vec::new();
    File::open(font_path)
        .ok()?
        .read_to_end(&mut buffer)
        .ok()?;
    FontVec::try_from_vec(buffer).ok()
}

/// Check if a font exists in the config cache or download it.
fn check_font(font: &str) -> Option<PathBuf> {
    let font_name = Path::new(font).file_name()?.to_string_lossy();
    let config_dir = dirs::config_dir()?.join("movenet-inference");
    let font_path = config_dir.join(font_name.as_ref());

    if font_path.exists() {
        return Some(font_path);
    }

    if let Err(e) = fs::create_dir_all(&config_dir) {
        eprintln!("Failed to create config directory: {e}");
        return None;
    }

    let url = format!("{ASSETS_URL}/{font_name}");
    println!("Downloading {url} to {}", font_path.display());

    match ureq::get(&url).call() {
        Ok(response) => {
            let mut file = match File::create(&font_path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Failed to create font file: {e}");
                    return None;
                }
            };

            let mut reader = response.into_body().into_reader();
            if let Err(e) = io::copy(&mut reader, &mut file) {
                eprintln!("Failed to download font: {e}");
                let _ = fs::remove_file(&font_path);
                return None;
            }

            Some(font_path)
        }
        Err(e) => {
            eprintln!("Failed to download font from {url}: {e}");
            None
        }
    }
}
