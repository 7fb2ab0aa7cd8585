// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Image preprocessing for pose inference.
//!
//! This module converts a raw color frame into the fixed-size, normalized
//! NCHW tensor the model expects. The resize is a plain non-uniform stretch
//! (no letterboxing): the model emits normalized coordinates relative to its
//! input square, so aspect ratio is recovered at denormalization time.

use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::RgbImage;
use ndarray::Array4;

use crate::error::{PoseError, Result};

/// Reciprocal of 255 for normalization to [0, 1].
const INV_255: f32 = 1.0 / 255.0;

/// Result of preprocessing a frame, containing the tensor and source info.
#[derive(Debug, Clone)]
pub struct PreprocessResult {
    /// Preprocessed image tensor in NCHW format, RGB, normalized to [0, 1].
    pub tensor: Array4<f32>,
    /// Original frame dimensions (height, width).
    pub orig_shape: (u32, u32),
}

/// Preprocess a frame for pose inference.
///
/// Performs a bilinear stretch-resize to the model input size (non-uniform
/// scale permitted), keeps RGB channel order, and normalizes 8-bit pixel
/// values to [0, 1] in an NCHW tensor. Pure transform; timing is measured by
/// the caller.
///
/// # Arguments
///
/// * `frame` - Input RGB frame of arbitrary non-zero dimensions.
/// * `target_size` - Model input size as (height, width).
///
/// # Errors
///
/// Returns `PoseError::InvalidInput` for zero-area frames, or an image error
/// if the resize buffers cannot be constructed.
pub fn preprocess_image(frame: &RgbImage, target_size: (usize, usize)) -> Result<PreprocessResult> {
    let (orig_width, orig_height) = frame.dimensions();
    if orig_width == 0 || orig_height == 0 {
        return Err(PoseError::InvalidInput(format!(
            "empty frame ({orig_width}x{orig_height})"
        )));
    }

    let resized = resize_frame(frame, target_size)?;
    let tensor = buffer_to_tensor(&resized, target_size);

    Ok(PreprocessResult {
        tensor,
        orig_shape: (orig_height, orig_width),
    })
}

/// Stretch-resize a frame to the target size with bilinear filtering.
fn resize_frame(frame: &RgbImage, target_size: (usize, usize)) -> Result<Vec<u8>> {
    let (src_w, src_h) = frame.dimensions();
    #[allow(clippy::cast_possible_truncation)]
    let (dst_h, dst_w) = (target_size.0 as u32, target_size.1 as u32);

    if (src_w, src_h) == (dst_w, dst_h) {
        return Ok(frame.as_raw().clone());
    }

    let src_image = Image::from_vec_u8(src_w, src_h, frame.as_raw().clone(), PixelType::U8x3)
        .map_err(|e| PoseError::ImageError(format!("Failed to create source image: {e}")))?;

    let mut dst_image = Image::new(dst_w, dst_h, PixelType::U8x3);

    let mut resizer = Resizer::new();
    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear));
    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| PoseError::ImageError(format!("Failed to resize frame: {e}")))?;

    Ok(dst_image.into_vec())
}

/// Convert a packed RGB buffer to a normalized NCHW tensor (FP32).
///
/// # Arguments
///
/// * `pixels` - Packed RGB8 buffer of `target_size` dimensions.
/// * `target_size` - Buffer dimensions as (height, width).
///
/// # Returns
///
/// Array4 with shape (1, 3, H, W) and values in [0, 1].
fn buffer_to_tensor(pixels: &[u8], target_size: (usize, usize)) -> Array4<f32> {
    let (h, w) = target_size;
    let mut tensor = Array4::zeros((1, 3, h, w));

    // Mutable slices per channel for faster access.
    let (r_slice, rest) = tensor
        .as_slice_mut()
        .expect("freshly allocated tensor is contiguous")
        .split_at_mut(h * w);
    let (g_slice, b_slice) = rest.split_at_mut(h * w);

    for (i, chunk) in pixels.chunks_exact(3).enumerate() {
        r_slice[i] = f32::from(chunk[0]) * INV_255;
        g_slice[i] = f32::from(chunk[1]) * INV_255;
        b_slice[i] = f32::from(chunk[2]) * INV_255;
    }

    tensor
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_preprocess_rejects_empty_frame() {
        let frame = RgbImage::new(0, 0);
        let result = preprocess_image(&frame, (192, 192));
        assert!(matches!(result, Err(PoseError::InvalidInput(_))));
    }

    #[test]
    fn test_preprocess_tensor_shape() {
        let frame = RgbImage::new(640, 480);
        let result = preprocess_image(&frame, (192, 192)).unwrap();
        assert_eq!(result.tensor.shape(), &[1, 3, 192, 192]);
        assert_eq!(result.orig_shape, (480, 640));
    }

    #[test]
    fn test_preprocess_normalizes_to_unit_range() {
        let frame = RgbImage::from_pixel(64, 32, Rgb([128, 0, 255]));
        let result = preprocess_image(&frame, (192, 192)).unwrap();

        for &v in result.tensor.iter() {
            assert!((0.0..=1.0).contains(&v));
        }
        // Uniform input survives resizing unchanged, channel-split in NCHW.
        assert!((result.tensor[[0, 0, 96, 96]] - 128.0 / 255.0).abs() < 1e-3);
        assert!(result.tensor[[0, 1, 96, 96]].abs() < 1e-3);
        assert!((result.tensor[[0, 2, 96, 96]] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_preprocess_same_size_skips_resize() {
        let frame = RgbImage::from_pixel(192, 192, Rgb([10, 20, 30]));
        let result = preprocess_image(&frame, (192, 192)).unwrap();
        assert!((result.tensor[[0, 0, 0, 0]] - 10.0 / 255.0).abs() < 1e-6);
    }
}
