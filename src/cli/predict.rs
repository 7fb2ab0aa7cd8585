// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process;

use image::DynamicImage;

use crate::cli::args::PredictArgs;
use crate::cli::logging::set_verbose;
use crate::{PoseConfig, PoseSession, VERSION};
use crate::{error, success, verbose, warn};

/// Image extensions accepted when scanning a source directory.
const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "webp"];

/// Run pose inference over the source images.
#[allow(clippy::cast_precision_loss, clippy::missing_panics_doc)]
pub fn run_prediction(args: &PredictArgs) {
    set_verbose(args.verbose);

    let config = PoseConfig::new()
        .with_confidence(args.conf)
        .with_threads(args.threads.max(1));

    let mut session = PoseSession::new();
    if let Err(e) = session.initialize(&args.model_dir, config) {
        error!("Error loading model: {e}");
        process::exit(1);
    }

    let images = collect_images(Path::new(&args.source));
    if images.is_empty() {
        error!("No images found in source: {}", args.source);
        process::exit(1);
    }

    let save_dir = if args.save {
        let dir = find_next_run_dir("runs/pose", "predict");
        if let Err(e) = fs::create_dir_all(&dir) {
            error!("Failed to create save directory {dir}: {e}");
            process::exit(1);
        }
        Some(PathBuf::from(dir))
    } else {
        None
    };

    println!("movenet-inference {VERSION} 🚀 ONNX Runtime");
    verbose!("");

    let total = images.len();
    let mut processed = 0usize;
    let mut total_preprocess = 0.0;
    let mut total_inference = 0.0;
    let mut total_postprocess = 0.0;

    for (index, path) in images.iter().enumerate() {
        let img = match load_image(path) {
            Ok(img) => img,
            Err(e) => {
                warn!("Skipping {}: {e}", path.display());
                continue;
            }
        };
        let mut frame = img.to_rgb8();

        match session.process(&mut frame) {
            Ok(result) => {
                let keypoints = result
                    .bodies
                    .first()
                    .map_or(0, |b| b.confident_keypoints(session.threshold()));
                verbose!(
                    "image {}/{} {}: {}{} confident keypoints, {:.1}ms",
                    index + 1,
                    total,
                    path.display(),
                    result.verbose(),
                    keypoints,
                    result.speed.total()
                );

                total_preprocess += result.speed.preprocess;
                total_inference += result.speed.inference;
                total_postprocess += result.speed.postprocess;
                processed += 1;

                if let Some(ref dir) = save_dir {
                    let out_path = dir.join(path.file_name().unwrap_or_default());
                    if let Err(e) = frame.save(&out_path) {
                        warn!("Failed to save {}: {e}", out_path.display());
                    }
                }
            }
            Err(e) => {
                // A failed frame leaves the session Ready; keep going.
                error!("Error processing {}: {e}", path.display());
            }
        }
    }

    if processed > 0 {
        let n = processed as f64;
        verbose!("");
        verbose!(
            "Speed: {:.1}ms preprocess, {:.1}ms inference, {:.1}ms postprocess per image",
            total_preprocess / n,
            total_inference / n,
            total_postprocess / n
        );
    }

    if let Some(ref dir) = save_dir {
        success!("Results saved to {}", dir.display());
    }

    let _ = session.finalize();
}

/// Collect image paths from a file or directory source.
fn collect_images(source: &Path) -> Vec<PathBuf> {
    if source.is_file() {
        return vec![source.to_path_buf()];
    }

    let Ok(entries) = fs::read_dir(source) else {
        return vec![];
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        })
        .collect();
    paths.sort();
    paths
}

/// Find the next available run directory (predict, predict2, predict3, etc.)
fn find_next_run_dir(base: &str, prefix: &str) -> String {
    let base_path = Path::new(base);

    let first = base_path.join(prefix);
    if !first.exists() {
        return first.to_string_lossy().to_string();
    }

    for i in 2.. {
        let numbered = base_path.join(format!("{prefix}{i}"));
        if !numbered.exists() {
            return numbered.to_string_lossy().to_string();
        }
    }

    base_path.join(prefix).to_string_lossy().to_string()
}

/// Load image helper to bypass zune-jpeg stride issues.
fn load_image(path: &Path) -> image::ImageResult<DynamicImage> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    if let Some("jpg") | Some("jpeg") = ext.as_deref() {
        if let Ok(file) = File::open(path) {
            let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(file));
            if let Ok(pixels) = decoder.decode() {
                if let Some(metadata) = decoder.info() {
                    let width = u32::from(metadata.width);
                    let height = u32::from(metadata.height);
                    match metadata.pixel_format {
                        jpeg_decoder::PixelFormat::RGB24 => {
                            if let Some(buffer) =
                                image::ImageBuffer::from_raw(width, height, pixels)
                            {
                                return Ok(DynamicImage::ImageRgb8(buffer));
                            }
                        }
                        jpeg_decoder::PixelFormat::L8 => {
                            if let Some(buffer) =
                                image::ImageBuffer::from_raw(width, height, pixels)
                            {
                                return Ok(DynamicImage::ImageLuma8(buffer));
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
    }
    // Fallback
    image::open(path)
}
