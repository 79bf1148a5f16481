//! Production backend: `image` crate for stills, `ffmpeg` for video frames.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG) | `image::ImageReader` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` with quality |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//! | Placeholder | `image::RgbImage::from_fn` |
//! | Video frame | `ffmpeg -ss <offset> -i <video> -frames:v 1` |

use super::backend::{BackendError, ImageBackend};
use super::calculations::calculate_fit_dimensions;
use super::params::{FrameParams, PlaceholderParams, ThumbnailParams};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, Rgb, RgbImage};
use std::path::Path;
use std::process::Command;

const PLACEHOLDER_BACKGROUND: Rgb<u8> = Rgb([48, 48, 48]);
const PLACEHOLDER_SYMBOL: Rgb<u8> = Rgb([220, 220, 220]);

/// Backend using the `image` crate ecosystem and an external ffmpeg.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Save a DynamicImage to the given path, inferring format from extension.
fn save_image(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let writer = std::io::BufWriter::new(file);
    match ext.as_str() {
        "jpg" | "jpeg" => {
            // JPEG has no alpha channel
            let encoder = JpegEncoder::new_with_quality(writer, quality as u8);
            DynamicImage::from(img.to_rgb8())
                .write_with_encoder(encoder)
                .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))
        }
        "png" => img
            .write_with_encoder(PngEncoder::new(writer))
            .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {}", e))),
        other => Err(BackendError::ProcessingFailed(format!(
            "Unsupported output format: {}",
            other
        ))),
    }
}

/// Grey tile with a centered play triangle.
fn draw_placeholder(width: u32, height: u32) -> RgbImage {
    let side = (width.min(height) / 3).max(1) as f64;
    let left = width as f64 / 2.0 - side / 2.0;
    let center_y = height as f64 / 2.0;

    RgbImage::from_fn(width, height, |x, y| {
        let dx = x as f64 + 0.5 - left;
        if !(0.0..=side).contains(&dx) {
            return PLACEHOLDER_BACKGROUND;
        }
        // Triangle narrows linearly from the left edge to the tip
        let half_height = side / 2.0 * (1.0 - dx / side);
        if (y as f64 + 0.5 - center_y).abs() <= half_height {
            PLACEHOLDER_SYMBOL
        } else {
            PLACEHOLDER_BACKGROUND
        }
    })
}

impl ImageBackend for RustBackend {
    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;

        let (width, height) = calculate_fit_dimensions(
            (img.width(), img.height()),
            (params.max_width, params.max_height),
        );
        let resized = if (width, height) == (img.width(), img.height()) {
            img
        } else {
            img.resize_exact(width, height, FilterType::Lanczos3)
        };

        save_image(&resized, &params.output, params.quality.value())
    }

    fn placeholder(&self, params: &PlaceholderParams) -> Result<(), BackendError> {
        let tile = DynamicImage::from(draw_placeholder(params.width, params.height));
        save_image(&tile, &params.output, params.quality.value())
    }

    fn extract_frame(&self, params: &FrameParams) -> Result<(), BackendError> {
        // Bounded like stills: shrink into the box, never enlarge
        let scale = format!(
            "scale='min(iw,{w})':'min(ih,{h})':force_original_aspect_ratio=decrease",
            w = params.max_width,
            h = params.max_height
        );

        let output = Command::new(&params.ffmpeg)
            .args(["-y", "-loglevel", "error", "-ss"])
            .arg(params.offset_secs.to_string())
            .arg("-i")
            .arg(&params.source)
            .args(["-frames:v", "1", "-vf"])
            .arg(&scale)
            .arg(&params.output)
            .output()
            .map_err(BackendError::Io)?;

        if !output.status.success() {
            return Err(BackendError::ProcessingFailed(format!(
                "ffmpeg failed on {}: {}",
                params.source.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        // Seeking past the end succeeds without writing anything
        if !params.output.exists() {
            return Err(BackendError::ProcessingFailed(format!(
                "ffmpeg wrote no frame for {}",
                params.source.display()
            )));
        }
        Ok(())
    }
}
