//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::calculate_placeholder_dimensions;
use super::params::{FrameParams, PlaceholderParams, Quality, ThumbnailParams};
use crate::config::VideoThumbnail;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Configuration for thumbnail generation.
#[derive(Debug, Clone)]
pub struct ThumbnailConfig {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: Quality,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            max_width: 256,
            max_height: 256,
            quality: Quality::default(),
        }
    }
}

/// How video previews are produced.
#[derive(Debug, Clone)]
pub struct VideoThumbnailConfig {
    pub strategy: VideoThumbnail,
    pub ffmpeg: PathBuf,
    pub frame_offset_secs: u32,
}

impl Default for VideoThumbnailConfig {
    fn default() -> Self {
        Self {
            strategy: VideoThumbnail::Companion,
            ffmpeg: PathBuf::from("ffmpeg"),
            frame_offset_secs: 1,
        }
    }
}

/// What a video preview ended up being made from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoPreview {
    Companion,
    Frame,
    Placeholder,
}

/// Plan a thumbnail operation without executing it.
pub fn plan_thumbnail(source: &Path, output: &Path, config: &ThumbnailConfig) -> ThumbnailParams {
    ThumbnailParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        max_width: config.max_width,
        max_height: config.max_height,
        quality: config.quality,
    }
}

pub fn plan_placeholder(output: &Path, config: &ThumbnailConfig) -> PlaceholderParams {
    let (width, height) = calculate_placeholder_dimensions((config.max_width, config.max_height));
    PlaceholderParams {
        output: output.to_path_buf(),
        width,
        height,
        quality: config.quality,
    }
}

/// Create a still thumbnail at `output`, overwriting whatever is there.
pub fn create_thumbnail(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    config: &ThumbnailConfig,
) -> Result<()> {
    backend.thumbnail(&plan_thumbnail(source, output, config))
}

/// Create the preview image for a video.
///
/// `companion` is the original of the still recorded alongside the video, if
/// any. The companion and frame strategies fall back to a placeholder when
/// their source is missing or unusable; only a placeholder failure is an error.
pub fn create_video_thumbnail(
    backend: &impl ImageBackend,
    video: &Path,
    companion: Option<&Path>,
    output: &Path,
    config: &ThumbnailConfig,
    video_config: &VideoThumbnailConfig,
) -> Result<VideoPreview> {
    match video_config.strategy {
        VideoThumbnail::Companion => {
            if let Some(still) = companion {
                match create_thumbnail(backend, still, output, config) {
                    Ok(()) => return Ok(VideoPreview::Companion),
                    Err(e) => warn!(
                        video = %video.display(),
                        companion = %still.display(),
                        "companion thumbnail failed, using placeholder: {e}"
                    ),
                }
            }
        }
        VideoThumbnail::Frame => {
            let params = FrameParams {
                ffmpeg: video_config.ffmpeg.clone(),
                source: video.to_path_buf(),
                output: output.to_path_buf(),
                offset_secs: video_config.frame_offset_secs,
                max_width: config.max_width,
                max_height: config.max_height,
            };
            match backend.extract_frame(&params) {
                Ok(()) => return Ok(VideoPreview::Frame),
                Err(e) => warn!(
                    video = %video.display(),
                    "frame extraction failed, using placeholder: {e}"
                ),
            }
        }
        VideoThumbnail::Placeholder => {}
    }

    backend.placeholder(&plan_placeholder(output, config))?;
    Ok(VideoPreview::Placeholder)
}
