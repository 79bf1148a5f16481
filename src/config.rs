//! Site configuration module.
//!
//! Handles loading, validating, and merging the optional `config.toml` passed
//! with `--config`. Stock defaults are overridden by whatever the file sets;
//! the resolved [`SiteConfig`] is then handed explicitly to the collector and
//! the site builder. Nothing reads configuration from globals.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [thumbnails]
//! max_size = [256, 256]     # bounding box, aspect ratio preserved
//! quality = 85              # JPEG quality (1-100)
//! skip_existing = false     # keep thumbnails already on disk
//!
//! [media]
//! image_extensions = ["jpg", "jpeg", "png"]
//! video_extensions = ["mp4", "mov"]
//!
//! [video]
//! thumbnail = "companion"   # placeholder | companion | frame
//! ffmpeg = "ffmpeg"         # used by the "frame" strategy
//! frame_offset_secs = 1
//!
//! [gallery]
//! pair_window_secs = 10     # attach a video to a still this close in time
//! group_minutes = 10        # time headings on gallery pages (0 = none)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse; override just the values you want:
//!
//! ```toml
//! [video]
//! thumbnail = "frame"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::naming::MediaKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Thumbnail bounding box and encoding.
    pub thumbnails: ThumbnailsConfig,
    /// Extension allow-lists deciding image vs video.
    pub media: MediaConfig,
    /// How video previews are produced.
    pub video: VideoConfig,
    /// Gallery page layout.
    pub gallery: GalleryConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.thumbnails.quality) {
            return Err(ConfigError::Validation(
                "thumbnails.quality must be 1-100".into(),
            ));
        }
        if self.thumbnails.max_size[0] == 0 || self.thumbnails.max_size[1] == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.max_size values must be non-zero".into(),
            ));
        }
        if self.media.image_extensions.is_empty() {
            return Err(ConfigError::Validation(
                "media.image_extensions must not be empty".into(),
            ));
        }
        if self.media.video_extensions.is_empty() {
            return Err(ConfigError::Validation(
                "media.video_extensions must not be empty".into(),
            ));
        }
        if let Some(ext) = self.media.image_extensions.iter().find(|e| {
            self.media
                .video_extensions
                .iter()
                .any(|v| v.eq_ignore_ascii_case(e))
        }) {
            return Err(ConfigError::Validation(format!(
                "extension '{ext}' is listed as both image and video"
            )));
        }
        Ok(())
    }
}

/// Thumbnail generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Bounding box as `[width, height]`. Thumbnails fit inside it, never upscaled.
    pub max_size: [u32; 2],
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
    /// Leave an existing thumbnail alone instead of re-encoding it.
    pub skip_existing: bool,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            max_size: [256, 256],
            quality: 85,
            skip_existing: false,
        }
    }
}

/// Extension allow-lists (case-insensitive, without the dot).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MediaConfig {
    pub image_extensions: Vec<String>,
    pub video_extensions: Vec<String>,
}

impl MediaConfig {
    pub fn kind_of(&self, extension: &str) -> Option<MediaKind> {
        MediaKind::from_extension(extension, &self.image_extensions, &self.video_extensions)
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            image_extensions: vec!["jpg".into(), "jpeg".into(), "png".into()],
            video_extensions: vec!["mp4".into(), "mov".into()],
        }
    }
}

/// Where a video's gallery preview comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoThumbnail {
    /// Generated tile with a play symbol.
    Placeholder,
    /// Thumbnail of the still recorded alongside the video, else placeholder.
    #[default]
    Companion,
    /// A frame extracted with ffmpeg, else placeholder.
    Frame,
}

/// Video preview settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VideoConfig {
    pub thumbnail: VideoThumbnail,
    /// ffmpeg executable, looked up on `PATH` when not absolute.
    pub ffmpeg: PathBuf,
    /// Seek position for frame extraction.
    pub frame_offset_secs: u32,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            thumbnail: VideoThumbnail::default(),
            ffmpeg: PathBuf::from("ffmpeg"),
            frame_offset_secs: 1,
        }
    }
}

/// Gallery page settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Max distance between a still and the video that belongs to it.
    pub pair_window_secs: u32,
    /// Entries are grouped under headings rounded to this many minutes. 0 disables headings.
    pub group_minutes: u32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            pair_window_secs: 10,
            group_minutes: 10,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the site config.
///
/// `None` yields the stock defaults. A given path must exist; its values are
/// merged on top of the defaults, unknown keys rejected, the result validated.
pub fn load_config(path: Option<&Path>) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = path.map(load_raw_config).transpose()?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# cam-site configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Pass the file with --config.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Thumbnails
# ---------------------------------------------------------------------------
[thumbnails]
# Bounding box as [width, height]. Aspect ratio is preserved and small
# images are never upscaled.
max_size = [256, 256]

# JPEG encoding quality (1 = worst, 100 = best).
quality = 85

# Keep thumbnails that already exist instead of re-encoding them.
skip_existing = false

# ---------------------------------------------------------------------------
# Media classification
# ---------------------------------------------------------------------------
[media]
# Extensions (case-insensitive) treated as stills and as videos.
# Files with any other extension are skipped with a warning.
image_extensions = ["jpg", "jpeg", "png"]
video_extensions = ["mp4", "mov"]

# ---------------------------------------------------------------------------
# Video previews
# ---------------------------------------------------------------------------
[video]
# How the clickable preview of a video is made:
#   "placeholder" - a generated tile with a play symbol
#   "companion"   - the still recorded alongside the video (else placeholder)
#   "frame"       - a frame extracted with ffmpeg (else placeholder)
thumbnail = "companion"

# ffmpeg executable for the "frame" strategy.
ffmpeg = "ffmpeg"

# Position of the extracted frame, in seconds from the start.
frame_offset_secs = 1

# ---------------------------------------------------------------------------
# Gallery pages
# ---------------------------------------------------------------------------
[gallery]
# A video is attached to the closest still at most this many seconds away.
pair_window_secs = 10

# Entries are grouped under time headings rounded to this many minutes.
# 0 lists entries without headings.
group_minutes = 10
"##
}
