//! Collector phase: thumbnails and symlinks for one capture day.
//!
//! Stage 1 of the pipeline. Reads the camera upload tree and writes the
//! web-servable mirror that the site builder later renders.
//!
//! ## Input
//!
//! ```text
//! <source_root>/<camera>/<YYYY>/<MM>/<DD>/<camera>_<seq>_<YYYYMMDDHHMMSS>.<ext>
//! ```
//!
//! ## Output
//!
//! ```text
//! <web_root>/
//! ├── images/<camera>/<YYYY-MM-DD>/<file>          → symlink to the upload
//! └── thumbnails/<camera>/<YYYY-MM-DD>/
//!     ├── <still>                                   # fits the bounding box
//!     └── <video>.jpg                               # companion, frame or placeholder
//! ```
//!
//! ## Failure model
//!
//! A missing source root is fatal. A camera without a directory for the day
//! is reported and skipped. Files that don't parse, belong to another day,
//! or can't be thumbnailed are skipped with a warning; a skipped file gets
//! neither a thumbnail nor a symlink, so no half-collected entries remain.
//!
//! Every output path is a pure function of (camera, date, filename), so
//! re-running a day rewrites the same files instead of adding new ones.

use crate::config::{ConfigError, SiteConfig};
use crate::imaging::{
    ImageBackend, Quality, RustBackend, ThumbnailConfig, VideoPreview, VideoThumbnailConfig,
    create_thumbnail, create_video_thumbnail,
};
use crate::layout::{self, CameraNameError};
use crate::media::{self, MediaItem};
use crate::naming::MediaKind;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("Source root not found: {0}")]
    SourceRootMissing(PathBuf),
    #[error("No cameras given")]
    NoCameras,
    #[error(transparent)]
    InvalidCamera(#[from] CameraNameError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Per-camera tallies for a collected day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectStats {
    pub images: usize,
    pub videos: usize,
    /// Video previews that ended up as a generated placeholder.
    pub placeholders: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraOutcome {
    Collected(CollectStats),
    /// The camera has no upload directory for the day.
    MissingDay(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraReport {
    pub camera: String,
    pub outcome: CameraOutcome,
}

/// What a collector run did, camera by camera, in the order requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectReport {
    pub date: NaiveDate,
    pub cameras: Vec<CameraReport>,
}

pub fn thumbnail_config(config: &SiteConfig) -> ThumbnailConfig {
    let [max_width, max_height] = config.thumbnails.max_size;
    ThumbnailConfig {
        max_width,
        max_height,
        quality: Quality::new(config.thumbnails.quality),
    }
}

pub fn video_thumbnail_config(config: &SiteConfig) -> VideoThumbnailConfig {
    VideoThumbnailConfig {
        strategy: config.video.thumbnail,
        ffmpeg: config.video.ffmpeg.clone(),
        frame_offset_secs: config.video.frame_offset_secs,
    }
}

pub fn collect(
    source_root: &Path,
    web_root: &Path,
    cameras: &[String],
    date: NaiveDate,
    config: &SiteConfig,
) -> Result<CollectReport, CollectError> {
    let backend = RustBackend::new();
    collect_with_backend(&backend, source_root, web_root, cameras, date, config)
}

/// Collect using a specific backend (allows testing with mock).
pub fn collect_with_backend(
    backend: &impl ImageBackend,
    source_root: &Path,
    web_root: &Path,
    cameras: &[String],
    date: NaiveDate,
    config: &SiteConfig,
) -> Result<CollectReport, CollectError> {
    if cameras.is_empty() {
        return Err(CollectError::NoCameras);
    }
    layout::validate_cameras(cameras)?;
    config.validate()?;
    if !source_root.is_dir() {
        return Err(CollectError::SourceRootMissing(source_root.to_path_buf()));
    }
    // Absolute, resolved targets keep the symlinks valid from anywhere
    let source_root = source_root.canonicalize()?;

    let mut reports = Vec::with_capacity(cameras.len());
    for camera in cameras {
        let day_dir = layout::source_day_dir(&source_root, camera, date);
        let outcome = if day_dir.is_dir() {
            info!(camera = %camera, dir = %day_dir.display(), "collecting");
            CameraOutcome::Collected(collect_day(backend, &day_dir, web_root, camera, date, config)?)
        } else {
            info!(camera = %camera, dir = %day_dir.display(), "no uploads for this day, skipping camera");
            CameraOutcome::MissingDay(day_dir)
        };
        reports.push(CameraReport {
            camera: camera.clone(),
            outcome,
        });
    }

    Ok(CollectReport {
        date,
        cameras: reports,
    })
}

/// Regular files directly inside `dir`, sorted by name.
fn list_files(dir: &Path) -> Result<Vec<PathBuf>, CollectError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        if entry.path().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn collect_day(
    backend: &impl ImageBackend,
    day_dir: &Path,
    web_root: &Path,
    camera: &str,
    date: NaiveDate,
    config: &SiteConfig,
) -> Result<CollectStats, CollectError> {
    let mut stats = CollectStats::default();

    let mut items: Vec<MediaItem> = Vec::new();
    for path in list_files(day_dir)? {
        match media::classify(&path, date, &config.media) {
            Ok(item) => items.push(item),
            Err(reason) => {
                warn!(file = %path.display(), "skipping: {reason}");
                stats.skipped += 1;
            }
        }
    }
    media::sort_items(&mut items);

    let prefixes = media::camera_ids(&items);
    if prefixes.len() > 1 {
        warn!(camera = %camera, ?prefixes, "day directory holds files from more than one camera");
    }

    fs::create_dir_all(layout::image_day_dir(web_root, camera, date))?;
    fs::create_dir_all(layout::thumbnail_day_dir(web_root, camera, date))?;

    // Video filename → original of the still recorded alongside it
    let companions: HashMap<&str, &Path> = media::pair_captures(&items, config.gallery.pair_window_secs)
        .into_iter()
        .filter_map(|c| c.video.map(|v| (v.filename.as_str(), c.primary.path.as_path())))
        .collect();

    let thumbs = thumbnail_config(config);
    let video_thumbs = video_thumbnail_config(config);

    let (stills, videos): (Vec<&MediaItem>, Vec<&MediaItem>) =
        items.iter().partition(|i| i.kind == MediaKind::Image);

    for item in stills {
        let thumb = layout::thumbnail_path(web_root, camera, date, &item.filename, item.kind);
        if !(config.thumbnails.skip_existing && thumb.exists()) {
            if let Err(e) = create_thumbnail(backend, &item.path, &thumb, &thumbs) {
                warn!(file = %item.path.display(), "skipping unreadable image: {e}");
                stats.skipped += 1;
                continue;
            }
        }
        link_original(&item.path, &layout::image_link_path(web_root, camera, date, &item.filename))?;
        debug!(file = %item.filename, "collected image");
        stats.images += 1;
    }

    for item in videos {
        let thumb = layout::thumbnail_path(web_root, camera, date, &item.filename, item.kind);
        if !(config.thumbnails.skip_existing && thumb.exists()) {
            let companion = companions.get(item.filename.as_str()).copied();
            match create_video_thumbnail(backend, &item.path, companion, &thumb, &thumbs, &video_thumbs) {
                Ok(VideoPreview::Placeholder) => stats.placeholders += 1,
                Ok(_) => {}
                Err(e) => {
                    warn!(file = %item.path.display(), "skipping video without preview: {e}");
                    stats.skipped += 1;
                    continue;
                }
            }
        }
        link_original(&item.path, &layout::image_link_path(web_root, camera, date, &item.filename))?;
        debug!(file = %item.filename, "collected video");
        stats.videos += 1;
    }

    Ok(stats)
}

/// Point `link` at `target`, replacing whatever entry is already there.
fn link_original(target: &Path, link: &Path) -> io::Result<()> {
    if fs::read_link(link).is_ok_and(|existing| existing == target) {
        return Ok(());
    }
    match fs::symlink_metadata(link) {
        Ok(_) => fs::remove_file(link)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    symlink(target, link)
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
