//! Output tree discovery for the site builder.
//!
//! The site builder never sees the camera uploads. Everything it renders is
//! re-derived from what the collector left in the web root:
//!
//! ```text
//! <web_root>/
//! ├── images/<camera>/<YYYY-MM-DD>/<file>    → day listing, image dates
//! └── <camera>/<YYYY-MM-DD>.html             → archive dates
//! ```
//!
//! Entries that don't look like captures are ignored quietly here; the
//! collector already warned about them when they were uploaded.

use crate::config::MediaConfig;
use crate::layout;
use crate::media::{self, MediaItem};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Direct children of `dir` in name order. A missing `dir` has no children.
fn children(dir: &Path) -> Result<Vec<walkdir::DirEntry>, ScanError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .map(|e| e.map_err(ScanError::from))
        .collect()
}

/// The collected items of one day, sorted chronologically.
///
/// `None` when `images/<camera>/<date>/` does not exist, which the caller
/// treats as "this camera has nothing for the day".
pub fn scan_day(
    web_root: &Path,
    camera: &str,
    date: NaiveDate,
    media_config: &MediaConfig,
) -> Result<Option<Vec<MediaItem>>, ScanError> {
    let dir = layout::image_day_dir(web_root, camera, date);
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut items = Vec::new();
    for entry in children(&dir)? {
        // Symlinks are the normal case; only directories are foreign here
        if entry.file_type().is_dir() {
            continue;
        }
        match media::classify(entry.path(), date, media_config) {
            Ok(item) => items.push(item),
            Err(reason) => debug!(file = %entry.path().display(), "ignoring: {reason}"),
        }
    }
    media::sort_items(&mut items);
    Ok(Some(items))
}

/// Days with a collected directory under `images/<camera>/`, ascending.
pub fn image_dates(web_root: &Path, camera: &str) -> Result<Vec<NaiveDate>, ScanError> {
    let dir = layout::images_root(web_root).join(camera);
    Ok(children(&dir)?
        .iter()
        .filter(|e| e.file_type().is_dir())
        .filter_map(|e| e.file_name().to_str().and_then(layout::parse_day_name))
        .collect())
}

/// Days with a gallery page under `<camera>/`, ascending.
pub fn gallery_dates(web_root: &Path, camera: &str) -> Result<Vec<NaiveDate>, ScanError> {
    let dir: PathBuf = web_root.join(camera);
    Ok(children(&dir)?
        .iter()
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.file_name().to_str().and_then(layout::parse_gallery_page_name))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::MediaKind;
    use crate::test_helpers::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn scan_day_sorts_by_timestamp() {
        let tmp = TempDir::new().unwrap();
        for name in [
            "front_01_20220216143000.jpg",
            "front_01_20220216120000.jpg",
            "front_01_20220216235959.jpg",
        ] {
            add_collected(tmp.path(), "front", name);
        }

        let items = scan_day(tmp.path(), "front", day(2022, 2, 16), &MediaConfig::default())
            .unwrap()
            .unwrap();

        let times: Vec<String> = items
            .iter()
            .map(|i| i.timestamp.format("%H:%M:%S").to_string())
            .collect();
        assert_eq!(times, vec!["12:00:00", "14:30:00", "23:59:59"]);
    }

    #[test]
    fn scan_day_missing_directory_is_none() {
        let tmp = TempDir::new().unwrap();
        let result = scan_day(tmp.path(), "front", day(2022, 2, 16), &MediaConfig::default());
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn scan_day_ignores_foreign_entries() {
        let tmp = TempDir::new().unwrap();
        add_collected(tmp.path(), "front", "front_01_20220216143000.mp4");
        let dir = layout::image_day_dir(tmp.path(), "front", day(2022, 2, 16));
        fs::write(dir.join("notes.txt"), b"").unwrap();
        fs::create_dir(dir.join("front_01_20220216150000.jpg")).unwrap();

        let items = scan_day(tmp.path(), "front", day(2022, 2, 16), &MediaConfig::default())
            .unwrap()
            .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, MediaKind::Video);
    }

    #[cfg(unix)]
    #[test]
    fn scan_day_reads_symlinks() {
        let tmp = TempDir::new().unwrap();
        let original = tmp.path().join("front_01_20220216143000.jpg");
        fs::write(&original, b"").unwrap();
        let dir = layout::image_day_dir(tmp.path(), "front", day(2022, 2, 16));
        fs::create_dir_all(&dir).unwrap();
        std::os::unix::fs::symlink(&original, dir.join("front_01_20220216143000.jpg")).unwrap();

        let items = scan_day(tmp.path(), "front", day(2022, 2, 16), &MediaConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn image_dates_lists_day_directories() {
        let tmp = TempDir::new().unwrap();
        add_collected(tmp.path(), "front", "front_01_20220301080000.jpg");
        add_collected(tmp.path(), "front", "front_01_20220216080000.jpg");
        fs::create_dir_all(layout::images_root(tmp.path()).join("front/junk")).unwrap();

        let dates = image_dates(tmp.path(), "front").unwrap();
        assert_eq!(dates, vec![day(2022, 2, 16), day(2022, 3, 1)]);
    }

    #[test]
    fn gallery_dates_lists_pages() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("front");
        fs::create_dir_all(&dir).unwrap();
        for name in ["2022-02-17.html", "2022-02-16.html", "index.html", "notes.txt"] {
            fs::write(dir.join(name), b"").unwrap();
        }

        let dates = gallery_dates(tmp.path(), "front").unwrap();
        assert_eq!(dates, vec![day(2022, 2, 16), day(2022, 2, 17)]);
    }

    #[test]
    fn dates_for_unknown_camera_are_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(image_dates(tmp.path(), "nope").unwrap().is_empty());
        assert!(gallery_dates(tmp.path(), "nope").unwrap().is_empty());
    }
}
