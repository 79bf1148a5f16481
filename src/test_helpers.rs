//! Shared test utilities for the cam-site test suite.
//!
//! Builds throwaway camera upload trees and output trees in temp
//! directories, so collector and site builder tests read like the directory
//! layouts they exercise.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let src = tmp.path().join("cams");
//! add_capture(&src, "front", "front_01_20220216143000.jpg");
//! add_capture(&src, "front", "front_01_20220216143002.mp4");
//! ```

use chrono::NaiveDate;
use image::{ImageEncoder, RgbImage};
use std::path::{Path, PathBuf};

use crate::layout;
use crate::naming::parse_capture_name;

// =========================================================================
// Media files
// =========================================================================

/// Create a small valid JPEG file with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// A file with a JPEG name and garbage content, like a truncated upload.
pub fn create_corrupt_file(path: &Path) {
    std::fs::write(path, b"\xFF\xD8\xFF\xE0 truncated upload").unwrap();
}

// =========================================================================
// Source tree
// =========================================================================

/// Drop an upload into `<source_root>/<camera_dir>/<YYYY>/<MM>/<DD>/`.
///
/// The day directory comes from the timestamp inside `filename`. JPEG names
/// get a real 640x480 image; everything else gets placeholder bytes.
/// Returns the written path.
pub fn add_capture(source_root: &Path, camera_dir: &str, filename: &str) -> PathBuf {
    let parsed = parse_capture_name(filename)
        .unwrap_or_else(|| panic!("'{filename}' is not a capture filename"));
    add_file(source_root, camera_dir, parsed.date(), filename)
}

/// Drop any file (e.g. a foreign one) into a camera's day directory.
pub fn add_file(source_root: &Path, camera_dir: &str, date: NaiveDate, filename: &str) -> PathBuf {
    let dir = layout::source_day_dir(source_root, camera_dir, date);
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(filename);

    let lower = filename.to_ascii_lowercase();
    if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        create_test_jpeg(&path, 640, 480);
    } else {
        std::fs::write(&path, b"not really a video").unwrap();
    }
    path
}

// =========================================================================
// Output tree
// =========================================================================

/// Create the `images/` and `thumbnails/` roots a collector run leaves behind.
pub fn init_web_root(web_root: &Path) {
    std::fs::create_dir_all(layout::images_root(web_root)).unwrap();
    std::fs::create_dir_all(layout::thumbnails_root(web_root)).unwrap();
}

/// Put an entry into `images/<camera>/<day>/` as if collected.
///
/// Uses an empty regular file instead of a symlink; the site builder only
/// looks at names.
pub fn add_collected(web_root: &Path, camera: &str, filename: &str) {
    let parsed = parse_capture_name(filename)
        .unwrap_or_else(|| panic!("'{filename}' is not a capture filename"));
    let dir = layout::image_day_dir(web_root, camera, parsed.date());
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(filename), b"").unwrap();
}

/// Names of all entries in a directory, sorted. Empty when it doesn't exist.
pub fn dir_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
