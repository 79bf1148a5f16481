//! Directory layout contract shared by the collector and the site builder.
//!
//! The two phases never talk to each other in-process; they agree on paths.
//! Every function here is a pure function of its inputs, which is what keeps
//! re-runs idempotent: the same (camera, date, filename) always maps to the
//! same link, thumbnail, and page.
//!
//! ```text
//! <source_root>/<camera>/<YYYY>/<MM>/<DD>/<file>          (camera uploads, read-only)
//!
//! <web_root>/
//! ├── images/<camera>/<YYYY-MM-DD>/<file>                 (symlinks to uploads)
//! ├── thumbnails/<camera>/<YYYY-MM-DD>/<file>             (still thumbnails)
//! ├── thumbnails/<camera>/<YYYY-MM-DD>/<file>.jpg         (video thumbnails)
//! ├── <camera>/<YYYY-MM-DD>.html                          (gallery pages)
//! ├── index.html
//! └── style.css
//! ```
//!
//! Hrefs are built relative to the web root; gallery pages live one level
//! down and prefix them with [`from_gallery`]. Every segment of an href is
//! percent-encoded, so names with `#`, `?` or `%` still link.
//!
//! Camera names become a directory in three places, so they must be a
//! single plain path component; see [`validate_camera_name`].

use crate::naming::MediaKind;
use chrono::NaiveDate;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

pub const IMAGES_DIR: &str = "images";
pub const THUMBNAILS_DIR: &str = "thumbnails";
pub const INDEX_PAGE: &str = "index.html";
pub const STYLESHEET: &str = "style.css";

/// Top-level names of the web root that a camera directory must not shadow.
const RESERVED_NAMES: [&str; 4] = [IMAGES_DIR, THUMBNAILS_DIR, INDEX_PAGE, STYLESHEET];

/// Bytes escaped inside one href path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

const DAY_FORMAT: &str = "%Y-%m-%d";
const PAGE_EXTENSION: &str = ".html";
/// Extension appended to a video's filename to name its thumbnail.
const VIDEO_THUMBNAIL_SUFFIX: &str = ".jpg";

/// `2022-02-16`, the per-day directory and page name in the output tree.
pub fn day_name(date: NaiveDate) -> String {
    date.format(DAY_FORMAT).to_string()
}

/// Inverse of [`day_name`]. Rejects anything that is not exactly `YYYY-MM-DD`.
pub fn parse_day_name(name: &str) -> Option<NaiveDate> {
    if name.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(name, DAY_FORMAT).ok()
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CameraNameError {
    #[error("Camera '{0}' is not a plain directory name")]
    NotADirectoryName(String),
    #[error("Camera '{0}' collides with the site layout")]
    Reserved(String),
    #[error("Camera '{0}' is listed more than once")]
    Duplicate(String),
}

/// Accept `name` only if joining it stays one level below the root.
///
/// Rejects empty names, `.`/`..`, absolute paths, anything with a separator,
/// and the top-level names the web root already uses.
pub fn validate_camera_name(name: &str) -> Result<(), CameraNameError> {
    let mut components = Path::new(name).components();
    let single = match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) => part == name,
        _ => false,
    };
    if !single {
        return Err(CameraNameError::NotADirectoryName(name.to_string()));
    }
    if RESERVED_NAMES.contains(&name) {
        return Err(CameraNameError::Reserved(name.to_string()));
    }
    Ok(())
}

/// [`validate_camera_name`] for each camera, plus no name twice.
pub fn validate_cameras(cameras: &[String]) -> Result<(), CameraNameError> {
    let mut seen = HashSet::with_capacity(cameras.len());
    for camera in cameras {
        validate_camera_name(camera)?;
        if !seen.insert(camera.as_str()) {
            return Err(CameraNameError::Duplicate(camera.clone()));
        }
    }
    Ok(())
}

/// `<source_root>/<camera>/<YYYY>/<MM>/<DD>` with zero-padded components.
pub fn source_day_dir(source_root: &Path, camera: &str, date: NaiveDate) -> PathBuf {
    source_root
        .join(camera)
        .join(date.format("%Y").to_string())
        .join(date.format("%m").to_string())
        .join(date.format("%d").to_string())
}

pub fn images_root(web_root: &Path) -> PathBuf {
    web_root.join(IMAGES_DIR)
}

pub fn thumbnails_root(web_root: &Path) -> PathBuf {
    web_root.join(THUMBNAILS_DIR)
}

/// `<web_root>/images/<camera>/<YYYY-MM-DD>`
pub fn image_day_dir(web_root: &Path, camera: &str, date: NaiveDate) -> PathBuf {
    images_root(web_root).join(camera).join(day_name(date))
}

/// `<web_root>/thumbnails/<camera>/<YYYY-MM-DD>`
pub fn thumbnail_day_dir(web_root: &Path, camera: &str, date: NaiveDate) -> PathBuf {
    thumbnails_root(web_root).join(camera).join(day_name(date))
}

/// Symlink location for an original upload.
pub fn image_link_path(web_root: &Path, camera: &str, date: NaiveDate, filename: &str) -> PathBuf {
    image_day_dir(web_root, camera, date).join(filename)
}

/// Thumbnail filename for a capture.
///
/// Stills keep their own name. Videos get `.jpg` appended so the preview is a
/// real image file while still being unique per video.
pub fn thumbnail_name(filename: &str, kind: MediaKind) -> String {
    match kind {
        MediaKind::Image => filename.to_string(),
        MediaKind::Video => format!("{filename}{VIDEO_THUMBNAIL_SUFFIX}"),
    }
}

pub fn thumbnail_path(
    web_root: &Path,
    camera: &str,
    date: NaiveDate,
    filename: &str,
    kind: MediaKind,
) -> PathBuf {
    thumbnail_day_dir(web_root, camera, date).join(thumbnail_name(filename, kind))
}

/// `2022-02-16.html`
pub fn gallery_page_name(date: NaiveDate) -> String {
    format!("{}{PAGE_EXTENSION}", day_name(date))
}

/// Inverse of [`gallery_page_name`].
pub fn parse_gallery_page_name(name: &str) -> Option<NaiveDate> {
    name.strip_suffix(PAGE_EXTENSION).and_then(parse_day_name)
}

/// `<web_root>/<camera>/<YYYY-MM-DD>.html`
pub fn gallery_page_path(web_root: &Path, camera: &str, date: NaiveDate) -> PathBuf {
    web_root.join(camera).join(gallery_page_name(date))
}

// ============================================================================
// Hrefs (relative to the web root, always `/`-separated)
// ============================================================================

fn segment(name: &str) -> String {
    utf8_percent_encode(name, SEGMENT).to_string()
}

pub fn image_href(camera: &str, date: NaiveDate, filename: &str) -> String {
    format!(
        "{IMAGES_DIR}/{}/{}/{}",
        segment(camera),
        day_name(date),
        segment(filename)
    )
}

pub fn thumbnail_href(camera: &str, date: NaiveDate, filename: &str, kind: MediaKind) -> String {
    format!(
        "{THUMBNAILS_DIR}/{}/{}/{}",
        segment(camera),
        day_name(date),
        segment(&thumbnail_name(filename, kind))
    )
}

pub fn gallery_href(camera: &str, date: NaiveDate) -> String {
    format!("{}/{}", segment(camera), gallery_page_name(date))
}

/// Rewrite a web-root-relative href for use inside a gallery page.
pub fn from_gallery(href: &str) -> String {
    format!("../{href}")
}

/// Calendar day before `date`; `None` only at the end of chrono's range.
pub fn previous_day(date: NaiveDate) -> Option<NaiveDate> {
    date.pred_opt()
}

pub fn next_day(date: NaiveDate) -> Option<NaiveDate> {
    date.succ_opt()
}
