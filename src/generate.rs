//! HTML site generation.
//!
//! Stage 2 of the pipeline. Reads the collector's output tree and renders
//! the static site next to it. Pages are regenerated in full on every run;
//! nothing is patched in place.
//!
//! ## Generated Pages
//!
//! - **Index page** (`/index.html`): latest capture per camera for the build
//!   date, plus an archive of month calendars linking every gallery page
//! - **Gallery pages** (`/{camera}/{YYYY-MM-DD}.html`): one day of one camera,
//!   entries grouped under rounded time headings, with previous/next day links
//!
//! ## Output Structure
//!
//! ```text
//! web_root/
//! ├── index.html
//! ├── style.css                  # embedded at compile time, written verbatim
//! ├── front/
//! │   ├── 2022-02-15.html
//! │   └── 2022-02-16.html
//! ├── images/...                 # from the collector (read only here)
//! └── thumbnails/...
//! ```
//!
//! ## Links
//!
//! Every href is relative, so the site works from any URL prefix or straight
//! from disk. Previous/next links are emitted even when the neighbouring page
//! doesn't exist yet; it will once that day is built.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping.

use crate::config::{ConfigError, SiteConfig};
use crate::layout::{self, CameraNameError};
use crate::media::{self, Capture, MediaItem};
use crate::naming::MediaKind;
use crate::scan::{self, ScanError};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use maud::{DOCTYPE, Markup, html};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("No images directory at {0} (run collect first)")]
    MissingImages(PathBuf),
    #[error("No thumbnails directory at {0} (run collect first)")]
    MissingThumbnails(PathBuf),
    #[error("No cameras given")]
    NoCameras,
    #[error(transparent)]
    InvalidCamera(#[from] CameraNameError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

const CSS_STATIC: &str = include_str!("../static/style.css");

const WEEKDAYS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

/// One written gallery page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryReport {
    pub camera: String,
    pub date: NaiveDate,
    pub entries: usize,
    pub path: PathBuf,
}

/// What a site builder run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub date: NaiveDate,
    pub galleries: Vec<GalleryReport>,
    /// Cameras with no collected directory for `date`.
    pub without_data: Vec<String>,
    pub index: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Day,
    AllDays,
}

/// Rebuild the gallery pages for `date`, the index and the stylesheet.
pub fn build_site(
    web_root: &Path,
    site_name: &str,
    cameras: &[String],
    date: NaiveDate,
    config: &SiteConfig,
) -> Result<BuildReport, BuildError> {
    build(web_root, site_name, cameras, date, Scope::Day, config)
}

/// Like [`build_site`], but regenerates a gallery for every collected day.
pub fn build_all(
    web_root: &Path,
    site_name: &str,
    cameras: &[String],
    date: NaiveDate,
    config: &SiteConfig,
) -> Result<BuildReport, BuildError> {
    build(web_root, site_name, cameras, date, Scope::AllDays, config)
}

fn build(
    web_root: &Path,
    site_name: &str,
    cameras: &[String],
    date: NaiveDate,
    scope: Scope,
    config: &SiteConfig,
) -> Result<BuildReport, BuildError> {
    if cameras.is_empty() {
        return Err(BuildError::NoCameras);
    }
    layout::validate_cameras(cameras)?;
    config.validate()?;
    let images_root = layout::images_root(web_root);
    if !images_root.is_dir() {
        return Err(BuildError::MissingImages(images_root));
    }
    let thumbnails_root = layout::thumbnails_root(web_root);
    if !thumbnails_root.is_dir() {
        return Err(BuildError::MissingThumbnails(thumbnails_root));
    }

    let mut galleries = Vec::new();
    let mut without_data = Vec::new();
    let mut latest: Vec<(&str, MediaItem)> = Vec::new();

    for camera in cameras {
        let mut dates = match scope {
            Scope::Day => Vec::new(),
            Scope::AllDays => scan::image_dates(web_root, camera)?,
        };
        if !dates.contains(&date) {
            dates.push(date);
        }

        for day in dates {
            let Some(items) = scan::scan_day(web_root, camera, day, &config.media)? else {
                info!(camera = %camera, date = %day, "no collected images, camera omitted");
                without_data.push(camera.clone());
                continue;
            };
            galleries.push(write_gallery(web_root, site_name, camera, day, &items, config)?);
            if day == date {
                if let Some(item) = latest_item(&items) {
                    latest.push((camera.as_str(), item.clone()));
                }
            }
        }
    }

    fs::write(web_root.join(layout::STYLESHEET), CSS_STATIC)?;

    // Archive reflects every page on disk now, not just this run's
    let mut archive = Vec::with_capacity(cameras.len());
    for camera in cameras {
        archive.push((camera.as_str(), scan::gallery_dates(web_root, camera)?));
    }

    let index = web_root.join(layout::INDEX_PAGE);
    let page = render_index(site_name, date, &latest, &archive);
    fs::write(&index, page.into_string())?;
    info!(path = %index.display(), "wrote index");

    Ok(BuildReport {
        date,
        galleries,
        without_data,
        index,
    })
}

fn write_gallery(
    web_root: &Path,
    site_name: &str,
    camera: &str,
    date: NaiveDate,
    items: &[MediaItem],
    config: &SiteConfig,
) -> Result<GalleryReport, BuildError> {
    let captures = media::pair_captures(items, config.gallery.pair_window_secs);
    let page = render_gallery_page(site_name, camera, date, &captures, config.gallery.group_minutes);

    let path = layout::gallery_page_path(web_root, camera, date);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, page.into_string())?;
    debug!(path = %path.display(), entries = captures.len(), "wrote gallery");

    Ok(GalleryReport {
        camera: camera.to_string(),
        date,
        entries: captures.len(),
        path,
    })
}

/// Newest still of the day, or the newest video when there are no stills.
fn latest_item(items: &[MediaItem]) -> Option<&MediaItem> {
    items
        .iter()
        .rev()
        .find(|i| i.kind == MediaKind::Image)
        .or_else(|| items.last())
}

/// Split chronologically sorted captures into runs sharing a rounded time.
///
/// `minutes == 0` yields a single untitled group.
fn group_by_time<'s, 'a>(
    captures: &'s [Capture<'a>],
    minutes: u32,
) -> Vec<(Option<NaiveDateTime>, &'s [Capture<'a>])> {
    if minutes == 0 {
        return vec![(None, captures)];
    }
    captures
        .chunk_by(|a, b| {
            media::round_to_minutes(a.timestamp(), minutes)
                == media::round_to_minutes(b.timestamp(), minutes)
        })
        .map(|group| {
            (
                Some(media::round_to_minutes(group[0].timestamp(), minutes)),
                group,
            )
        })
        .collect()
}

/// Week rows of a month, Monday first; `None` pads days outside the month.
fn month_grid(month: NaiveDate) -> Vec<[Option<u32>; 7]> {
    let first = month - chrono::Days::new(u64::from(month.day0()));
    let mut rows = Vec::new();
    let mut row = [None; 7];
    let mut column = first.weekday().num_days_from_monday() as usize;

    let mut day = Some(first);
    while let Some(d) = day.filter(|d| d.month() == first.month()) {
        row[column] = Some(d.day());
        column += 1;
        if column == 7 {
            rows.push(row);
            row = [None; 7];
            column = 0;
        }
        day = d.succ_opt();
    }
    if column > 0 {
        rows.push(row);
    }
    rows
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, stylesheet: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href=(stylesheet);
            }
            body {
                (content)
            }
        }
    }
}

/// One gallery entry. `prefix` turns web-root-relative hrefs into page-relative ones.
fn capture_figure(capture: &Capture<'_>, prefix: &dyn Fn(String) -> String) -> Markup {
    let item = capture.primary;
    let date = item.timestamp.date();
    let camera = item_camera_dir(item);
    let is_video = item.kind == MediaKind::Video;

    html! {
        figure.capture.video[is_video] {
            a href=(prefix(layout::image_href(&camera, date, &item.filename))) {
                img src=(prefix(layout::thumbnail_href(&camera, date, &item.filename, item.kind)))
                    alt=(item.filename) loading="lazy";
            }
            figcaption {
                time datetime=(item.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string()) {
                    (item.timestamp.format("%H:%M:%S").to_string())
                }
                @if is_video {
                    " · video"
                }
                @if let Some(video) = capture.video {
                    " · "
                    a.video-link href=(prefix(layout::image_href(&camera, date, &video.filename))) {
                        "Captured video"
                    }
                }
            }
        }
    }
}

/// Camera directory an item was collected into: `images/<camera>/<day>/<file>`.
///
/// The filename prefix can differ from the directory name, and hrefs must
/// follow the directory.
fn item_camera_dir(item: &MediaItem) -> String {
    item.path
        .parent()
        .and_then(Path::parent)
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| item.camera_id.clone())
}

fn month_calendar(
    camera: &str,
    month: NaiveDate,
    linked: &BTreeSet<NaiveDate>,
    today: NaiveDate,
) -> Markup {
    html! {
        table.calendar {
            caption { (month.format("%B %Y").to_string()) }
            thead {
                tr {
                    @for name in WEEKDAYS {
                        th { (name) }
                    }
                }
            }
            tbody {
                @for week in month_grid(month) {
                    tr {
                        @for cell in week {
                            @if let Some(d) = cell.and_then(|d| month.with_day(d)) {
                                td class=[(d == today).then_some("today")] {
                                    @if linked.contains(&d) {
                                        a href=(layout::gallery_href(camera, d)) { (d.day()) }
                                    } @else {
                                        (d.day())
                                    }
                                }
                            } @else {
                                td {}
                            }
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders one camera's day.
fn render_gallery_page(
    site_name: &str,
    camera: &str,
    date: NaiveDate,
    captures: &[Capture<'_>],
    group_minutes: u32,
) -> Markup {
    let title = format!("{} - {} - {}", site_name, camera, layout::day_name(date));
    let up = |href: String| layout::from_gallery(&href);

    let content = html! {
        nav.day-nav {
            @if let Some(prev) = layout::previous_day(date) {
                a.prev href=(layout::gallery_page_name(prev)) { "← " (layout::day_name(prev)) }
            }
            a.home href=(up(layout::INDEX_PAGE.to_string())) { (site_name) }
            @if let Some(next) = layout::next_day(date) {
                a.next href=(layout::gallery_page_name(next)) { (layout::day_name(next)) " →" }
            }
        }
        h1 { (camera) " · " (layout::day_name(date)) }
        @if captures.is_empty() {
            p.no-data { "No captures for this day." }
        }
        @for (heading, group) in group_by_time(captures, group_minutes) {
            section.time-group {
                @if let Some(time) = heading {
                    h2 { (time.format("%H:%M").to_string()) }
                }
                div.capture-grid {
                    @for capture in group {
                        (capture_figure(capture, &up))
                    }
                }
            }
        }
    };

    base_document(&title, &up(layout::STYLESHEET.to_string()), content)
}

/// Renders the landing page.
fn render_index(
    site_name: &str,
    date: NaiveDate,
    latest: &[(&str, MediaItem)],
    archive: &[(&str, Vec<NaiveDate>)],
) -> Markup {
    let same = |href: String| href;

    let content = html! {
        h1 { (site_name) }
        section.latest {
            h2 { "Latest" }
            @if latest.is_empty() {
                p.no-data { "No captures for " (layout::day_name(date)) }
            } @else {
                div.capture-grid {
                    @for (camera, item) in latest {
                        div.latest-camera {
                            h3 { (camera) }
                            (capture_figure(&Capture { primary: item, video: None }, &same))
                            p {
                                a href=(layout::gallery_href(camera, date)) {
                                    "All captures of " (layout::day_name(date))
                                }
                            }
                        }
                    }
                }
            }
        }
        section.archive {
            h2 { "Archive" }
            @for (camera, dates) in archive {
                div.archive-camera {
                    h3 { (camera) }
                    @if dates.is_empty() {
                        p.no-data { "No galleries yet." }
                    } @else {
                        div.calendars {
                            @for (month, days) in months_newest_first(dates) {
                                (month_calendar(camera, month, &days, date))
                            }
                        }
                    }
                }
            }
        }
    };

    base_document(site_name, layout::STYLESHEET, content)
}

/// Dates bucketed by month (keyed by the 1st), newest month first.
fn months_newest_first(dates: &[NaiveDate]) -> Vec<(NaiveDate, BTreeSet<NaiveDate>)> {
    let mut months: BTreeMap<NaiveDate, BTreeSet<NaiveDate>> = BTreeMap::new();
    for d in dates {
        let first = *d - chrono::Days::new(u64::from(d.day0()));
        months.entry(first).or_default().insert(*d);
    }
    months.into_iter().rev().collect()
}

// ============================================================================
// Tests
// ============================================================================
