//! CLI output formatting for both pipeline stages.
//!
//! Output is organised by camera, the unit an operator thinks in, with
//! counts first and paths as indented context. Diagnostics (skipped files,
//! fallbacks) go through `tracing` to stderr; what is printed here is the
//! stage summary on stdout.
//!
//! # Output Format
//!
//! ## Collect
//!
//! ```text
//! Collect 2022-02-16
//! 001 front (12 images, 3 videos)
//!     2 video previews are placeholders
//!     1 file skipped
//! 002 back
//!     No uploads: /srv/cams/back/2022/02/16
//! Collected 12 images, 3 videos from 1 of 2 cameras
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! 001 front
//!     2022-02-16 (15 entries) → front/2022-02-16.html
//! 002 back
//!     No captures for 2022-02-16
//! Generated 1 gallery page
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::collect::{CameraOutcome, CollectReport};
use crate::generate::BuildReport;
use crate::layout;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

/// Path relative to the web root, `/`-separated; absolute when outside it.
fn site_path(path: &Path, web_root: &Path) -> String {
    let Ok(rel) = path.strip_prefix(web_root) else {
        return path.display().to_string();
    };
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

// ============================================================================
// Collect
// ============================================================================

pub fn format_collect_output(report: &CollectReport) -> Vec<String> {
    let mut lines = vec![format!("Collect {}", layout::day_name(report.date))];
    let mut images = 0;
    let mut videos = 0;
    let mut collected_cameras = 0;

    for (i, camera) in report.cameras.iter().enumerate() {
        match &camera.outcome {
            CameraOutcome::Collected(stats) => {
                collected_cameras += 1;
                images += stats.images;
                videos += stats.videos;
                lines.push(format!(
                    "{} {} ({}, {})",
                    format_index(i + 1),
                    camera.camera,
                    plural(stats.images, "image", "images"),
                    plural(stats.videos, "video", "videos")
                ));
                if stats.placeholders > 0 {
                    lines.push(format!(
                        "    {} {} placeholder{}",
                        plural(stats.placeholders, "video preview", "video previews"),
                        if stats.placeholders == 1 { "is a" } else { "are" },
                        if stats.placeholders == 1 { "" } else { "s" }
                    ));
                }
                if stats.skipped > 0 {
                    lines.push(format!("    {} skipped", plural(stats.skipped, "file", "files")));
                }
            }
            CameraOutcome::MissingDay(dir) => {
                lines.push(format!("{} {}", format_index(i + 1), camera.camera));
                lines.push(format!("    No uploads: {}", dir.display()));
            }
        }
    }

    lines.push(format!(
        "Collected {}, {} from {} of {} cameras",
        plural(images, "image", "images"),
        plural(videos, "video", "videos"),
        collected_cameras,
        report.cameras.len()
    ));
    lines
}

/// Print collect output to stdout.
pub fn print_collect_output(report: &CollectReport) {
    for line in format_collect_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_output(report: &BuildReport, web_root: &Path) -> Vec<String> {
    let mut lines = vec![format!(
        "Home \u{2192} {}",
        site_path(&report.index, web_root)
    )];

    // Cameras in the order they were first reported
    let mut cameras: Vec<&str> = Vec::new();
    for name in report
        .galleries
        .iter()
        .map(|g| g.camera.as_str())
        .chain(report.without_data.iter().map(String::as_str))
    {
        if !cameras.contains(&name) {
            cameras.push(name);
        }
    }

    for (i, camera) in cameras.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), camera));
        for gallery in report.galleries.iter().filter(|g| g.camera == *camera) {
            lines.push(format!(
                "    {} ({}) \u{2192} {}",
                layout::day_name(gallery.date),
                plural(gallery.entries, "entry", "entries"),
                site_path(&gallery.path, web_root)
            ));
        }
        if report.without_data.iter().any(|c| c == camera) {
            lines.push(format!(
                "    No captures for {}",
                layout::day_name(report.date)
            ));
        }
    }

    lines.push(format!(
        "Generated {}",
        plural(report.galleries.len(), "gallery page", "gallery pages")
    ));
    lines
}

/// Print build output to stdout.
pub fn print_build_output(report: &BuildReport, web_root: &Path) {
    for line in format_build_output(report, web_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
