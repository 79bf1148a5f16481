//! Centralized filename parsing for camera uploads.
//!
//! Every file a camera drops into its day directory follows the same pattern:
//! `<camera>_<seq>_<YYYYMMDDHHMMSS>.<ext>`. This module provides a single
//! parsing function that extracts all parts consistently, plus the
//! extension-based [`MediaKind`] classification.
//!
//! ## Examples
//!
//! - `front_01_20220216143000.jpg` → camera="front", sequence="01", 2022-02-16 14:30:00
//! - `Camera BE_00_20210315004528.mp4` → camera="Camera BE", sequence="00"
//! - `back_yard_03_20220216120000.jpg` → camera="back_yard" (the last two fields are fixed)
//! - `randomfile.txt` → no match
//!
//! Parsing never fails loudly: a name that doesn't fit returns `None` so the
//! caller decides whether to skip or complain.

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

/// Timestamp layout embedded in every capture filename.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

static CAPTURE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<camera>.+)_(?P<seq>\d+)_(?P<ts>\d{14})\.(?P<ext>[A-Za-z0-9]+)$")
        .expect("capture filename pattern must compile")
});

/// Result of parsing a capture filename like `front_01_20220216143000.jpg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCapture {
    /// Camera identifier as written by the camera (may differ from the directory name).
    pub camera: String,
    /// Sequence field, kept verbatim so `01` and `1` stay distinct.
    pub sequence: String,
    /// Capture time from the embedded `YYYYMMDDHHMMSS` field.
    pub timestamp: NaiveDateTime,
    /// Extension as written (case preserved).
    pub extension: String,
}

impl ParsedCapture {
    /// Calendar day the capture belongs to.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Parse a capture filename.
///
/// Returns `None` when the name does not follow the camera pattern or the
/// timestamp field is not a real date/time (e.g. month 13).
pub fn parse_capture_name(filename: &str) -> Option<ParsedCapture> {
    let caps = CAPTURE_NAME.captures(filename)?;
    let timestamp = NaiveDateTime::parse_from_str(&caps["ts"], TIMESTAMP_FORMAT).ok()?;
    Some(ParsedCapture {
        camera: caps["camera"].to_string(),
        sequence: caps["seq"].to_string(),
        timestamp,
        extension: caps["ext"].to_string(),
    })
}

/// Still image or video, decided by extension allow-lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify an extension against the configured allow-lists (case-insensitive).
    pub fn from_extension(
        extension: &str,
        image_extensions: &[String],
        video_extensions: &[String],
    ) -> Option<MediaKind> {
        let matches = |list: &[String]| list.iter().any(|e| e.eq_ignore_ascii_case(extension));
        if matches(image_extensions) {
            Some(MediaKind::Image)
        } else if matches(video_extensions) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn exts(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_simple_camera_name() {
        let p = parse_capture_name("front_01_20220216143000.jpg").unwrap();
        assert_eq!(p.camera, "front");
        assert_eq!(p.sequence, "01");
        assert_eq!(p.extension, "jpg");
        assert_eq!(p.date(), NaiveDate::from_ymd_opt(2022, 2, 16).unwrap());
        assert_eq!(
            p.timestamp.time(),
            NaiveTime::from_hms_opt(14, 30, 0).unwrap()
        );
    }

    #[test]
    fn camera_name_may_contain_spaces() {
        let p = parse_capture_name("Camera BE_00_20210315004528.mp4").unwrap();
        assert_eq!(p.camera, "Camera BE");
        assert_eq!(p.sequence, "00");
        assert_eq!(p.extension, "mp4");
    }

    #[test]
    fn camera_name_may_contain_underscores() {
        let p = parse_capture_name("back_yard_03_20220216120000.jpg").unwrap();
        assert_eq!(p.camera, "back_yard");
        assert_eq!(p.sequence, "03");
    }

    #[test]
    fn unrelated_file_does_not_match() {
        assert_eq!(parse_capture_name("randomfile.txt"), None);
        assert_eq!(parse_capture_name("front_20220216143000.jpg"), None);
        assert_eq!(parse_capture_name(".DS_Store"), None);
    }

    #[test]
    fn short_timestamp_does_not_match() {
        assert_eq!(parse_capture_name("front_01_2022021614300.jpg"), None);
    }

    #[test]
    fn impossible_timestamp_does_not_match() {
        assert_eq!(parse_capture_name("front_01_20221316143000.jpg"), None);
        assert_eq!(parse_capture_name("front_01_20220216250000.jpg"), None);
    }

    #[test]
    fn missing_extension_does_not_match() {
        assert_eq!(parse_capture_name("front_01_20220216143000"), None);
    }

    #[test]
    fn classify_is_case_insensitive() {
        let images = exts(&["jpg", "jpeg"]);
        let videos = exts(&["mp4"]);
        assert_eq!(
            MediaKind::from_extension("JPG", &images, &videos),
            Some(MediaKind::Image)
        );
        assert_eq!(
            MediaKind::from_extension("Mp4", &images, &videos),
            Some(MediaKind::Video)
        );
        assert_eq!(MediaKind::from_extension("txt", &images, &videos), None);
    }
}
