//! Media items and captures.
//!
//! A [`MediaItem`] is one upload that passed filename parsing and extension
//! classification. A [`Capture`] is what a visitor sees as one gallery entry:
//! a still with the video recorded alongside it, or a lone still, or a lone
//! video.
//!
//! Cameras usually write a `.jpg` and a `.mp4` per event. Their timestamps are
//! often identical but can drift by a few seconds, so pairing picks the
//! closest unpaired still within a configurable window rather than requiring
//! an exact match.

use crate::config::MediaConfig;
use crate::naming::{MediaKind, parse_capture_name};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// One upload belonging to a capture day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    /// Where the file was found (an upload for the collector, a symlink for the site builder).
    pub path: PathBuf,
    pub filename: String,
    /// Camera identifier embedded in the filename.
    pub camera_id: String,
    pub sequence: String,
    pub timestamp: NaiveDateTime,
    pub kind: MediaKind,
}

/// Why a directory entry was left out of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotUtf8,
    UnknownPattern,
    UnsupportedExtension(String),
    OtherDay(NaiveDate),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotUtf8 => write!(f, "filename is not valid UTF-8"),
            SkipReason::UnknownPattern => {
                write!(f, "filename does not match <camera>_<seq>_<timestamp>.<ext>")
            }
            SkipReason::UnsupportedExtension(ext) => write!(f, "unsupported extension .{ext}"),
            SkipReason::OtherDay(day) => write!(f, "timestamp belongs to {day}"),
        }
    }
}

/// Turn a directory entry into a [`MediaItem`] for `date`, or say why not.
pub fn classify(path: &Path, date: NaiveDate, media: &MediaConfig) -> Result<MediaItem, SkipReason> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or(SkipReason::NotUtf8)?;
    let parsed = parse_capture_name(filename).ok_or(SkipReason::UnknownPattern)?;
    let kind = media
        .kind_of(&parsed.extension)
        .ok_or_else(|| SkipReason::UnsupportedExtension(parsed.extension.clone()))?;
    if parsed.date() != date {
        return Err(SkipReason::OtherDay(parsed.date()));
    }
    Ok(MediaItem {
        path: path.to_path_buf(),
        filename: filename.to_string(),
        camera_id: parsed.camera,
        sequence: parsed.sequence,
        timestamp: parsed.timestamp,
        kind,
    })
}

/// Chronological order; filename breaks ties so the order is total.
pub fn sort_items(items: &mut [MediaItem]) {
    items.sort_by(|a, b| (a.timestamp, &a.filename).cmp(&(b.timestamp, &b.filename)));
}

/// Distinct camera identifiers found in a batch.
pub fn camera_ids(items: &[MediaItem]) -> BTreeSet<&str> {
    items.iter().map(|i| i.camera_id.as_str()).collect()
}

/// A gallery entry: the item shown as the thumbnail, plus an attached video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture<'a> {
    pub primary: &'a MediaItem,
    /// Video recorded alongside a still. Always `None` when `primary` is a video.
    pub video: Option<&'a MediaItem>,
}

impl Capture<'_> {
    pub fn timestamp(&self) -> NaiveDateTime {
        self.primary.timestamp
    }
}

/// Group a day's items into captures, in chronological order.
///
/// Each video is attached to the closest still that has no video yet, if the
/// two timestamps are at most `window_secs` apart (ties go to the earlier
/// still). Videos that find no partner become captures of their own.
pub fn pair_captures(items: &[MediaItem], window_secs: u32) -> Vec<Capture<'_>> {
    let window = i64::from(window_secs);
    let by_time = |a: &&MediaItem, b: &&MediaItem| {
        (a.timestamp, &a.filename).cmp(&(b.timestamp, &b.filename))
    };

    let mut stills: Vec<&MediaItem> = items.iter().filter(|i| i.kind == MediaKind::Image).collect();
    let mut videos: Vec<&MediaItem> = items.iter().filter(|i| i.kind == MediaKind::Video).collect();
    stills.sort_by(by_time);
    videos.sort_by(by_time);

    let mut partners: Vec<Option<&MediaItem>> = vec![None; stills.len()];
    let mut lone_videos = Vec::new();

    for video in videos {
        let best = stills
            .iter()
            .enumerate()
            .filter(|(idx, _)| partners[*idx].is_none())
            .map(|(idx, still)| (idx, (still.timestamp - video.timestamp).num_seconds().abs()))
            .filter(|(_, distance)| *distance <= window)
            .min_by_key(|(idx, distance)| (*distance, *idx));
        match best {
            Some((idx, _)) => partners[idx] = Some(video),
            None => lone_videos.push(video),
        }
    }

    let mut captures: Vec<Capture<'_>> = stills
        .into_iter()
        .zip(partners)
        .map(|(primary, video)| Capture { primary, video })
        .chain(lone_videos.into_iter().map(|primary| Capture {
            primary,
            video: None,
        }))
        .collect();
    captures.sort_by(|a, b| by_time(&a.primary, &b.primary));
    captures
}

/// Round a timestamp to the nearest multiple of `minutes` within its day.
///
/// Exactly half-way rounds up: with 10 minutes, 15:14:59 → 15:10 and
/// 15:15:00 → 15:20. `minutes == 0` returns the timestamp unchanged.
pub fn round_to_minutes(timestamp: NaiveDateTime, minutes: u32) -> NaiveDateTime {
    if minutes == 0 {
        return timestamp;
    }
    let step = i64::from(minutes) * 60;
    let secs = i64::from(timestamp.time().num_seconds_from_midnight());
    let rounded = (secs + step / 2) / step * step;
    timestamp + TimeDelta::seconds(rounded - secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::TIMESTAMP_FORMAT;

    fn at(ts: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).unwrap()
    }

    fn item(filename: &str) -> MediaItem {
        classify(
            Path::new(filename),
            parse_capture_name(filename).unwrap().date(),
            &MediaConfig::default(),
        )
        .unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn classify_front_still() {
        let media = MediaConfig::default();
        let it = classify(
            Path::new("/src/front/2022/02/16/front_01_20220216143000.jpg"),
            day(2022, 2, 16),
            &media,
        )
        .unwrap();
        assert_eq!(it.camera_id, "front");
        assert_eq!(it.kind, MediaKind::Image);
        assert_eq!(it.timestamp.date(), day(2022, 2, 16));
        assert_eq!(it.filename, "front_01_20220216143000.jpg");
    }

    #[test]
    fn classify_skips_random_file() {
        let media = MediaConfig::default();
        let result = classify(Path::new("randomfile.txt"), day(2022, 2, 16), &media);
        assert_eq!(result, Err(SkipReason::UnknownPattern));
    }

    #[test]
    fn classify_skips_unknown_extension() {
        let media = MediaConfig::default();
        let result = classify(
            Path::new("front_01_20220216143000.gif"),
            day(2022, 2, 16),
            &media,
        );
        assert_eq!(result, Err(SkipReason::UnsupportedExtension("gif".into())));
    }

    #[test]
    fn classify_skips_file_from_other_day() {
        let media = MediaConfig::default();
        let result = classify(
            Path::new("front_01_20220217000001.jpg"),
            day(2022, 2, 16),
            &media,
        );
        assert_eq!(result, Err(SkipReason::OtherDay(day(2022, 2, 17))));
    }

    #[test]
    fn sort_items_is_chronological() {
        let mut items = vec![
            item("c_01_20220216143000.jpg"),
            item("c_01_20220216120000.jpg"),
            item("c_01_20220216235959.jpg"),
        ];
        sort_items(&mut items);
        let names: Vec<&str> = items.iter().map(|i| i.filename.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "c_01_20220216120000.jpg",
                "c_01_20220216143000.jpg",
                "c_01_20220216235959.jpg"
            ]
        );
    }

    #[test]
    fn exact_timestamp_pairs_video_with_still() {
        let items = vec![
            item("c_00_20210313090000.jpg"),
            item("c_00_20210313090000.mp4"),
        ];
        let captures = pair_captures(&items, 10);
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].primary.kind, MediaKind::Image);
        assert_eq!(
            captures[0].video.map(|v| v.filename.as_str()),
            Some("c_00_20210313090000.mp4")
        );
    }

    #[test]
    fn nearby_video_pairs_within_window() {
        let items = vec![
            item("c_00_20210313000010.jpg"),
            item("c_00_20210313000014.mp4"),
        ];
        let captures = pair_captures(&items, 10);
        assert_eq!(captures.len(), 1);
        assert!(captures[0].video.is_some());
    }

    #[test]
    fn distant_video_stays_alone() {
        let items = vec![
            item("c_00_20210313090523.jpg"),
            item("c_00_20210313091524.mp4"),
        ];
        let captures = pair_captures(&items, 10);
        assert_eq!(captures.len(), 2);
        assert!(captures.iter().all(|c| c.video.is_none()));
        assert_eq!(captures[1].primary.kind, MediaKind::Video);
    }

    #[test]
    fn each_still_takes_at_most_one_video() {
        let items = vec![
            item("c_00_20210313090000.jpg"),
            item("c_00_20210313090001.mp4"),
            item("c_00_20210313090002.mp4"),
        ];
        let captures = pair_captures(&items, 10);
        assert_eq!(captures.len(), 2);
        assert_eq!(
            captures[0].video.map(|v| v.filename.as_str()),
            Some("c_00_20210313090001.mp4")
        );
        assert_eq!(captures[1].primary.filename, "c_00_20210313090002.mp4");
    }

    #[test]
    fn video_prefers_closest_still() {
        let items = vec![
            item("c_00_20210313090000.jpg"),
            item("c_00_20210313090008.jpg"),
            item("c_00_20210313090007.mp4"),
        ];
        let captures = pair_captures(&items, 10);
        assert_eq!(captures.len(), 2);
        assert!(captures[0].video.is_none());
        assert!(captures[1].video.is_some());
    }

    #[test]
    fn camera_ids_collects_distinct_prefixes() {
        let items = vec![
            item("a_00_20210313090000.jpg"),
            item("b_00_20210313090000.jpg"),
            item("a_01_20210313090100.jpg"),
        ];
        let ids: Vec<&str> = camera_ids(&items).into_iter().collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn round_to_minutes_matches_half_up_rule() {
        assert_eq!(round_to_minutes(at("20210313151055"), 10), at("20210313151000"));
        assert_eq!(round_to_minutes(at("20210313151459"), 10), at("20210313151000"));
        assert_eq!(round_to_minutes(at("20210313151500"), 10), at("20210313152000"));
    }

    #[test]
    fn round_to_zero_minutes_is_identity() {
        assert_eq!(round_to_minutes(at("20210313151055"), 0), at("20210313151055"));
    }
}
