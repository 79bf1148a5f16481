//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides what thumbnails to create) and the [`backend`](super::backend)
//! (which does the actual pixel work). This separation allows swapping backends
//! (e.g. for testing with a mock) without changing operation logic.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Shrink `source` so it fits inside `max_width` x `max_height`.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub max_width: u32,
    pub max_height: u32,
    pub quality: Quality,
}

/// Draw a generated video tile of exactly `width` x `height`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderParams {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}

/// Grab one frame of a video with ffmpeg.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameParams {
    pub ffmpeg: PathBuf,
    pub source: PathBuf,
    pub output: PathBuf,
    pub offset_secs: u32,
    pub max_width: u32,
    pub max_height: u32,
}
