//! Thumbnail generation for stills and videos.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Thumbnail** | `image` decode + `resize_exact` (Lanczos3), JPEG/PNG encode |
//! | **Placeholder** | `image::RgbImage` tile with a play symbol |
//! | **Video frame** | external `ffmpeg`, one frame scaled into the bounding box |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{calculate_fit_dimensions, calculate_placeholder_dimensions};
pub use operations::{
    ThumbnailConfig, VideoPreview, VideoThumbnailConfig, create_thumbnail,
    create_video_thumbnail,
};
pub use params::Quality;
pub use rust_backend::RustBackend;
