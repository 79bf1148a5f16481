//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations every backend must
//! support: thumbnail, placeholder, and extract_frame.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend): the `image` crate for
//! pixels, plus an `ffmpeg` subprocess for video frames.

use super::params::{FrameParams, PlaceholderParams, ThumbnailParams};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for image processing backends.
///
/// The collector only talks to this trait, so tests can swap in a recording
/// mock and never touch real pixels.
pub trait ImageBackend {
    /// Shrink a still into its bounding box and write it to `params.output`.
    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError>;

    /// Write a generated video tile.
    fn placeholder(&self, params: &PlaceholderParams) -> Result<(), BackendError>;

    /// Write one frame of a video as a bounded still.
    fn extract_frame(&self, params: &FrameParams) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::Quality;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    /// Mock backend that records operations without executing them.
    ///
    /// Sources registered with [`MockBackend::failing_on`] make any operation
    /// reading them fail, which stands in for corrupt uploads.
    #[derive(Default)]
    pub struct MockBackend {
        pub failing_sources: Mutex<Vec<PathBuf>>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Thumbnail {
            source: String,
            output: String,
            max_width: u32,
            max_height: u32,
            quality: u32,
        },
        Placeholder {
            output: String,
            width: u32,
            height: u32,
        },
        ExtractFrame {
            source: String,
            output: String,
            offset_secs: u32,
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_on(sources: &[&Path]) -> Self {
            Self {
                failing_sources: Mutex::new(sources.iter().map(|p| p.to_path_buf()).collect()),
                operations: Mutex::new(Vec::new()),
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        fn check(&self, source: &Path) -> Result<(), BackendError> {
            if self.failing_sources.lock().unwrap().iter().any(|p| p == source) {
                return Err(BackendError::ProcessingFailed(format!(
                    "mock failure for {}",
                    source.display()
                )));
            }
            Ok(())
        }
    }

    impl ImageBackend for MockBackend {
        fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError> {
            self.check(&params.source)?;
            self.operations.lock().unwrap().push(RecordedOp::Thumbnail {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                max_width: params.max_width,
                max_height: params.max_height,
                quality: params.quality.value(),
            });
            Ok(())
        }

        fn placeholder(&self, params: &PlaceholderParams) -> Result<(), BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Placeholder {
                output: params.output.to_string_lossy().to_string(),
                width: params.width,
                height: params.height,
            });
            Ok(())
        }

        fn extract_frame(&self, params: &FrameParams) -> Result<(), BackendError> {
            self.check(&params.source)?;
            self.operations.lock().unwrap().push(RecordedOp::ExtractFrame {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                offset_secs: params.offset_secs,
            });
            Ok(())
        }
    }

    #[test]
    fn mock_records_thumbnail() {
        let backend = MockBackend::new();

        backend
            .thumbnail(&ThumbnailParams {
                source: "/source.jpg".into(),
                output: "/thumb.jpg".into(),
                max_width: 256,
                max_height: 256,
                quality: Quality::new(85),
            })
            .unwrap();

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::Thumbnail {
                max_width: 256,
                max_height: 256,
                quality: 85,
                ..
            }
        ));
    }

    #[test]
    fn mock_fails_on_registered_source() {
        let backend = MockBackend::failing_on(&[Path::new("/broken.jpg")]);

        let result = backend.thumbnail(&ThumbnailParams {
            source: "/broken.jpg".into(),
            output: "/thumb.jpg".into(),
            max_width: 256,
            max_height: 256,
            quality: Quality::default(),
        });

        assert!(result.is_err());
        assert!(backend.get_operations().is_empty());
    }
}
