#![deny(unreachable_patterns)]
//! FFmpeg CLI helpers for the upload path.
//!
//! This crate wraps the ffmpeg and ffprobe binaries for the two things
//! the uploader needs:
//! - Inspecting a selected file (size, duration, geometry)
//! - Shrinking it before it goes over the wire

pub mod compress;
pub mod error;
pub mod probe;
pub mod video;

pub use compress::{compress_video, CompressionSettings};
pub use error::{MediaError, MediaResult};
pub use probe::{probe_duration, probe_video, VideoInfo};
pub use video::{is_supported_video, mime_for_path, LocalVideo, SUPPORTED_EXTENSIONS};
