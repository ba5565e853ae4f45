//! Typed client for the hoopstats analysis gateway.
//!
//! This crate owns the whole client side of the upload lifecycle:
//! - Upload preparation, with best-effort compression of large files
//! - The HTTP calls (upload, status, download) against the proxy
//! - The polling loop that watches a job until it is terminal

pub mod client;
pub mod config;
pub mod error;
pub mod poll;
pub mod upload;

pub use client::ApiClient;
pub use config::{ClientConfig, COMPRESSION_THRESHOLD_BYTES};
pub use error::{ClientError, ClientResult};
pub use poll::{PollOutcome, StatusPoller};
pub use upload::{prepare_upload, Compressor, FfmpegCompressor, PreparedUpload, UploadOptions};
