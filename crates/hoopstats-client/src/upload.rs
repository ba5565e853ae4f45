//! Upload preparation.
//!
//! Large files get a best-effort transcode before going over the wire.
//! The fallback contract matters more than the compression itself: a
//! failed transcode must never fail the upload, the original file is
//! sent instead.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::TempDir;
use tracing::{debug, info, warn};

use hoopstats_media::{CompressionSettings, LocalVideo};

use crate::error::ClientResult;

/// Options controlling upload preparation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UploadOptions {
    /// Try to shrink large files before uploading.
    pub compress: bool,
    /// Transcode quality in (0, 1].
    pub quality: f64,
    /// Scale output down to at most this many lines.
    pub max_height: u32,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            compress: true,
            quality: 0.7,
            max_height: 1280,
        }
    }
}

impl UploadOptions {
    fn settings(&self) -> CompressionSettings {
        CompressionSettings {
            quality: self.quality,
            max_height: self.max_height,
        }
    }
}

/// Video transcoder used during upload preparation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Compressor: Send + Sync {
    async fn compress(
        &self,
        input: &Path,
        output: &Path,
        settings: &CompressionSettings,
    ) -> ClientResult<()>;
}

/// Production compressor backed by the ffmpeg CLI.
#[derive(Debug, Default)]
pub struct FfmpegCompressor;

#[async_trait]
impl Compressor for FfmpegCompressor {
    async fn compress(
        &self,
        input: &Path,
        output: &Path,
        settings: &CompressionSettings,
    ) -> ClientResult<()> {
        hoopstats_media::compress_video(input, output, settings).await?;
        Ok(())
    }
}

/// A file ready to upload.
///
/// Holds the scratch directory alive while the compressed copy is in
/// use; dropping this removes the copy.
#[derive(Debug)]
pub struct PreparedUpload {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub compressed: bool,
    _scratch: Option<TempDir>,
}

/// Decide what file actually gets uploaded.
///
/// Files at or below `threshold_bytes`, or uploads with compression
/// disabled, go out untouched.
pub async fn prepare_upload(
    video: &LocalVideo,
    options: &UploadOptions,
    threshold_bytes: u64,
    compressor: &dyn Compressor,
) -> ClientResult<PreparedUpload> {
    if !options.compress || video.size_bytes <= threshold_bytes {
        debug!("Uploading {} as-is ({} bytes)", video.name, video.size_bytes);
        return Ok(PreparedUpload {
            path: video.path.clone(),
            size_bytes: video.size_bytes,
            compressed: false,
            _scratch: None,
        });
    }

    let scratch = tempfile::tempdir()?;
    let output = scratch.path().join(transcoded_name(&video.name));

    match compressed_copy(video, &output, options, compressor).await {
        Ok(size_bytes) => {
            info!(
                "Compressed {} from {} to {} bytes",
                video.name, video.size_bytes, size_bytes
            );
            Ok(PreparedUpload {
                path: output,
                size_bytes,
                compressed: true,
                _scratch: Some(scratch),
            })
        }
        Err(err) => {
            warn!(
                "Compression of {} failed, uploading the original: {}",
                video.name, err
            );
            Ok(PreparedUpload {
                path: video.path.clone(),
                size_bytes: video.size_bytes,
                compressed: false,
                _scratch: None,
            })
        }
    }
}

async fn compressed_copy(
    video: &LocalVideo,
    output: &Path,
    options: &UploadOptions,
    compressor: &dyn Compressor,
) -> ClientResult<u64> {
    compressor
        .compress(&video.path, output, &options.settings())
        .await?;
    Ok(tokio::fs::metadata(output).await?.len())
}

/// Transcoded copies keep the source name so the upload still carries
/// it, but with the mp4 extension the encoder actually produces.
fn transcoded_name(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => format!("{stem}.mp4"),
        _ => format!("{name}.mp4"),
    }
}
