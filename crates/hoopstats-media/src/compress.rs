//! Best-effort pre-upload transcode.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{MediaError, MediaResult};

/// Transcodes that run longer than this will not beat uploading the
/// original file, so they are killed.
const COMPRESS_TIMEOUT_SECS: u64 = 15 * 60;

/// Knobs for the pre-upload transcode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionSettings {
    /// Quality in (0, 1]. 1.0 keeps the most detail.
    pub quality: f64,
    /// Output is scaled down to at most this many lines, never up.
    pub max_height: u32,
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            quality: 0.7,
            max_height: 1280,
        }
    }
}

impl CompressionSettings {
    /// Map the quality knob onto an x264 CRF. 1.0 maps to CRF 18
    /// (visually lossless), 0.1 to CRF 31.
    pub fn crf(&self) -> u8 {
        let quality = self.quality.clamp(0.1, 1.0);
        (18.0 + (1.0 - quality) * 14.5).round() as u8
    }

    fn scale_filter(&self) -> String {
        format!("scale=-2:'min({},ih)'", self.max_height)
    }
}

/// Transcode `input` into a smaller H.264 file at `output`.
pub async fn compress_video(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    settings: &CompressionSettings,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }

    // Check FFmpeg exists
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

    info!(
        "Compressing {} -> {} (crf {}, max height {})",
        input.display(),
        output.display(),
        settings.crf(),
        settings.max_height
    );

    let child = Command::new("ffmpeg")
        .args(["-y", "-v", "error"])
        .arg("-i")
        .arg(input)
        .args(["-vf", &settings.scale_filter()])
        .args(["-c:v", "libx264"])
        .args(["-crf", &settings.crf().to_string()])
        .args(["-preset", "veryfast"])
        .args(["-c:a", "aac"])
        .args(["-movflags", "+faststart"])
        .arg(output)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    // kill_on_drop reaps the process if the timeout drops the future.
    let waited = tokio::time::timeout(
        Duration::from_secs(COMPRESS_TIMEOUT_SECS),
        child.wait_with_output(),
    )
    .await;

    let result = match waited {
        Ok(result) => result?,
        Err(_) => return Err(MediaError::Timeout(COMPRESS_TIMEOUT_SECS)),
    };

    if !result.status.success() {
        return Err(MediaError::ffmpeg_failed(
            "ffmpeg exited with non-zero status",
            Some(String::from_utf8_lossy(&result.stderr).to_string()),
            result.status.code(),
        ));
    }

    debug!("Compression finished: {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_maps_to_crf() {
        let best = CompressionSettings {
            quality: 1.0,
            max_height: 1280,
        };
        assert_eq!(best.crf(), 18);

        let worst = CompressionSettings {
            quality: 0.1,
            max_height: 1280,
        };
        assert_eq!(worst.crf(), 31);

        assert_eq!(CompressionSettings::default().crf(), 22);

        // Out-of-range knobs are clamped, not rejected.
        let wild = CompressionSettings {
            quality: 7.0,
            max_height: 1280,
        };
        assert_eq!(wild.crf(), 18);
    }

    #[test]
    fn test_scale_never_upscales() {
        let settings = CompressionSettings {
            quality: 0.7,
            max_height: 720,
        };
        assert_eq!(settings.scale_filter(), "scale=-2:'min(720,ih)'");
    }

    #[tokio::test]
    async fn test_compress_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = compress_video(
            dir.path().join("gone.mp4"),
            dir.path().join("out.mp4"),
            &CompressionSettings::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }
}
