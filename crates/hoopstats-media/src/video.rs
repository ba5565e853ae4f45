//! Local video files selected for upload.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{MediaError, MediaResult};
use crate::probe;

/// File extensions the analysis pipeline accepts.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp4", "mov", "webm", "avi", "mkv", "wmv", "flv"];

/// A video file on disk, paired with the facts needed to decide how to
/// upload it.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalVideo {
    pub path: PathBuf,
    /// Display name, the file name without its directory.
    pub name: String,
    pub size_bytes: u64,
    /// Seconds. None when the file could not be probed.
    pub duration: Option<f64>,
}

impl LocalVideo {
    /// Open a video file, reading its size and probing its duration.
    ///
    /// Probing is best effort: a file ffprobe cannot read still opens,
    /// just without a duration.
    pub async fn open(path: impl AsRef<Path>) -> MediaResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(MediaError::FileNotFound(path.to_path_buf()));
        }

        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(MediaError::InvalidVideo(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "video".to_string());

        let duration = match probe::probe_duration(path).await {
            Ok(secs) if secs > 0.0 => Some(secs),
            Ok(_) => None,
            Err(err) => {
                debug!("Could not probe {}: {}", path.display(), err);
                None
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            name,
            size_bytes: metadata.len(),
            duration,
        })
    }
}

/// Whether the file has an extension the pipeline accepts.
pub fn is_supported_video(path: impl AsRef<Path>) -> bool {
    extension_lowercase(path.as_ref())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// MIME type for a video file, derived from its extension. Unknown
/// extensions fall back to mp4, which is what the gateway assumes.
pub fn mime_for_path(path: impl AsRef<Path>) -> &'static str {
    match extension_lowercase(path.as_ref()).as_deref() {
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        Some("avi") => "video/x-msvideo",
        Some("mkv") => "video/x-matroska",
        Some("wmv") => "video/x-ms-wmv",
        Some("flv") => "video/x-flv",
        _ => "video/mp4",
    }
}

fn extension_lowercase(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_video("game.mp4"));
        assert!(is_supported_video("game.MOV"));
        assert!(is_supported_video("folder/game.mkv"));
        assert!(!is_supported_video("game.txt"));
        assert!(!is_supported_video("game"));
    }

    #[test]
    fn test_mime_mapping() {
        assert_eq!(mime_for_path("game.mp4"), "video/mp4");
        assert_eq!(mime_for_path("game.mov"), "video/quicktime");
        assert_eq!(mime_for_path("game.AVI"), "video/x-msvideo");
        assert_eq!(mime_for_path("game.unknown"), "video/mp4");
    }

    #[tokio::test]
    async fn test_open_reads_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        tokio::fs::write(&path, vec![0u8; 2048]).await.unwrap();

        let video = LocalVideo::open(&path).await.unwrap();
        assert_eq!(video.name, "clip.mp4");
        assert_eq!(video.size_bytes, 2048);
        // Not a real mp4, so the probe cannot supply a duration.
        assert_eq!(video.duration, None);
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LocalVideo::open(dir.path().join("gone.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }
}
