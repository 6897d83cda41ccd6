use std::path::{Path, PathBuf};
use std::process::Command;

use crate::acquisition::domain::video_fetcher::{FetchError, VideoFetcher};
use crate::shared::constants::MAX_DOWNLOAD_HEIGHT;

/// Downloads videos through the `yt-dlp` command line tool.
///
/// Quality is capped at [`MAX_DOWNLOAD_HEIGHT`]; transcription only needs
/// the audio track, so pulling the source's best rendition would waste
/// bandwidth and scratch space. The final file path is taken from yt-dlp's
/// own post-move report rather than guessed from the URL.
pub struct YtDlpFetcher {
    binary: String,
}

impl YtDlpFetcher {
    pub fn new() -> Self {
        Self {
            binary: "yt-dlp".to_string(),
        }
    }

    /// Override the downloader binary, for tests and packaged installs.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }
}

impl Default for YtDlpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoFetcher for YtDlpFetcher {
    fn fetch(&self, url: &str, scratch_dir: &Path) -> Result<PathBuf, FetchError> {
        log::info!("starting download for {url}");

        let output_template = scratch_dir.join("%(id)s.%(ext)s");
        let output = Command::new(&self.binary)
            .arg("--quiet")
            .arg("--no-warnings")
            .arg("--no-simulate")
            .arg("--format")
            .arg(format!("best[height<={MAX_DOWNLOAD_HEIGHT}]"))
            .arg("--print")
            .arg("after_move:filepath")
            .arg("--output")
            .arg(&output_template)
            .arg(url)
            .output()
            .map_err(|e| FetchError::Spawn {
                binary: self.binary.clone(),
                source: e,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FetchError::Download {
                url: url.to_string(),
                reason: stderr.trim().to_string(),
            });
        }

        let reported = String::from_utf8_lossy(&output.stdout);
        let path = PathBuf::from(reported.trim());
        if path.as_os_str().is_empty() || !path.exists() {
            return Err(FetchError::Missing { path });
        }

        log::info!("downloaded video to {}", path.display());
        Ok(path)
    }
}
