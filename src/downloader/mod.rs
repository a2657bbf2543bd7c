use crate::config::AudioFormat;
use crate::errors::{Result, TuneLinkError};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::process::Command as AsyncCommand;
use tracing::debug;
use url::Url;

/// yt-dlp invoker for audio downloads.
///
/// Verifies once per instance that the binary is reachable, then spawns one
/// process per download. The resulting file path is taken from yt-dlp's
/// structured `--print after_move:filepath` output, not from its log lines.
pub struct DownloadManager {
    executable_path: String,
    download_path: PathBuf,
    availability_checked: AtomicBool,
}

impl DownloadManager {
    pub fn new() -> Self {
        let download_path = dirs::download_dir()
            .map(|dir| dir.join("tunelink"))
            .unwrap_or_else(|| PathBuf::from("./downloads"));
        Self::with_paths("yt-dlp", download_path)
    }

    /// Create a manager with a custom executable and download directory
    pub fn with_paths(executable_path: impl Into<String>, download_path: PathBuf) -> Self {
        Self {
            executable_path: executable_path.into(),
            download_path,
            availability_checked: AtomicBool::new(false),
        }
    }

    /// Where downloaded files end up
    pub fn download_path(&self) -> &Path {
        &self.download_path
    }

    /// Check that yt-dlp is reachable, memoized per instance
    async fn ensure_available(&self) -> Result<()> {
        if self.availability_checked.load(Ordering::Relaxed) {
            return Ok(());
        }

        let output = AsyncCommand::new(&self.executable_path)
            .arg("--version")
            .output()
            .await;

        match output {
            Ok(output) if output.status.success() => {
                self.availability_checked.store(true, Ordering::Relaxed);
                Ok(())
            }
            _ => Err(TuneLinkError::DownloaderUnavailable),
        }
    }

    /// Download audio for a query.
    ///
    /// A URL is passed through as-is; anything else becomes a single-result
    /// YouTube search with an exact `"official video"` suffix.
    pub async fn download_audio(&self, query: &str, format: AudioFormat) -> Result<PathBuf> {
        self.ensure_available().await?;
        tokio::fs::create_dir_all(&self.download_path).await?;

        let target = if is_url(query) {
            query.to_string()
        } else {
            format!("ytsearch1:{query} \"official video\"")
        };
        let output_template = self.download_path.join("%(title)s.%(ext)s");
        debug!(%target, %format, "starting yt-dlp");

        let output = AsyncCommand::new(&self.executable_path)
            .arg("-x")
            .arg("--audio-format")
            .arg(format.to_string())
            .arg("--audio-quality")
            .arg("0")
            .arg("--embed-metadata")
            .arg("--prefer-ffmpeg")
            .arg("-o")
            .arg(&output_template)
            .arg("--print")
            .arg("after_move:filepath")
            .arg("--no-simulate")
            .arg(&target)
            .output()
            .await?;

        if !output.status.success() {
            return Err(TuneLinkError::DownloadFailed {
                exit_code: output.status.code().unwrap_or(-1),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(PathBuf::from)
            .ok_or(TuneLinkError::DownloadPathMissing)
    }
}

impl Default for DownloadManager {
    fn default() -> Self {
        Self::new()
    }
}

fn is_url(query: &str) -> bool {
    Url::parse(query)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}
