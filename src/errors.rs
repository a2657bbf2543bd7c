use thiserror::Error;

/// Main error type for the tunelink library
#[derive(Error, Debug)]
pub enum TuneLinkError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No usable credentials configured: {0}")]
    MissingCredentials(String),

    #[error("Token exchange failed: {0}")]
    Auth(String),

    #[error("{service} returned HTTP {status}")]
    Upstream { service: &'static str, status: u16 },

    #[error("{service} response did not match the expected schema: {detail}")]
    Schema {
        service: &'static str,
        detail: String,
    },

    #[error("YouTube rate limit exceeded, retry after: {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("yt-dlp not found, install it from https://github.com/yt-dlp/yt-dlp")]
    DownloaderUnavailable,

    #[error("yt-dlp exited with code {exit_code}")]
    DownloadFailed { exit_code: i32 },

    #[error("yt-dlp finished without reporting an output path")]
    DownloadPathMissing,

    #[error("Invalid audio format: {0}")]
    InvalidFormat(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, TuneLinkError>;
