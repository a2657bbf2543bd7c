//! Unified search across Spotify and YouTube with yt-dlp audio downloads.
//!
//! A query string is classified (link vs. free text), resolved against the
//! matching upstream and normalized into a tagged [`ResolvedQuery`]. A second
//! operation hands a query to yt-dlp to fetch audio.
//!
//! ```no_run
//! use tunelink::{AudioFormat, TuneLink, TuneLinkOptions};
//!
//! # async fn run() -> tunelink::Result<()> {
//! let tunelink = TuneLink::new(TuneLinkOptions {
//!     spotify_client_id: Some("id".into()),
//!     spotify_client_secret: Some("secret".into()),
//!     youtube_api_key: Some("key".into()),
//! });
//!
//! let result = tunelink.search("lofi beats", None).await?;
//! let path = tunelink.download_audio("some song", AudioFormat::Mp3).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod downloader;
pub mod errors;
pub mod models;
pub mod resolver;

pub use config::{AudioFormat, SpotifyCredentials, TuneLinkOptions};
pub use downloader::DownloadManager;
pub use errors::{Result, TuneLinkError};
pub use models::ResolvedQuery;
pub use resolver::{SearchObserver, SearchProvider};

use std::path::{Path, PathBuf};

const DEFAULT_MARKET: &str = "US";

/// Facade wiring the resolver and the download manager behind one object
pub struct TuneLink {
    pub options: TuneLinkOptions,
    pub search_provider: SearchProvider,
    download_manager: DownloadManager,
}

impl TuneLink {
    pub fn new(options: TuneLinkOptions) -> Self {
        let search_provider = SearchProvider::new(&options);
        Self {
            options,
            search_provider,
            download_manager: DownloadManager::new(),
        }
    }

    /// Resolve a query string; `market` defaults to `"US"`
    pub async fn search(&self, query: &str, market: Option<&str>) -> Result<ResolvedQuery> {
        self.search_provider
            .search(query, market.unwrap_or(DEFAULT_MARKET))
            .await
    }

    /// Download audio for a query and return the resulting file path
    pub async fn download_audio(&self, query: &str, format: AudioFormat) -> Result<PathBuf> {
        self.download_manager.download_audio(query, format).await
    }

    /// Where downloaded files end up
    pub fn download_path(&self) -> &Path {
        self.download_manager.download_path()
    }
}
