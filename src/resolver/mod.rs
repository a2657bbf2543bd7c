pub mod spotify;
pub mod token;
pub mod youtube;

use crate::config::TuneLinkOptions;
use crate::errors::{Result, TuneLinkError};
use crate::models::{
    AlbumSummary, AlbumTrack, ArtistSummary, ArtistTopTrack, Image, PlaylistOwner,
    PlaylistSummary, ResolvedQuery, TrackSummary, VideoPlaylistSummary, VideoSummary,
};
use regex::Regex;
use spotify::{SpotifyClient, TrackObject};
use std::sync::{Arc, OnceLock};
use tracing::{debug, error};
use youtube::{SearchItem, YouTubeClient};

/// Id prefixes that mark a captured YouTube id as a playlist. A cheap local
/// check, never confirmed upstream; ids that coincidentally share a prefix
/// are misclassified, a known approximation.
const PLAYLIST_ID_PREFIXES: [&str; 3] = ["PL", "UU", "RD"];

fn spotify_link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"https://open\.spotify\.com/(track|artist|album|playlist)/([a-zA-Z0-9]{22})")
            .expect("valid spotify link regex")
    })
}

fn youtube_link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?:https?://)?(?:www\.)?(?:youtube\.com/(?:.*[?&](?:v=|list=)|playlist\?list=)|youtu\.be/)([^"&?/\s]{11,34})"#,
        )
        .expect("valid youtube link regex")
    })
}

/// Where a query string was classified to go, before any upstream call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    /// A Spotify link; `kind` is the captured path segment
    SpotifyLink { kind: String, id: String },
    YouTubeVideo { id: String },
    YouTubePlaylist { id: String },
    FreeText,
}

/// Classify a query string without touching the network.
///
/// Spotify links win over YouTube links, but only when Spotify credentials
/// are configured; a Spotify-style link without credentials falls through to
/// the YouTube check and then to free text.
pub fn classify(query: &str, has_spotify: bool, has_youtube: bool) -> QueryKind {
    if has_spotify {
        if let Some(captures) = spotify_link_regex().captures(query) {
            return QueryKind::SpotifyLink {
                kind: captures[1].to_string(),
                id: captures[2].to_string(),
            };
        }
    }

    if has_youtube {
        if let Some(captures) = youtube_link_regex().captures(query) {
            let id = captures[1].to_string();
            if PLAYLIST_ID_PREFIXES.iter().any(|p| id.starts_with(p)) {
                return QueryKind::YouTubePlaylist { id };
            }
            return QueryKind::YouTubeVideo { id };
        }
    }

    QueryKind::FreeText
}

/// Hooks for callers who want visibility into classification decisions and
/// failures without a return value. All methods default to no-ops.
pub trait SearchObserver: Send + Sync {
    fn on_debug(&self, _tag: &str, _message: &str) {}
    fn on_error(&self, _error: &TuneLinkError) {}
}

/// Resolves a query string against Spotify and YouTube and normalizes the
/// response into a [`ResolvedQuery`].
pub struct SearchProvider {
    spotify: Option<SpotifyClient>,
    youtube: Option<YouTubeClient>,
    observer: Option<Arc<dyn SearchObserver>>,
}

impl SearchProvider {
    pub fn new(options: &TuneLinkOptions) -> Self {
        let spotify = options.spotify_credentials().map(SpotifyClient::new);
        let youtube = options
            .youtube_api_key
            .as_deref()
            .map(YouTubeClient::new);
        Self::from_clients(spotify, youtube)
    }

    /// Wire a provider from pre-built clients
    pub fn from_clients(spotify: Option<SpotifyClient>, youtube: Option<YouTubeClient>) -> Self {
        Self {
            spotify,
            youtube,
            observer: None,
        }
    }

    /// Attach an observer for debug and error notifications
    pub fn with_observer(mut self, observer: Arc<dyn SearchObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Resolve a query string into a normalized result.
    ///
    /// `market` applies to every Spotify fetch that takes one.
    pub async fn search(&self, query: &str, market: &str) -> Result<ResolvedQuery> {
        let result = self.dispatch(query, market).await;
        if let Err(err) = &result {
            error!(%query, %err, "search failed");
            if let Some(observer) = &self.observer {
                observer.on_error(err);
            }
        }
        result
    }

    async fn dispatch(&self, query: &str, market: &str) -> Result<ResolvedQuery> {
        let kind = classify(query, self.spotify.is_some(), self.youtube.is_some());
        self.emit_debug("classify", &format!("query: {query} -> {kind:?}"));

        match kind {
            QueryKind::SpotifyLink { kind, id } => match kind.as_str() {
                "track" => Ok(ResolvedQuery::Track(self.resolve_track(&id, market).await?)),
                "artist" => Ok(ResolvedQuery::Artist(
                    self.resolve_artist(&id, market).await?,
                )),
                "album" => Ok(ResolvedQuery::Album(self.resolve_album(&id, market).await?)),
                "playlist" => Ok(ResolvedQuery::Playlist(
                    self.resolve_playlist(&id, market).await?,
                )),
                // the regex alternation and this match must stay in sync
                other => Err(TuneLinkError::Internal(format!(
                    "unsupported spotify link type: {other}"
                ))),
            },
            QueryKind::YouTubeVideo { id } => {
                Ok(ResolvedQuery::Video(self.resolve_video(&id).await?))
            }
            QueryKind::YouTubePlaylist { id } => Ok(ResolvedQuery::VideoPlaylist(
                self.resolve_video_playlist(&id).await?,
            )),
            QueryKind::FreeText => {
                if let Some(spotify) = &self.spotify {
                    let results = spotify.search(query, market).await?;
                    Ok(ResolvedQuery::Search(results))
                } else if self.youtube.is_some() {
                    Ok(ResolvedQuery::Video(self.resolve_video(query).await?))
                } else {
                    Err(TuneLinkError::MissingCredentials(
                        "either a Spotify client id/secret pair or a YouTube API key is required"
                            .to_string(),
                    ))
                }
            }
        }
    }

    /// List the market codes Spotify serves
    pub async fn get_available_markets(&self) -> Result<Vec<String>> {
        self.spotify_client()?.get_available_markets().await
    }

    fn spotify_client(&self) -> Result<&SpotifyClient> {
        self.spotify.as_ref().ok_or_else(|| {
            TuneLinkError::MissingCredentials(
                "Spotify client id and secret are not configured".to_string(),
            )
        })
    }

    fn youtube_client(&self) -> Result<&YouTubeClient> {
        self.youtube.as_ref().ok_or_else(|| {
            TuneLinkError::MissingCredentials("YouTube API key is not configured".to_string())
        })
    }

    fn emit_debug(&self, tag: &str, message: &str) {
        debug!(tag, "{message}");
        if let Some(observer) = &self.observer {
            observer.on_debug(tag, message);
        }
    }

    async fn resolve_track(&self, id: &str, market: &str) -> Result<TrackSummary> {
        let track = self.spotify_client()?.get_track(id, market).await?;
        Ok(track_summary(track))
    }

    async fn resolve_artist(&self, id: &str, market: &str) -> Result<ArtistSummary> {
        let spotify = self.spotify_client()?;
        let artist = spotify.get_artist(id).await?;
        let top_tracks = spotify.get_artist_top_tracks(id, market).await?;

        Ok(ArtistSummary {
            id: artist.id,
            name: artist.name,
            images: artist.images,
            url: artist.external_urls.spotify,
            tracks: top_tracks
                .into_iter()
                .map(|track| ArtistTopTrack {
                    id: track.id,
                    name: track.name,
                    artists: join_artist_names(&track.artists),
                    images: track.album.images,
                    duration_ms: track.duration_ms,
                    url: track.external_urls.spotify,
                })
                .collect(),
        })
    }

    async fn resolve_album(&self, id: &str, market: &str) -> Result<AlbumSummary> {
        let album = self.spotify_client()?.get_album(id, market).await?;

        Ok(AlbumSummary {
            id: album.id,
            name: album.name,
            images: album.images,
            url: album.external_urls.spotify,
            tracks: album
                .tracks
                .items
                .into_iter()
                .map(|track| AlbumTrack {
                    id: track.id,
                    name: track.name,
                    // nested artist objects are kept here, unlike top tracks
                    artists: track.artists,
                    duration_ms: track.duration_ms,
                    url: track.external_urls.spotify,
                })
                .collect(),
        })
    }

    async fn resolve_playlist(&self, id: &str, market: &str) -> Result<PlaylistSummary> {
        let spotify = self.spotify_client()?;
        let playlist = spotify.get_playlist(id, market).await?;
        let items = spotify.get_playlist_tracks(id, market).await?;
        self.emit_debug("playlist", &format!("{id}: {} items", items.len()));

        Ok(PlaylistSummary {
            id: playlist.id,
            name: playlist.name,
            owner: PlaylistOwner {
                id: playlist.owner.id,
                name: playlist.owner.display_name,
                url: playlist.owner.external_urls.spotify,
            },
            images: playlist.images,
            url: playlist.external_urls.spotify,
            tracks: items
                .into_iter()
                // null tracks are deleted or unavailable entries
                .filter_map(|item| item.track)
                .map(track_summary)
                .collect(),
        })
    }

    async fn resolve_video(&self, query: &str) -> Result<VideoSummary> {
        let items = self.youtube_client()?.search(query, "video", 1).await?;
        let item = items
            .into_iter()
            .next()
            .ok_or_else(|| TuneLinkError::Schema {
                service: "youtube",
                detail: format!("no video match for {query}"),
            })?;
        Ok(video_summary(item))
    }

    async fn resolve_video_playlist(&self, id: &str) -> Result<VideoPlaylistSummary> {
        let youtube = self.youtube_client()?;
        let playlist = youtube.get_playlist(id).await?;
        let items = youtube.get_playlist_items(id).await?;
        self.emit_debug("video_playlist", &format!("{id}: {} items", items.len()));

        Ok(VideoPlaylistSummary {
            id: playlist.id,
            name: playlist.snippet.title,
            author: playlist.snippet.channel_title,
            images: playlist.snippet.thumbnails.all(),
            item_count: playlist
                .content_details
                .map(|d| d.item_count)
                .unwrap_or(items.len() as u64),
            tracks: items
                .into_iter()
                .filter_map(|item| {
                    let video_id = item.snippet.resource_id.video_id?;
                    let thumbnail = item.snippet.thumbnails.best()?;
                    Some(VideoSummary {
                        url: format!("https://www.youtube.com/watch?v={video_id}"),
                        id: video_id,
                        name: item.snippet.title,
                        channel: item.snippet.channel_title,
                        thumbnail: thumbnail.into(),
                    })
                })
                .collect(),
        })
    }
}

fn join_artist_names(artists: &[spotify::SimplifiedArtist]) -> String {
    artists
        .iter()
        .map(|artist| artist.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn track_summary(track: TrackObject) -> TrackSummary {
    TrackSummary {
        id: track.id,
        name: track.name,
        artists: track.artists,
        images: track.album.images,
        duration_ms: track.duration_ms,
        url: track.external_urls.spotify,
    }
}

fn video_summary(item: SearchItem) -> VideoSummary {
    let id = item
        .id
        .video_id
        .or(item.id.playlist_id)
        .unwrap_or_default();
    let thumbnail = item
        .snippet
        .thumbnails
        .best()
        .map(Image::from)
        .unwrap_or(Image {
            url: String::new(),
            width: None,
            height: None,
        });
    VideoSummary {
        url: format!("https://www.youtube.com/watch?v={id}"),
        id,
        name: item.snippet.title,
        channel: item.snippet.channel_title,
        thumbnail,
    }
}
