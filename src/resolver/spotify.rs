use crate::config::SpotifyCredentials;
use crate::errors::{Result, TuneLinkError};
use crate::models::Image;
use crate::resolver::token::TokenProvider;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

const API_BASE: &str = "https://api.spotify.com/v1";

/// Playlist track pages are fetched 100 at a time; a short page ends the loop.
const PLAYLIST_PAGE_SIZE: usize = 100;

/// Combined free-text searches ask for a single page of 25 results.
const SEARCH_LIMIT: &str = "25";

/// An offset/limit page as returned by Spotify list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub limit: u32,
    pub offset: u32,
    pub total: u32,
    pub next: Option<String>,
    pub previous: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: String,
}

/// Artist reference as nested inside tracks and albums
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifiedArtist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default)]
    pub uri: String,
}

/// Album reference as nested inside a track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

/// A full track object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackObject {
    pub id: String,
    pub name: String,
    pub artists: Vec<SimplifiedArtist>,
    pub album: AlbumRef,
    pub duration_ms: u64,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

/// A full artist object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistObject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

/// A track as listed inside an album (no album nesting of its own)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifiedTrack {
    pub id: String,
    pub name: String,
    pub artists: Vec<SimplifiedArtist>,
    pub duration_ms: u64,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

/// An album as returned by the album endpoint or a search page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifiedAlbum {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default)]
    pub artists: Vec<SimplifiedArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    pub tracks: Page<SimplifiedTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserObject {
    pub id: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

/// A playlist as returned by a search page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifiedPlaylist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    pub owner: UserObject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    pub owner: UserObject,
}

/// One entry of a playlist track page. `track` is null for entries that were
/// deleted or are unavailable in the requested market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<TrackObject>,
}

#[derive(Debug, Deserialize)]
struct TopTracksResponse {
    tracks: Vec<TrackObject>,
}

#[derive(Debug, Deserialize)]
struct MarketsResponse {
    markets: Vec<String>,
}

/// Spotify Web API client
pub struct SpotifyClient {
    client: Client,
    base_url: String,
    token: TokenProvider,
}

impl SpotifyClient {
    pub fn new(credentials: SpotifyCredentials) -> Self {
        let client = Client::new();
        let token = TokenProvider::new(client.clone(), credentials);
        Self {
            client,
            base_url: API_BASE.to_string(),
            token,
        }
    }

    /// Create a client against custom API and token endpoints
    pub fn with_base_urls(
        credentials: SpotifyCredentials,
        api_base: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Self {
        let client = Client::new();
        let token = TokenProvider::with_token_url(client.clone(), credentials, token_url);
        Self {
            client,
            base_url: api_base.into(),
            token,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let token = self.token.get_token().await?;
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "spotify request");

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TuneLinkError::Upstream {
                service: "spotify",
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| TuneLinkError::Schema {
            service: "spotify",
            detail: e.to_string(),
        })
    }

    pub async fn get_track(&self, id: &str, market: &str) -> Result<TrackObject> {
        self.get_json(&format!("/tracks/{id}"), &[("market", market)])
            .await
    }

    pub async fn get_artist(&self, id: &str) -> Result<ArtistObject> {
        self.get_json(&format!("/artists/{id}"), &[]).await
    }

    pub async fn get_artist_top_tracks(&self, id: &str, market: &str) -> Result<Vec<TrackObject>> {
        let response: TopTracksResponse = self
            .get_json(&format!("/artists/{id}/top-tracks"), &[("market", market)])
            .await?;
        Ok(response.tracks)
    }

    pub async fn get_album(&self, id: &str, market: &str) -> Result<AlbumResponse> {
        self.get_json(&format!("/albums/{id}"), &[("market", market)])
            .await
    }

    pub async fn get_playlist(&self, id: &str, market: &str) -> Result<PlaylistResponse> {
        self.get_json(&format!("/playlists/{id}"), &[("market", market)])
            .await
    }

    /// Fetch every track page of a playlist.
    ///
    /// Pages are requested sequentially, 100 at a time; a page shorter than
    /// the page size is the last one. A failed page fetch aborts the whole
    /// operation rather than returning a truncated list.
    pub async fn get_playlist_tracks(&self, id: &str, market: &str) -> Result<Vec<PlaylistItem>> {
        let mut all_items = Vec::new();
        let mut offset = 0usize;

        loop {
            let page: Page<PlaylistItem> = self
                .get_json(
                    &format!("/playlists/{id}/tracks"),
                    &[
                        ("market", market),
                        ("limit", &PLAYLIST_PAGE_SIZE.to_string()),
                        ("offset", &offset.to_string()),
                    ],
                )
                .await?;

            let count = page.items.len();
            all_items.extend(page.items);

            if count < PLAYLIST_PAGE_SIZE {
                break;
            }
            offset += PLAYLIST_PAGE_SIZE;
        }

        Ok(all_items)
    }

    /// Combined search across tracks, artists, albums and playlists.
    /// One page of 25 results, no further pagination.
    pub async fn search(&self, query: &str, market: &str) -> Result<crate::models::SearchResults> {
        self.get_json(
            "/search",
            &[
                ("q", query),
                ("type", "track,artist,album,playlist"),
                ("market", market),
                ("limit", SEARCH_LIMIT),
                ("offset", "0"),
            ],
        )
        .await
    }

    /// List the market codes Spotify serves
    pub async fn get_available_markets(&self) -> Result<Vec<String>> {
        let response: MarketsResponse = self.get_json("/markets", &[]).await?;
        Ok(response.markets)
    }
}
