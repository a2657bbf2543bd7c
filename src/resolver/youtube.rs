use crate::errors::{Result, TuneLinkError};
use crate::models::Image;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Playlist item pages are fetched 50 at a time, the API maximum.
const PLAYLIST_ITEMS_PAGE_SIZE: &str = "50";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl From<Thumbnail> for Image {
    fn from(thumbnail: Thumbnail) -> Self {
        Image {
            url: thumbnail.url,
            width: thumbnail.width,
            height: thumbnail.height,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
}

impl Thumbnails {
    /// The best thumbnail available, largest first
    pub fn best(&self) -> Option<Thumbnail> {
        self.high
            .clone()
            .or_else(|| self.medium.clone())
            .or_else(|| self.default.clone())
    }

    /// Every available thumbnail, largest first
    pub fn all(&self) -> Vec<Image> {
        [&self.high, &self.medium, &self.default]
            .into_iter()
            .flatten()
            .cloned()
            .map(Image::from)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub title: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultId {
    pub video_id: Option<String>,
    pub playlist_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchItem {
    #[serde(default)]
    pub id: SearchResultId,
    pub snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistContentDetails {
    #[serde(default)]
    pub item_count: u64,
}

/// Metadata of one playlist as returned by the playlists endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistResource {
    pub id: String,
    pub snippet: Snippet,
    pub content_details: Option<PlaylistContentDetails>,
}

#[derive(Debug, Deserialize)]
struct PlaylistListResponse {
    #[serde(default)]
    items: Vec<PlaylistResource>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    pub title: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
    #[serde(default)]
    pub resource_id: ResourceId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItemResource {
    pub snippet: PlaylistItemSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemsResponse {
    #[serde(default)]
    items: Vec<PlaylistItemResource>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    errors: Vec<ApiErrorItem>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorItem {
    reason: Option<String>,
}

/// YouTube Data API v3 client
pub struct YouTubeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, API_BASE)
    }

    /// Create a client against a custom API endpoint
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "youtube request");

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::FORBIDDEN {
            let retry_after_secs = response
                .headers()
                .get("retry-after")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse().ok());
            let body = response.text().await.unwrap_or_default();

            if is_rate_limited(&body) {
                return Err(TuneLinkError::RateLimited { retry_after_secs });
            }
            return Err(TuneLinkError::Upstream {
                service: "youtube",
                status: 403,
            });
        }
        if !status.is_success() {
            return Err(TuneLinkError::Upstream {
                service: "youtube",
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| TuneLinkError::Schema {
            service: "youtube",
            detail: e.to_string(),
        })
    }

    /// Search for videos or playlists, by free text or to resolve a known id
    pub async fn search(
        &self,
        query: &str,
        kind: &str,
        max_results: u32,
    ) -> Result<Vec<SearchItem>> {
        let response: SearchListResponse = self
            .get_json(
                "/search",
                &[
                    ("q", query),
                    ("part", "snippet"),
                    ("maxResults", &max_results.to_string()),
                    ("type", kind),
                ],
            )
            .await?;
        Ok(response.items)
    }

    /// One-shot playlist metadata lookup
    pub async fn get_playlist(&self, id: &str) -> Result<PlaylistResource> {
        let response: PlaylistListResponse = self
            .get_json(
                "/playlists",
                &[("part", "snippet,contentDetails"), ("id", id)],
            )
            .await?;

        response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| TuneLinkError::Schema {
                service: "youtube",
                detail: format!("playlist {id} not found"),
            })
    }

    /// Fetch every item of a playlist.
    ///
    /// Pages are requested sequentially via the upstream page token; the loop
    /// ends when no further token is returned. A failed page fetch aborts the
    /// whole operation rather than returning a truncated list.
    pub async fn get_playlist_items(&self, id: &str) -> Result<Vec<PlaylistItemResource>> {
        let mut all_items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![
                ("part", "snippet".to_string()),
                ("maxResults", PLAYLIST_ITEMS_PAGE_SIZE.to_string()),
                ("playlistId", id.to_string()),
            ];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }
            let query: Vec<(&str, &str)> =
                query.iter().map(|(k, v)| (*k, v.as_str())).collect();

            let page: PlaylistItemsResponse = self.get_json("/playlistItems", &query).await?;
            all_items.extend(page.items);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(all_items)
    }
}

fn is_rate_limited(body: &str) -> bool {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|parsed| {
            parsed
                .error
                .errors
                .iter()
                .any(|e| e.reason.as_deref() == Some("rateLimitExceeded"))
        })
        .unwrap_or(false)
}
