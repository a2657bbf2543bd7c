use crate::resolver::spotify::{
    ArtistObject, Page, SimplifiedAlbum, SimplifiedArtist, SimplifiedPlaylist, TrackObject,
};
use serde::{Deserialize, Serialize};

/// An image or thumbnail. Spotify omits dimensions for some covers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// The outcome of resolving a query string.
///
/// Exactly one variant is produced per resolution; the tag decides which
/// payload shape is valid. Serializes as `{"loadType": ..., "data": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "loadType", content = "data", rename_all = "snake_case")]
pub enum ResolvedQuery {
    Search(SearchResults),
    Track(TrackSummary),
    Artist(ArtistSummary),
    Album(AlbumSummary),
    Playlist(PlaylistSummary),
    Video(VideoSummary),
    VideoPlaylist(VideoPlaylistSummary),
}

/// Combined free-text search result. Audiobooks, episodes and shows are not
/// modeled, so they are dropped even when the upstream returns them.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchResults {
    pub tracks: Option<Page<TrackObject>>,
    pub artists: Option<Page<ArtistObject>>,
    pub albums: Option<Page<SimplifiedAlbum>>,
    pub playlists: Option<Page<SimplifiedPlaylist>>,
}

/// A single track, flattened from the upstream track object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackSummary {
    pub id: String,
    pub name: String,
    pub artists: Vec<SimplifiedArtist>,
    /// Album art of the track's parent album
    pub images: Vec<Image>,
    pub duration_ms: u64,
    pub url: String,
}

/// A top track of an artist. Artist names are joined into one comma-separated
/// string for display convenience, unlike [`AlbumTrack`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistTopTrack {
    pub id: String,
    pub name: String,
    pub artists: String,
    pub images: Vec<Image>,
    pub duration_ms: u64,
    pub url: String,
}

/// An artist profile together with their top tracks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistSummary {
    pub id: String,
    pub name: String,
    pub images: Vec<Image>,
    pub url: String,
    pub tracks: Vec<ArtistTopTrack>,
}

/// A track inside an album. Keeps the nested upstream artist objects, an
/// intentional asymmetry with [`ArtistTopTrack`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumTrack {
    pub id: String,
    pub name: String,
    pub artists: Vec<SimplifiedArtist>,
    pub duration_ms: u64,
    pub url: String,
}

/// An album with its track list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumSummary {
    pub id: String,
    pub name: String,
    pub images: Vec<Image>,
    pub url: String,
    pub tracks: Vec<AlbumTrack>,
}

/// The owner of a playlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
    pub name: Option<String>,
    pub url: String,
}

/// A playlist with its fully accumulated track list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub owner: PlaylistOwner,
    pub images: Vec<Image>,
    pub url: String,
    pub tracks: Vec<TrackSummary>,
}

/// A single video
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSummary {
    pub id: String,
    pub name: String,
    pub channel: String,
    pub thumbnail: Image,
    pub url: String,
}

/// A video playlist with its fully accumulated items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoPlaylistSummary {
    pub id: String,
    pub name: String,
    pub author: String,
    pub images: Vec<Image>,
    pub item_count: u64,
    pub tracks: Vec<VideoSummary>,
}
