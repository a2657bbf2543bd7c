use crate::errors::{Result, TuneLinkError};
use serde::{Deserialize, Serialize};

/// Audio formats supported by the yt-dlp invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AudioFormat {
    #[default]
    Best,
    Aac,
    Alac,
    Flac,
    M4a,
    Mp3,
    Opus,
    Vorbis,
    Wav,
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioFormat::Best => write!(f, "best"),
            AudioFormat::Aac => write!(f, "aac"),
            AudioFormat::Alac => write!(f, "alac"),
            AudioFormat::Flac => write!(f, "flac"),
            AudioFormat::M4a => write!(f, "m4a"),
            AudioFormat::Mp3 => write!(f, "mp3"),
            AudioFormat::Opus => write!(f, "opus"),
            AudioFormat::Vorbis => write!(f, "vorbis"),
            AudioFormat::Wav => write!(f, "wav"),
        }
    }
}

impl std::str::FromStr for AudioFormat {
    type Err = TuneLinkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "best" => Ok(AudioFormat::Best),
            "aac" => Ok(AudioFormat::Aac),
            "alac" => Ok(AudioFormat::Alac),
            "flac" => Ok(AudioFormat::Flac),
            "m4a" => Ok(AudioFormat::M4a),
            "mp3" => Ok(AudioFormat::Mp3),
            "opus" => Ok(AudioFormat::Opus),
            "vorbis" => Ok(AudioFormat::Vorbis),
            "wav" => Ok(AudioFormat::Wav),
            _ => Err(TuneLinkError::InvalidFormat(s.to_string())),
        }
    }
}

/// Spotify client-credentials pair. Both halves are required together.
#[derive(Debug, Clone)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Construction-time options for [`crate::TuneLink`].
///
/// Leaving a credential unset disables the matching classification branches
/// rather than failing at construction time.
#[derive(Debug, Clone, Default)]
pub struct TuneLinkOptions {
    /// Spotify client id (https://developer.spotify.com/dashboard)
    pub spotify_client_id: Option<String>,
    /// Spotify client secret (https://developer.spotify.com/dashboard)
    pub spotify_client_secret: Option<String>,
    /// YouTube Data API key (https://console.cloud.google.com/apis/credentials)
    pub youtube_api_key: Option<String>,
}

impl TuneLinkOptions {
    /// Spotify credentials, present only when both halves were supplied
    pub fn spotify_credentials(&self) -> Option<SpotifyCredentials> {
        match (&self.spotify_client_id, &self.spotify_client_secret) {
            (Some(id), Some(secret)) => Some(SpotifyCredentials {
                client_id: id.clone(),
                client_secret: secret.clone(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn audio_format_round_trips_through_str() {
        for format in [
            AudioFormat::Best,
            AudioFormat::Aac,
            AudioFormat::Alac,
            AudioFormat::Flac,
            AudioFormat::M4a,
            AudioFormat::Mp3,
            AudioFormat::Opus,
            AudioFormat::Vorbis,
            AudioFormat::Wav,
        ] {
            assert_eq!(AudioFormat::from_str(&format.to_string()).unwrap(), format);
        }
    }

    #[test]
    fn audio_format_rejects_unknown_names() {
        assert!(AudioFormat::from_str("ogg-vorbis").is_err());
    }

    #[test]
    fn credentials_require_both_halves() {
        let options = TuneLinkOptions {
            spotify_client_id: Some("id".into()),
            ..Default::default()
        };
        assert!(options.spotify_credentials().is_none());

        let options = TuneLinkOptions {
            spotify_client_id: Some("id".into()),
            spotify_client_secret: Some("secret".into()),
            ..Default::default()
        };
        assert!(options.spotify_credentials().is_some());
    }
}
