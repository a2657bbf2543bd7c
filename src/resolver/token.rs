use crate::config::SpotifyCredentials;
use crate::errors::{Result, TuneLinkError};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// A bearer token together with its expiry deadline. Replaced wholesale on
/// refresh, never mutated in place.
#[derive(Debug, Clone)]
struct AccessToken {
    token: String,
    expires_at: Instant,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

/// Acquires and caches a Spotify bearer token via client-credentials exchange.
///
/// The cache is read-check-then-write: concurrent callers racing past an
/// expired token may each trigger an exchange. Exchanges are idempotent and
/// the last writer wins, so no single-flight guard is used. The lock is never
/// held across an await.
pub struct TokenProvider {
    client: Client,
    credentials: SpotifyCredentials,
    token_url: String,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenProvider {
    pub fn new(client: Client, credentials: SpotifyCredentials) -> Self {
        Self::with_token_url(client, credentials, TOKEN_URL)
    }

    /// Create a provider against a custom token endpoint
    pub fn with_token_url(
        client: Client,
        credentials: SpotifyCredentials,
        token_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            credentials,
            token_url: token_url.into(),
            cached: Mutex::new(None),
        }
    }

    /// Return a valid bearer token, exchanging credentials if the cached one
    /// is absent or expired
    pub async fn get_token(&self) -> Result<String> {
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }

        let response = self
            .client
            .post(&self.token_url)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TuneLinkError::Auth(format!(
                "token endpoint returned HTTP {}",
                status.as_u16()
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| TuneLinkError::Auth(format!("malformed token response: {e}")))?;

        let token = AccessToken {
            token: body.access_token,
            expires_at: Instant::now() + Duration::from_secs(body.expires_in),
        };
        let value = token.token.clone();
        *self.cached.lock().expect("token cache poisoned") = Some(token);

        Ok(value)
    }

    fn cached_token(&self) -> Option<String> {
        let guard = self.cached.lock().expect("token cache poisoned");
        guard
            .as_ref()
            .filter(|token| Instant::now() < token.expires_at)
            .map(|token| token.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> SpotifyCredentials {
        SpotifyCredentials {
            client_id: "id".into(),
            client_secret: "secret".into(),
        }
    }

    #[tokio::test]
    async fn reuses_cached_token_within_validity_window() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/token")
            .match_header("authorization", mockito::Matcher::Regex("Basic .+".into()))
            .match_body("grant_type=client_credentials")
            .with_status(200)
            .with_body(r#"{"access_token":"tok-1","expires_in":3600,"token_type":"Bearer"}"#)
            .expect(1)
            .create_async()
            .await;

        let provider = TokenProvider::with_token_url(
            Client::new(),
            credentials(),
            format!("{}/token", server.url()),
        );

        assert_eq!(provider.get_token().await.unwrap(), "tok-1");
        assert_eq!(provider.get_token().await.unwrap(), "tok-1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn refreshes_after_expiry() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/token")
            .with_status(200)
            .with_body(r#"{"access_token":"tok","expires_in":0,"token_type":"Bearer"}"#)
            .expect(2)
            .create_async()
            .await;

        let provider = TokenProvider::with_token_url(
            Client::new(),
            credentials(),
            format!("{}/token", server.url()),
        );

        provider.get_token().await.unwrap();
        // expires_in of zero means the cached token is already stale
        provider.get_token().await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_an_auth_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/token")
            .with_status(400)
            .with_body(r#"{"error":"invalid_client"}"#)
            .create_async()
            .await;

        let provider = TokenProvider::with_token_url(
            Client::new(),
            credentials(),
            format!("{}/token", server.url()),
        );

        let err = provider.get_token().await.unwrap_err();
        assert!(matches!(err, TuneLinkError::Auth(_)), "got {err:?}");
    }
}
