//! OAuth2 Token Management
//!
//! Fetches access tokens with the client-credentials grant and caches them in
//! memory, refreshing lazily once a token is within the refresh threshold of
//! its expiry.

use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::cache::current_timestamp_ms;
use crate::error::{Result, XeroError};

// == Constants ==
/// Xero identity token endpoint
pub const TOKEN_URL: &str = "https://identity.xero.com/connect/token";

/// Scopes requested with the client-credentials grant
const TOKEN_SCOPES: &str =
    "accounting.transactions accounting.contacts accounting.settings accounting.reports.read";

/// Refresh this many milliseconds before the token actually expires
const REFRESH_THRESHOLD_MS: u64 = 60_000;

// == Token Endpoint Response ==
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

// == Access Token ==
/// A bearer token with its absolute expiry.
#[derive(Debug, Clone)]
struct AccessToken {
    token: String,
    /// Expiry timestamp (Unix milliseconds)
    expires_at: u64,
}

impl AccessToken {
    /// True once the token is expired or within the refresh threshold.
    fn needs_refresh(&self) -> bool {
        current_timestamp_ms() + REFRESH_THRESHOLD_MS >= self.expires_at
    }
}

// == Token Provider ==
/// Thread-safe access-token source for the HTTP layer.
///
/// The current token lives behind an RwLock; callers get a clone of the
/// token string and never hold the lock across a request.
#[derive(Debug, Clone)]
pub struct TokenProvider {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    token_url: String,
    current: Arc<RwLock<Option<AccessToken>>>,
}

impl TokenProvider {
    // == Constructor ==
    pub fn new(http: reqwest::Client, client_id: String, client_secret: String) -> Self {
        Self {
            http,
            client_id,
            client_secret,
            token_url: TOKEN_URL.to_string(),
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// Overrides the token endpoint, letting tests point at a local server.
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    // == Access Token ==
    /// Returns a valid bearer token, fetching a fresh one when the cached
    /// token is absent or near expiry.
    pub async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.current.read().await.as_ref() {
            if !token.needs_refresh() {
                return Ok(token.token.clone());
            }
        }

        self.fetch_token().await
    }

    // == Fetch Token ==
    async fn fetch_token(&self) -> Result<String> {
        debug!("requesting access token from {}", self.token_url);

        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "client_credentials"),
                ("scope", TOKEN_SCOPES),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(XeroError::AuthFailed(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json().await?;
        info!("obtained access token, expires in {}s", token.expires_in);

        let access = AccessToken {
            token: token.access_token.clone(),
            expires_at: current_timestamp_ms() + token.expires_in * 1000,
        };
        *self.current.write().await = Some(access);

        Ok(token.access_token)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_token_does_not_need_refresh() {
        let token = AccessToken {
            token: "t".to_string(),
            expires_at: current_timestamp_ms() + 1_800_000,
        };
        assert!(!token.needs_refresh());
    }

    #[test]
    fn test_token_near_expiry_needs_refresh() {
        let token = AccessToken {
            token: "t".to_string(),
            expires_at: current_timestamp_ms() + REFRESH_THRESHOLD_MS / 2,
        };
        assert!(token.needs_refresh());
    }

    #[test]
    fn test_expired_token_needs_refresh() {
        let token = AccessToken {
            token: "t".to_string(),
            expires_at: current_timestamp_ms().saturating_sub(1),
        };
        assert!(token.needs_refresh());
    }
}
