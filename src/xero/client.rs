//! Xero HTTP Client
//!
//! Authenticated GET/POST/PUT against the accounting API. Every request
//! carries a bearer token, the tenant id header, and a JSON accept header;
//! non-success statuses are mapped onto the crate's error taxonomy.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, RETRY_AFTER};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::Config;
use crate::error::{Result, XeroError};
use crate::xero::auth::TokenProvider;

// == Constants ==
/// Accounting API base URL
pub const API_BASE_URL: &str = "https://api.xero.com/api.xro/2.0";

/// Connections endpoint used for tenant resolution
pub const CONNECTIONS_URL: &str = "https://api.xero.com/connections";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// == Connections Response ==
#[derive(Debug, Deserialize)]
struct Connection {
    #[serde(rename = "tenantId")]
    tenant_id: String,
}

// == Xero Client ==
/// HTTP client for the Xero accounting API.
///
/// Cheap to clone; clones share the token provider and the resolved tenant.
#[derive(Debug, Clone)]
pub struct XeroClient {
    http: reqwest::Client,
    tokens: TokenProvider,
    /// Resolved lazily from the connections endpoint when not configured
    tenant: Arc<RwLock<Option<String>>>,
    api_base: String,
    connections_url: String,
}

impl XeroClient {
    // == Constructor ==
    /// Builds a client from configuration. Fails fast when credentials are
    /// missing.
    pub fn from_config(config: &Config) -> Result<Self> {
        let (client_id, client_secret) = config.credentials()?;

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let tokens = TokenProvider::new(http.clone(), client_id, client_secret);

        Ok(Self {
            http,
            tokens,
            tenant: Arc::new(RwLock::new(config.tenant_id.clone())),
            api_base: API_BASE_URL.to_string(),
            connections_url: CONNECTIONS_URL.to_string(),
        })
    }

    /// Overrides all endpoint URLs, letting tests point at a local server.
    pub fn with_endpoints(
        mut self,
        api_base: impl Into<String>,
        connections_url: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Self {
        self.api_base = api_base.into();
        self.connections_url = connections_url.into();
        self.tokens = self.tokens.with_token_url(token_url);
        self
    }

    // == Tenant Resolution ==
    /// Returns the tenant id, resolving it from the connections endpoint on
    /// first use when not configured.
    pub async fn tenant_id(&self) -> Result<String> {
        if let Some(id) = self.tenant.read().await.clone() {
            return Ok(id);
        }

        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .get(&self.connections_url)
            .bearer_auth(&token)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_error(response).await);
        }

        let connections: Vec<Connection> = response.json().await?;
        let first = connections.into_iter().next().ok_or_else(|| {
            XeroError::AuthFailed("no Xero tenant connections for these credentials".to_string())
        })?;

        debug!("resolved tenant {}", first.tenant_id);
        *self.tenant.write().await = Some(first.tenant_id.clone());
        Ok(first.tenant_id)
    }

    // == Verbs ==
    /// Issues a GET and deserializes the JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let request = self.http.get(self.url(path)).query(query);
        self.send(request).await
    }

    /// Issues a POST with a JSON body.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.http.post(self.url(path)).json(body);
        self.send(request).await
    }

    /// Issues a PUT with a JSON body.
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.http.put(self.url(path)).json(body);
        self.send(request).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), path)
    }

    // == Send ==
    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let token = self.tokens.access_token().await?;
        let tenant = self.tenant_id().await?;

        let response = request
            .bearer_auth(&token)
            .header("Xero-Tenant-Id", tenant)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        debug!(%status, url = %response.url(), "xero api response");

        if status.is_success() {
            return Ok(response.json().await?);
        }

        Err(map_error(response).await)
    }
}

// == Error Mapping ==
/// Maps a non-success response onto the error taxonomy, pulling the message
/// out of Xero's error body when one is present.
async fn map_error(response: reqwest::Response) -> XeroError {
    let status = response.status();
    let path = response.url().path().to_string();

    match status {
        StatusCode::UNAUTHORIZED => {
            XeroError::Unauthorized(format!("access token rejected for {}", path))
        }
        StatusCode::NOT_FOUND => XeroError::NotFound(path),
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            XeroError::RateLimited { retry_after }
        }
        _ => {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| {
                    v.get("Message")
                        .or_else(|| v.get("Detail"))
                        .and_then(|m| m.as_str())
                        .map(String::from)
                })
                .unwrap_or_else(|| {
                    if body.is_empty() {
                        status.to_string()
                    } else {
                        body
                    }
                });
            XeroError::Api {
                status: status.as_u16(),
                message,
            }
        }
    }
}
