//! Configuration Module
//!
//! Handles loading and managing configuration from environment variables.

use std::env;

use crate::error::{Result, XeroError};

/// Runtime configuration.
///
/// All values can be configured via environment variables with sensible
/// defaults; credentials have no default and are required for any command
/// that talks to Xero.
#[derive(Debug, Clone)]
pub struct Config {
    /// OAuth2 client id (client-credentials grant)
    pub client_id: Option<String>,
    /// OAuth2 client secret
    pub client_secret: Option<String>,
    /// Tenant to act on; resolved via the connections endpoint when unset
    pub tenant_id: Option<String>,
    /// Default cache TTL in seconds for entries without explicit TTL
    pub default_cache_ttl: u64,
    /// HTTP server port (serve mode)
    pub server_port: u16,
    /// Background cache sweep interval in seconds (serve mode)
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `XERO_CLIENT_ID` - OAuth2 client id (no default)
    /// - `XERO_CLIENT_SECRET` - OAuth2 client secret (no default)
    /// - `XERO_TENANT_ID` - Tenant id (default: resolved at startup)
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        Self {
            client_id: env::var("XERO_CLIENT_ID").ok().filter(|v| !v.is_empty()),
            client_secret: env::var("XERO_CLIENT_SECRET").ok().filter(|v| !v.is_empty()),
            tenant_id: env::var("XERO_TENANT_ID").ok().filter(|v| !v.is_empty()),
            default_cache_ttl: env::var("CACHE_DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }

    /// Returns the client credentials, failing when either is absent.
    pub fn credentials(&self) -> Result<(String, String)> {
        let id = self.client_id.clone().ok_or_else(|| {
            XeroError::MissingConfig("XERO_CLIENT_ID is not set".to_string())
        })?;
        let secret = self.client_secret.clone().ok_or_else(|| {
            XeroError::MissingConfig("XERO_CLIENT_SECRET is not set".to_string())
        })?;
        Ok((id, secret))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            tenant_id: None,
            default_cache_ttl: 300,
            server_port: 3000,
            cleanup_interval: 60,
        }
    }
}
