//! Xero API Module
//!
//! OAuth2 client-credentials token management and the authenticated HTTP
//! layer for the accounting API.

mod auth;
mod client;

pub use auth::TokenProvider;
pub use client::{XeroClient, API_BASE_URL, CONNECTIONS_URL};
