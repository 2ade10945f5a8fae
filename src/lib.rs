//! Xero CLI - command-line client and thin service wrapper for the Xero
//! accounting API
//!
//! Read operations go through a namespaced TTL cache to avoid redundant
//! network calls; write operations evict the key families they make stale.

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod tasks;
pub mod xero;

pub use api::AppState;
pub use cache::{Cache, FetchOptions};
pub use config::Config;
pub use service::XeroService;
pub use tasks::spawn_cleanup_task;
