//! API Module
//!
//! HTTP handlers and routing for serve mode: the same operations the CLI
//! exposes, reachable by a calling agent over HTTP.
//!
//! # Endpoints
//! - `GET /contacts`, `POST /contacts`, `GET|POST /contacts/:id`
//! - `GET /invoices`, `POST /invoices`, `GET|POST /invoices/:id`
//! - `GET /payments`, `POST /payments`
//! - `GET /quotes`, `POST /quotes`
//! - `GET /reports/:report`
//! - `GET /cache/stats`, `DELETE /cache`, `DELETE /cache/:key`
//! - `GET /health`

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
