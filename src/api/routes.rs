//! API Routes
//!
//! Configures the Axum router with all serve-mode endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_clear_handler, cache_invalidate_handler, cache_stats_handler, create_contact_handler,
    create_invoice_handler, create_payment_handler, create_quote_handler, get_contact_handler,
    get_invoice_handler, health_handler, list_contacts_handler, list_invoices_handler,
    list_payments_handler, list_quotes_handler, report_handler, update_contact_handler,
    update_invoice_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route(
            "/contacts",
            get(list_contacts_handler).post(create_contact_handler),
        )
        .route(
            "/contacts/:id",
            get(get_contact_handler).post(update_contact_handler),
        )
        .route(
            "/invoices",
            get(list_invoices_handler).post(create_invoice_handler),
        )
        .route(
            "/invoices/:id",
            get(get_invoice_handler).post(update_invoice_handler),
        )
        .route(
            "/payments",
            get(list_payments_handler).post(create_payment_handler),
        )
        .route("/quotes", get(list_quotes_handler).post(create_quote_handler))
        .route("/reports/:report", get(report_handler))
        .route("/cache/stats", get(cache_stats_handler))
        .route("/cache", delete(cache_clear_handler))
        .route("/cache/:key", delete(cache_invalidate_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
