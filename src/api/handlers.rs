//! API Handlers
//!
//! HTTP request handlers for each serve-mode endpoint. Read endpoints accept
//! a `no_cache=true` query flag that bypasses the cache for that request.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::time::Duration;

use crate::cache::Cache;
use crate::config::Config;
use crate::error::Result;
use crate::models::{
    ClearResponse, Contact, ContactsResponse, HealthResponse, InvalidateResponse, Invoice,
    InvoicesResponse, Payment, PaymentsResponse, Quote, QuotesResponse, Report, ReportKind,
    StatsResponse,
};
use crate::service::{
    ListContactsParams, ListInvoicesParams, ListParams, ReportParams, XeroService,
};
use crate::xero::XeroClient;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cached Xero operations
    pub service: XeroService,
}

impl AppState {
    /// Creates a new AppState around an existing service.
    pub fn new(service: XeroService) -> Self {
        Self { service }
    }

    /// Builds client, cache, and service from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = XeroClient::from_config(config)?;
        let cache = Cache::new("xero", Duration::from_secs(config.default_cache_ttl));
        Ok(Self::new(XeroService::new(client, cache)))
    }
}

/// Per-request cache bypass flag (`?no_cache=true`).
#[derive(Debug, Default, Deserialize)]
pub struct CacheControl {
    #[serde(default)]
    pub no_cache: bool,
}

// == Contacts ==
pub async fn list_contacts_handler(
    State(state): State<AppState>,
    Query(cache_ctl): Query<CacheControl>,
    Query(params): Query<ListContactsParams>,
) -> Result<Json<ContactsResponse>> {
    let contacts = state
        .service
        .list_contacts(&params, cache_ctl.no_cache)
        .await?;
    Ok(Json(ContactsResponse { contacts }))
}

pub async fn get_contact_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(cache_ctl): Query<CacheControl>,
) -> Result<Json<Contact>> {
    let contact = state.service.get_contact(&id, cache_ctl.no_cache).await?;
    Ok(Json(contact))
}

pub async fn create_contact_handler(
    State(state): State<AppState>,
    Json(contact): Json<Contact>,
) -> Result<Json<Contact>> {
    let created = state.service.create_contact(contact).await?;
    Ok(Json(created))
}

pub async fn update_contact_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(contact): Json<Contact>,
) -> Result<Json<Contact>> {
    let updated = state.service.update_contact(&id, contact).await?;
    Ok(Json(updated))
}

// == Invoices ==
pub async fn list_invoices_handler(
    State(state): State<AppState>,
    Query(cache_ctl): Query<CacheControl>,
    Query(params): Query<ListInvoicesParams>,
) -> Result<Json<InvoicesResponse>> {
    let invoices = state
        .service
        .list_invoices(&params, cache_ctl.no_cache)
        .await?;
    Ok(Json(InvoicesResponse { invoices }))
}

pub async fn get_invoice_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(cache_ctl): Query<CacheControl>,
) -> Result<Json<Invoice>> {
    let invoice = state.service.get_invoice(&id, cache_ctl.no_cache).await?;
    Ok(Json(invoice))
}

pub async fn create_invoice_handler(
    State(state): State<AppState>,
    Json(invoice): Json<Invoice>,
) -> Result<Json<Invoice>> {
    let created = state.service.create_invoice(invoice).await?;
    Ok(Json(created))
}

pub async fn update_invoice_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(invoice): Json<Invoice>,
) -> Result<Json<Invoice>> {
    let updated = state.service.update_invoice(&id, invoice).await?;
    Ok(Json(updated))
}

// == Payments ==
pub async fn list_payments_handler(
    State(state): State<AppState>,
    Query(cache_ctl): Query<CacheControl>,
    Query(params): Query<ListParams>,
) -> Result<Json<PaymentsResponse>> {
    let payments = state
        .service
        .list_payments(&params, cache_ctl.no_cache)
        .await?;
    Ok(Json(PaymentsResponse { payments }))
}

pub async fn create_payment_handler(
    State(state): State<AppState>,
    Json(payment): Json<Payment>,
) -> Result<Json<Payment>> {
    let created = state.service.create_payment(payment).await?;
    Ok(Json(created))
}

// == Quotes ==
pub async fn list_quotes_handler(
    State(state): State<AppState>,
    Query(cache_ctl): Query<CacheControl>,
    Query(params): Query<ListParams>,
) -> Result<Json<QuotesResponse>> {
    let quotes = state.service.list_quotes(&params, cache_ctl.no_cache).await?;
    Ok(Json(QuotesResponse { quotes }))
}

pub async fn create_quote_handler(
    State(state): State<AppState>,
    Json(quote): Json<Quote>,
) -> Result<Json<Quote>> {
    let created = state.service.create_quote(quote).await?;
    Ok(Json(created))
}

// == Reports ==
pub async fn report_handler(
    State(state): State<AppState>,
    Path(report): Path<String>,
    Query(cache_ctl): Query<CacheControl>,
    Query(params): Query<ReportParams>,
) -> Result<Json<Report>> {
    let kind: ReportKind = report.parse()?;
    let report = state
        .service
        .get_report(kind, &params, cache_ctl.no_cache)
        .await?;
    Ok(Json(report))
}

// == Cache Administration ==
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.service.cache_stats().await;
    Json(StatsResponse::from(stats))
}

pub async fn cache_clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let removed = state.service.cache_clear().await;
    Json(ClearResponse { removed })
}

pub async fn cache_invalidate_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<InvalidateResponse> {
    let removed = state.service.cache_invalidate(&key).await;
    Json(InvalidateResponse { key, removed })
}

// == Health ==
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
