//! Service Module
//!
//! The operation layer between the surfaces (CLI, serve mode) and the wire:
//! every read goes through the cache's `get_or_fetch` keyed by the operation
//! name and its normalized parameters; every write calls the API directly and
//! evicts the key families it made stale.

use serde::Deserialize;
use tracing::debug;

use crate::cache::{cache_key, Cache, CacheStats, FetchOptions, TTL_FIVE_MINUTES, TTL_ONE_HOUR};
use crate::error::{Result, XeroError};
use crate::models::{
    Contact, ContactsResponse, Invoice, InvoicesResponse, Payment, PaymentsResponse, Quote,
    QuotesResponse, Report, ReportKind, ReportsResponse,
};
use crate::xero::XeroClient;

// == List Parameters ==
/// Filters for contact listing. Field names follow the Xero query
/// parameters so serve mode can deserialize them straight off the URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListContactsParams {
    #[serde(rename = "where")]
    pub where_filter: Option<String>,
    pub order: Option<String>,
    pub page: Option<u32>,
    #[serde(rename = "searchTerm")]
    pub search_term: Option<String>,
}

/// Filters for invoice listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListInvoicesParams {
    #[serde(rename = "where")]
    pub where_filter: Option<String>,
    pub order: Option<String>,
    pub page: Option<u32>,
    /// Comma-separated status filter, e.g. "DRAFT,AUTHORISED"
    pub statuses: Option<String>,
}

/// Filters for payment and quote listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    #[serde(rename = "where")]
    pub where_filter: Option<String>,
    pub order: Option<String>,
    pub page: Option<u32>,
}

/// Date parameters for report fetches.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportParams {
    pub date: Option<String>,
    #[serde(rename = "fromDate")]
    pub from_date: Option<String>,
    #[serde(rename = "toDate")]
    pub to_date: Option<String>,
    pub periods: Option<u32>,
    pub timeframe: Option<String>,
}

// == Helpers ==
/// Drops unset parameters, yielding the pairs actually sent on the wire.
fn to_query<'a>(pairs: &'a [(&'a str, Option<String>)]) -> Vec<(&'a str, String)> {
    pairs
        .iter()
        .filter_map(|(name, value)| value.clone().map(|v| (*name, v)))
        .collect()
}

/// Unwraps the single entity Xero returns inside its list envelope.
fn first<T>(items: Vec<T>, what: &str) -> Result<T> {
    items.into_iter().next().ok_or_else(|| {
        XeroError::Internal(format!("Xero returned an empty {} response", what))
    })
}

// == Xero Service ==
/// Cached operations over the Xero accounting API.
///
/// Cheap to clone; clones share the HTTP client and the cache.
#[derive(Debug, Clone)]
pub struct XeroService {
    client: XeroClient,
    cache: Cache,
}

impl XeroService {
    // == Constructor ==
    pub fn new(client: XeroClient, cache: Cache) -> Self {
        Self { client, cache }
    }

    /// The cache backing this service (for the cleanup task and admin ops).
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    // == Contacts ==
    pub async fn list_contacts(
        &self,
        params: &ListContactsParams,
        bypass_cache: bool,
    ) -> Result<Vec<Contact>> {
        let pairs = [
            ("order", params.order.clone()),
            ("page", params.page.map(|p| p.to_string())),
            ("searchTerm", params.search_term.clone()),
            ("where", params.where_filter.clone()),
        ];
        let key = cache_key("contacts:list", &pairs);

        self.cache
            .get_or_fetch(
                &key,
                || async {
                    let resp: ContactsResponse =
                        self.client.get("Contacts", &to_query(&pairs)).await?;
                    Ok(resp.contacts)
                },
                FetchOptions::ttl(TTL_FIVE_MINUTES).with_bypass(bypass_cache),
            )
            .await
    }

    pub async fn get_contact(&self, contact_id: &str, bypass_cache: bool) -> Result<Contact> {
        let key = cache_key("contacts:get", &[("id", Some(contact_id.to_string()))]);
        let path = format!("Contacts/{}", contact_id);

        self.cache
            .get_or_fetch(
                &key,
                || async {
                    let resp: ContactsResponse = self.client.get(&path, &[]).await?;
                    first(resp.contacts, "contact")
                },
                FetchOptions::ttl(TTL_FIVE_MINUTES).with_bypass(bypass_cache),
            )
            .await
    }

    pub async fn create_contact(&self, contact: Contact) -> Result<Contact> {
        let body = ContactsResponse {
            contacts: vec![contact],
        };
        let resp: ContactsResponse = self.client.post("Contacts", &body).await?;
        let created = first(resp.contacts, "contact")?;

        self.evict("contacts").await;
        Ok(created)
    }

    pub async fn update_contact(&self, contact_id: &str, contact: Contact) -> Result<Contact> {
        let body = ContactsResponse {
            contacts: vec![contact],
        };
        let path = format!("Contacts/{}", contact_id);
        let resp: ContactsResponse = self.client.post(&path, &body).await?;
        let updated = first(resp.contacts, "contact")?;

        self.evict("contacts").await;
        Ok(updated)
    }

    // == Invoices ==
    pub async fn list_invoices(
        &self,
        params: &ListInvoicesParams,
        bypass_cache: bool,
    ) -> Result<Vec<Invoice>> {
        let pairs = [
            ("order", params.order.clone()),
            ("page", params.page.map(|p| p.to_string())),
            ("statuses", params.statuses.clone()),
            ("where", params.where_filter.clone()),
        ];
        let key = cache_key("invoices:list", &pairs);

        self.cache
            .get_or_fetch(
                &key,
                || async {
                    let resp: InvoicesResponse =
                        self.client.get("Invoices", &to_query(&pairs)).await?;
                    Ok(resp.invoices)
                },
                FetchOptions::ttl(TTL_FIVE_MINUTES).with_bypass(bypass_cache),
            )
            .await
    }

    pub async fn get_invoice(&self, invoice_id: &str, bypass_cache: bool) -> Result<Invoice> {
        let key = cache_key("invoices:get", &[("id", Some(invoice_id.to_string()))]);
        let path = format!("Invoices/{}", invoice_id);

        self.cache
            .get_or_fetch(
                &key,
                || async {
                    let resp: InvoicesResponse = self.client.get(&path, &[]).await?;
                    first(resp.invoices, "invoice")
                },
                FetchOptions::ttl(TTL_FIVE_MINUTES).with_bypass(bypass_cache),
            )
            .await
    }

    pub async fn create_invoice(&self, invoice: Invoice) -> Result<Invoice> {
        let body = InvoicesResponse {
            invoices: vec![invoice],
        };
        let resp: InvoicesResponse = self.client.post("Invoices", &body).await?;
        let created = first(resp.invoices, "invoice")?;

        self.evict("invoices").await;
        Ok(created)
    }

    pub async fn update_invoice(&self, invoice_id: &str, invoice: Invoice) -> Result<Invoice> {
        let body = InvoicesResponse {
            invoices: vec![invoice],
        };
        let path = format!("Invoices/{}", invoice_id);
        let resp: InvoicesResponse = self.client.post(&path, &body).await?;
        let updated = first(resp.invoices, "invoice")?;

        self.evict("invoices").await;
        Ok(updated)
    }

    // == Payments ==
    pub async fn list_payments(
        &self,
        params: &ListParams,
        bypass_cache: bool,
    ) -> Result<Vec<Payment>> {
        let pairs = [
            ("order", params.order.clone()),
            ("page", params.page.map(|p| p.to_string())),
            ("where", params.where_filter.clone()),
        ];
        let key = cache_key("payments:list", &pairs);

        self.cache
            .get_or_fetch(
                &key,
                || async {
                    let resp: PaymentsResponse =
                        self.client.get("Payments", &to_query(&pairs)).await?;
                    Ok(resp.payments)
                },
                FetchOptions::ttl(TTL_FIVE_MINUTES).with_bypass(bypass_cache),
            )
            .await
    }

    pub async fn create_payment(&self, payment: Payment) -> Result<Payment> {
        let body = PaymentsResponse {
            payments: vec![payment],
        };
        let resp: PaymentsResponse = self.client.put("Payments", &body).await?;
        let created = first(resp.payments, "payment")?;

        // A payment changes the balance of the invoice it pays
        self.evict("payments").await;
        self.evict("invoices").await;
        Ok(created)
    }

    // == Quotes ==
    pub async fn list_quotes(&self, params: &ListParams, bypass_cache: bool) -> Result<Vec<Quote>> {
        let pairs = [
            ("order", params.order.clone()),
            ("page", params.page.map(|p| p.to_string())),
            ("where", params.where_filter.clone()),
        ];
        let key = cache_key("quotes:list", &pairs);

        self.cache
            .get_or_fetch(
                &key,
                || async {
                    let resp: QuotesResponse = self.client.get("Quotes", &to_query(&pairs)).await?;
                    Ok(resp.quotes)
                },
                FetchOptions::ttl(TTL_FIVE_MINUTES).with_bypass(bypass_cache),
            )
            .await
    }

    pub async fn create_quote(&self, quote: Quote) -> Result<Quote> {
        let body = QuotesResponse {
            quotes: vec![quote],
        };
        let resp: QuotesResponse = self.client.post("Quotes", &body).await?;
        let created = first(resp.quotes, "quote")?;

        self.evict("quotes").await;
        Ok(created)
    }

    // == Reports ==
    pub async fn get_report(
        &self,
        kind: ReportKind,
        params: &ReportParams,
        bypass_cache: bool,
    ) -> Result<Report> {
        let pairs = [
            ("date", params.date.clone()),
            ("fromDate", params.from_date.clone()),
            ("periods", params.periods.map(|p| p.to_string())),
            ("timeframe", params.timeframe.clone()),
            ("toDate", params.to_date.clone()),
        ];
        let operation = format!("reports:{}", kind.slug());
        let key = cache_key(&operation, &pairs);

        self.cache
            .get_or_fetch(
                &key,
                || async {
                    let resp: ReportsResponse =
                        self.client.get(kind.endpoint(), &to_query(&pairs)).await?;
                    first(resp.reports, "report")
                },
                FetchOptions::ttl(TTL_ONE_HOUR).with_bypass(bypass_cache),
            )
            .await
    }

    // == Cache Administration ==
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    pub async fn cache_clear(&self) -> usize {
        self.cache.clear().await
    }

    pub async fn cache_invalidate(&self, key: &str) -> bool {
        self.cache.invalidate(key).await
    }

    async fn evict(&self, prefix: &str) {
        let removed = self.cache.invalidate_prefix(prefix).await;
        debug!("evicted {} cached '{}' entries after write", removed, prefix);
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_query_drops_unset() {
        let pairs = [
            ("order", Some("Name".to_string())),
            ("page", None),
            ("where", Some("x==1".to_string())),
        ];
        let query = to_query(&pairs);
        assert_eq!(
            query,
            vec![("order", "Name".to_string()), ("where", "x==1".to_string())]
        );
    }

    #[test]
    fn test_first_on_empty_response() {
        let result = first(Vec::<Contact>::new(), "contact");
        assert!(matches!(result, Err(XeroError::Internal(_))));
    }

    #[test]
    fn test_list_keys_are_order_independent() {
        // The same filters must land on the same cache entry regardless of
        // which argument the caller filled in first
        let a = cache_key(
            "contacts:list",
            &[
                ("where", Some("Name==\"A\"".to_string())),
                ("page", None),
            ],
        );
        let b = cache_key(
            "contacts:list",
            &[
                ("page", None),
                ("where", Some("Name==\"A\"".to_string())),
            ],
        );
        assert_eq!(a, b);
    }
}
