//! Domain models for the Xero accounting API
//!
//! Serde types mirroring the remote JSON schema (PascalCase fields, sparse
//! optional-heavy payloads), plus the response DTOs for serve mode.

pub mod contacts;
pub mod invoices;
pub mod payments;
pub mod quotes;
pub mod reports;
pub mod responses;

// Re-export commonly used types
pub use contacts::{Contact, ContactsResponse};
pub use invoices::{Invoice, InvoicesResponse, LineItem};
pub use payments::{Payment, PaymentAccountRef, PaymentInvoiceRef, PaymentsResponse};
pub use quotes::{Quote, QuotesResponse};
pub use reports::{Report, ReportKind, ReportsResponse};
pub use responses::{ClearResponse, HealthResponse, InvalidateResponse, StatsResponse};
