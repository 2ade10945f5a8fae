//! Payment types mirroring the Xero JSON schema.

use serde::{Deserialize, Serialize};

/// Invoice reference inside a payment payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentInvoiceRef {
    #[serde(rename = "InvoiceID", skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,
    #[serde(rename = "InvoiceNumber", skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
}

/// Account reference inside a payment payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentAccountRef {
    #[serde(rename = "AccountID", skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(rename = "Code", skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// A payment applied against an invoice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Payment {
    #[serde(rename = "PaymentID", skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice: Option<PaymentInvoiceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<PaymentAccountRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<String>,
}

/// Envelope for payment lists and create payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentsResponse {
    #[serde(rename = "Payments", default)]
    pub payments: Vec<Payment>,
}
