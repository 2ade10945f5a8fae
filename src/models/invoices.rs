//! Invoice types mirroring the Xero JSON schema.

use serde::{Deserialize, Serialize};

use crate::models::Contact;

/// A single invoice line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LineItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_code: Option<String>,
}

/// A Xero invoice (`Type` is ACCREC for sales, ACCPAY for bills).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Invoice {
    #[serde(rename = "InvoiceID", skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub invoice_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    /// Invoice date, ISO-8601 date string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_amount_types: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line_items: Vec<LineItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tax: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_due: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_paid: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Envelope for invoice lists and create/update payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoicesResponse {
    #[serde(rename = "Invoices", default)]
    pub invoices: Vec<Invoice>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_deserialize() {
        let json = r#"{
            "InvoiceID": "243216c5-369e-4056-ac67-05388f86dc81",
            "Type": "ACCREC",
            "InvoiceNumber": "INV-0001",
            "Contact": {"ContactID": "bd2270c3-8706-4c11-9cfb-000b551c3f51", "Name": "ABC Limited"},
            "Date": "2026-07-01",
            "DueDate": "2026-07-29",
            "Status": "AUTHORISED",
            "LineItems": [
                {"Description": "Consulting", "Quantity": 10.0, "UnitAmount": 120.0, "AccountCode": "200", "LineAmount": 1200.0}
            ],
            "SubTotal": 1200.0,
            "TotalTax": 180.0,
            "Total": 1380.0,
            "AmountDue": 1380.0,
            "CurrencyCode": "NZD"
        }"#;
        let invoice: Invoice = serde_json::from_str(json).unwrap();
        assert_eq!(invoice.invoice_type.as_deref(), Some("ACCREC"));
        assert_eq!(invoice.line_items.len(), 1);
        assert_eq!(invoice.line_items[0].quantity, Some(10.0));
        assert_eq!(invoice.total, Some(1380.0));
        assert_eq!(
            invoice.contact.as_ref().and_then(|c| c.name.as_deref()),
            Some("ABC Limited")
        );
    }

    #[test]
    fn test_invoice_serialize_create_payload() {
        let invoice = Invoice {
            invoice_type: Some("ACCREC".to_string()),
            contact: Some(Contact {
                contact_id: Some("abc".to_string()),
                ..Contact::default()
            }),
            line_items: vec![LineItem {
                description: Some("Widget".to_string()),
                quantity: Some(2.0),
                unit_amount: Some(10.0),
                account_code: Some("200".to_string()),
                ..LineItem::default()
            }],
            ..Invoice::default()
        };
        let json = serde_json::to_value(&invoice).unwrap();
        assert_eq!(json["Type"], "ACCREC");
        assert_eq!(json["Contact"]["ContactID"], "abc");
        assert_eq!(json["LineItems"][0]["UnitAmount"], 10.0);
        // Unset amounts must not appear in the payload
        assert!(json.get("Total").is_none());
    }
}
