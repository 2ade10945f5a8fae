//! Contact types mirroring the Xero JSON schema.

use serde::{Deserialize, Serialize};

/// A Xero contact.
///
/// Fields are sparse: Xero omits anything unset, and write payloads must do
/// the same, so everything is optional and skipped when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Contact {
    #[serde(rename = "ContactID", skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_customer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_supplier: Option<bool>,
    #[serde(rename = "UpdatedDateUTC", skip_serializing_if = "Option::is_none")]
    pub updated_date_utc: Option<String>,
}

/// Envelope for contact lists and create/update payloads
/// (`{"Contacts": [...]}` in both directions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactsResponse {
    #[serde(rename = "Contacts", default)]
    pub contacts: Vec<Contact>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_deserialize() {
        let json = r#"{
            "ContactID": "bd2270c3-8706-4c11-9cfb-000b551c3f51",
            "Name": "ABC Limited",
            "EmailAddress": "info@abc.example",
            "ContactStatus": "ACTIVE",
            "IsCustomer": true
        }"#;
        let contact: Contact = serde_json::from_str(json).unwrap();
        assert_eq!(contact.name.as_deref(), Some("ABC Limited"));
        assert_eq!(contact.is_customer, Some(true));
        assert!(contact.first_name.is_none());
    }

    #[test]
    fn test_contact_serialize_skips_unset_fields() {
        let contact = Contact {
            name: Some("New Co".to_string()),
            ..Contact::default()
        };
        let json = serde_json::to_string(&contact).unwrap();
        assert_eq!(json, r#"{"Name":"New Co"}"#);
    }

    #[test]
    fn test_contacts_envelope() {
        let json = r#"{"Contacts": [{"Name": "A"}, {"Name": "B"}]}"#;
        let resp: ContactsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.contacts.len(), 2);
    }

    #[test]
    fn test_contacts_envelope_missing_list() {
        let resp: ContactsResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.contacts.is_empty());
    }
}
