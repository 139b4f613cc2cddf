//! Badge and certificate models

use serde::{Deserialize, Serialize};

/// Metadata attached to a badge-marker payment.
///
/// Written once at issuance, read back by the scanner. Every field
/// except `event_id` is independently optional: ledger memo space is
/// tiny and entries may come back truncated, so a record with only an
/// event id is still valid, just degraded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateMetadata {
    pub event_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CertificateMetadata {
    pub fn new(event_id: &str, event_name: &str) -> Self {
        Self {
            event_id: event_id.to_owned(),
            event_name: Some(event_name.to_owned()),
            ..Default::default()
        }
    }

    /// True when no display field carries information.
    pub fn is_bare(&self) -> bool {
        self.event_name.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.image_url.is_none()
    }
}

/// Optional artwork and copy attached to a badge at issuance time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A badge reconstructed from ledger state.
///
/// It has no persisted identity of its own: re-scanning the ledger must
/// reproduce an equivalent record for the same transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeRecord {
    pub id: String,
    pub event_id: String,
    pub event_title: String,
    pub recipient_address: String,
    pub issuer_address: String,
    pub transaction_ref: String,
    pub date_issued: String,
    pub contract_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
