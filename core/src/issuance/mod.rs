//! Badge issuance
//!
//! Puts one badge on the ledger: a marker payment carrying the
//! certificate memo, with the metadata entries attached. Entries that
//! do not fit the payment transaction ride in follow-up transactions on
//! the issuer's account. The marker payment hash is the badge's
//! permanent reference.

pub mod error;

pub use error::IssuanceError;

use crate::commons::crypto::Ed25519KeyPair;
use crate::commons::models::{BadgeContent, CertificateMetadata};
use crate::ledger::{BadgePaymentIntent, LedgerSubmit};
use crate::memo::{encode_metadata, marker_memo, DATA_VALUE_LIMIT};
use crate::scanner::MARKER_AMOUNT;

pub struct BadgeIssuer<'a, S: LedgerSubmit> {
    submitter: &'a S,
}

impl<'a, S: LedgerSubmit> BadgeIssuer<'a, S> {
    pub fn new(submitter: &'a S) -> Self {
        Self { submitter }
    }

    /// Issue a badge for an event to a recipient address. Returns the
    /// hash of the marker payment transaction.
    ///
    /// The payment and its first data entries commit atomically. When
    /// the metadata needs more entries than one transaction carries,
    /// the rest follows in separate transactions; a failure there
    /// leaves a badge with partial metadata, which the decode side
    /// tolerates. No retries here, the caller decides.
    ///
    /// # Possible errors
    /// • [IssuanceError::Memo] if the metadata cannot be encoded.<br />
    /// • [IssuanceError::Ledger] if the ledger rejects a transaction.
    pub async fn issue(
        &self,
        issuer: &Ed25519KeyPair,
        recipient_address: &str,
        event_id: &str,
        event_name: &str,
        content: Option<BadgeContent>,
    ) -> Result<String, IssuanceError> {
        let mut metadata = CertificateMetadata::new(event_id, event_name);
        if let Some(content) = content {
            metadata.title = content.title;
            metadata.description = content.description;
            metadata.image_url = content.image_url;
        }

        let entries: Vec<(String, String)> = encode_metadata(&metadata, DATA_VALUE_LIMIT)?
            .into_iter()
            .map(|chunk| (chunk.key.to_string(), chunk.value_b64))
            .collect();

        let capacity = self.submitter.max_data_entries().max(1);
        let (first, rest) = entries.split_at(entries.len().min(capacity));

        let intent = BadgePaymentIntent {
            destination: recipient_address.to_owned(),
            amount: MARKER_AMOUNT.to_owned(),
            memo_text: marker_memo(event_id),
            data_entries: first.to_vec(),
        };
        let hash = self.submitter.submit_badge_payment(issuer, &intent).await?;
        log::info!(
            "issued badge for event {} to {} in transaction {}",
            event_id,
            recipient_address,
            hash
        );

        for batch in rest.chunks(capacity) {
            let follow_up = self
                .submitter
                .submit_data_entries(issuer, batch)
                .await?;
            log::debug!("attached {} metadata entries in {}", batch.len(), follow_up);
        }
        Ok(hash)
    }
}
