//! Ledger badge scanner
//!
//! Walks an account's payment history and rebuilds the badge records
//! hidden in it. Badge payments are told apart from ordinary traffic by
//! the marker amount or the certificate memo; metadata is reassembled
//! from the data entries attached to each marker transaction. Every
//! per-payment failure is skipped and reported, never fatal.

use std::collections::HashMap;

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::commons::models::{BadgeRecord, KnownEvent};
use crate::ledger::{DataEffect, LedgerError, LedgerQuery, PaymentRecord, QueryOrder};
use crate::memo::{
    decode_chunks, decode_marker_memo, is_certificate_memo, memo_plaintext, short_event_id,
    ChunkKey, MemoChunk,
};

/// Sentinel payment amount marking a badge transaction. Changing it
/// orphans every previously-issued badge, so it never changes.
pub const MARKER_AMOUNT: &str = "0.0000001";

/// Fallback title when neither the metadata nor the event catalog names
/// the badge.
const DEFAULT_TITLE: &str = "Certificate";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Issued,
    Received,
}

/// Why a candidate payment was left out of the scan result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SkipReason {
    TransactionUnavailable(String),
    TransactionFailed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkippedPayment {
    pub transaction_hash: String,
    pub reason: SkipReason,
}

/// Result of a history scan: the badges found plus everything that
/// looked relevant but could not be read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    pub badges: Vec<BadgeRecord>,
    pub skipped: Vec<SkippedPayment>,
}

impl ScanReport {
    /// Badge totals keyed by event id.
    pub fn count_by_event(&self) -> HashMap<String, u64> {
        let mut counts: HashMap<String, u64> = HashMap::new();
        for badge in &self.badges {
            *counts.entry(badge.event_id.clone()).or_default() += 1;
        }
        counts
    }
}

pub struct BadgeScanner<'a, L: LedgerQuery> {
    ledger: &'a L,
    page_limit: u32,
    contract_ref: String,
}

impl<'a, L: LedgerQuery> BadgeScanner<'a, L> {
    pub fn new(ledger: &'a L, page_limit: u32, contract_ref: &str) -> Self {
        Self {
            ledger,
            page_limit,
            contract_ref: contract_ref.to_owned(),
        }
    }

    /// Badges issued by an account, newest first. An event catalog, if
    /// given, is used to restore full event ids and titles that were
    /// shortened on the wire.
    ///
    /// # Possible errors
    /// • [LedgerError::Transport] / [LedgerError::UnexpectedResponse]
    /// if the payments page itself cannot be fetched. An unfunded
    /// account is not an error and yields an empty report.
    pub async fn scan_issued(
        &self,
        issuer_address: &str,
        known_events: Option<&[KnownEvent]>,
    ) -> Result<ScanReport, LedgerError> {
        self.scan(issuer_address, Direction::Issued, known_events)
            .await
    }

    /// Badges received by an account, newest first.
    pub async fn scan_received(
        &self,
        recipient_address: &str,
    ) -> Result<ScanReport, LedgerError> {
        self.scan(recipient_address, Direction::Received, None).await
    }

    async fn scan(
        &self,
        address: &str,
        direction: Direction,
        known_events: Option<&[KnownEvent]>,
    ) -> Result<ScanReport, LedgerError> {
        let payments = match self
            .ledger
            .payments_for_account(address, QueryOrder::Desc, self.page_limit)
            .await
        {
            Ok(payments) => payments,
            Err(LedgerError::NotFound(_)) => {
                log::debug!("account {} not found on the ledger, empty scan", address);
                return Ok(ScanReport::default());
            }
            Err(error) => return Err(error),
        };

        let candidates: Vec<PaymentRecord> = payments
            .into_iter()
            .filter(|payment| payment.record_type == "payment")
            .filter(|payment| match direction {
                Direction::Issued => payment.from.as_deref() == Some(address),
                Direction::Received => payment.to.as_deref() == Some(address),
            })
            .collect();

        // Transactions are fetched concurrently; join_all preserves the
        // history ordering.
        let transactions = join_all(
            candidates
                .iter()
                .map(|payment| self.ledger.transaction(&payment.transaction_hash)),
        )
        .await;

        let mut report = ScanReport::default();
        for (payment, transaction) in candidates.iter().zip(transactions) {
            let transaction = match transaction {
                Ok(transaction) => transaction,
                Err(error) => {
                    log::warn!(
                        "skipping payment {}: transaction lookup failed: {}",
                        payment.transaction_hash,
                        error
                    );
                    report.skipped.push(SkippedPayment {
                        transaction_hash: payment.transaction_hash.clone(),
                        reason: SkipReason::TransactionUnavailable(error.to_string()),
                    });
                    continue;
                }
            };

            let memo = transaction
                .memo
                .as_deref()
                .zip(transaction.memo_type.as_deref())
                .and_then(|(memo, memo_type)| memo_plaintext(memo, memo_type));

            let is_marker = payment.amount.as_deref() == Some(MARKER_AMOUNT)
                || memo.as_deref().map(is_certificate_memo).unwrap_or(false);
            if !is_marker {
                continue;
            }
            if !transaction.successful {
                report.skipped.push(SkippedPayment {
                    transaction_hash: payment.transaction_hash.clone(),
                    reason: SkipReason::TransactionFailed,
                });
                continue;
            }

            let marker = memo.as_deref().map(decode_marker_memo).unwrap_or_default();

            let chunks = match self
                .ledger
                .effects_for_transaction(&payment.transaction_hash)
                .await
            {
                Ok(effects) => collect_chunks(&effects, marker.event_id.as_deref()),
                Err(error) => {
                    log::warn!(
                        "effects lookup failed for {}, decoding from memo only: {}",
                        payment.transaction_hash,
                        error
                    );
                    Vec::new()
                }
            };

            let metadata = decode_chunks(&chunks);
            let ledger_event_id = metadata
                .as_ref()
                .map(|m| m.event_id.clone())
                .or(marker.event_id.clone())
                .unwrap_or_default();
            let catalog_match = known_events
                .unwrap_or_default()
                .iter()
                .find(|event| event.matches(&ledger_event_id));

            let event_id = catalog_match
                .map(|event| event.id.clone())
                .unwrap_or(ledger_event_id);
            let event_title = metadata
                .as_ref()
                .and_then(|m| m.event_name.clone())
                .or(marker.event_name)
                .or_else(|| catalog_match.map(|event| event.title.clone()))
                .unwrap_or_else(|| DEFAULT_TITLE.to_owned());

            report.badges.push(BadgeRecord {
                id: payment.transaction_hash.clone(),
                event_id,
                event_title,
                recipient_address: payment.to.clone().unwrap_or_default(),
                issuer_address: payment.from.clone().unwrap_or_default(),
                transaction_ref: payment.transaction_hash.clone(),
                date_issued: transaction.created_at.clone(),
                contract_ref: self.contract_ref.clone(),
                title: metadata.as_ref().and_then(|m| m.title.clone()),
                description: metadata.as_ref().and_then(|m| m.description.clone()),
                image_url: metadata.and_then(|m| m.image_url),
            });
        }
        Ok(report)
    }
}

/// Pull the metadata chunks for one badge out of a transaction's
/// effects. When the memo names the event, chunks for other events
/// (possible on shared issuer accounts) are filtered out.
fn collect_chunks(effects: &[DataEffect], memo_event_id: Option<&str>) -> Vec<MemoChunk> {
    let wanted_short = memo_event_id.map(short_event_id);
    effects
        .iter()
        .filter(|effect| effect.effect_type.starts_with("data_"))
        .filter_map(|effect| {
            let key = ChunkKey::parse(effect.name.as_deref()?)?;
            let value = effect.value.clone()?;
            Some(MemoChunk {
                key,
                value_b64: value,
            })
        })
        .filter(|chunk| match wanted_short {
            Some(short) => chunk.key.short_event_id == short,
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{BadgeScanner, SkipReason, MARKER_AMOUNT};
    use crate::commons::models::{CertificateMetadata, KnownEvent};
    use crate::ledger::{
        AccountRecord, DataEffect, LedgerError, LedgerQuery, PaymentRecord, QueryOrder,
        TransactionRecord,
    };
    use crate::memo::{encode_metadata, marker_memo, DATA_VALUE_LIMIT};

    #[derive(Default)]
    struct FakeLedger {
        payments: Mutex<HashMap<String, Vec<PaymentRecord>>>,
        transactions: Mutex<HashMap<String, TransactionRecord>>,
        effects: Mutex<HashMap<String, Vec<DataEffect>>>,
    }

    impl FakeLedger {
        fn add_payment(
            &self,
            hash: &str,
            from: &str,
            to: &str,
            amount: &str,
            memo: Option<&str>,
            successful: bool,
        ) {
            let payment = PaymentRecord {
                transaction_hash: hash.to_owned(),
                record_type: "payment".to_owned(),
                from: Some(from.to_owned()),
                to: Some(to.to_owned()),
                amount: Some(amount.to_owned()),
                created_at: "2024-05-01T12:00:00Z".to_owned(),
            };
            let mut payments = self.payments.lock().unwrap();
            for account in [from, to] {
                payments
                    .entry(account.to_owned())
                    .or_default()
                    .insert(0, payment.clone());
            }
            self.transactions.lock().unwrap().insert(
                hash.to_owned(),
                TransactionRecord {
                    hash: hash.to_owned(),
                    successful,
                    memo: memo.map(str::to_owned),
                    memo_type: memo.map(|_| "text".to_owned()),
                    created_at: "2024-05-01T12:00:00Z".to_owned(),
                },
            );
        }

        fn add_badge(&self, hash: &str, from: &str, to: &str, metadata: &CertificateMetadata) {
            self.add_payment(
                hash,
                from,
                to,
                MARKER_AMOUNT,
                Some(&marker_memo(&metadata.event_id)),
                true,
            );
            let effects = encode_metadata(metadata, DATA_VALUE_LIMIT)
                .unwrap()
                .into_iter()
                .map(|chunk| DataEffect {
                    effect_type: "data_created".to_owned(),
                    name: Some(chunk.key.to_string()),
                    value: Some(chunk.value_b64),
                })
                .collect();
            self.effects.lock().unwrap().insert(hash.to_owned(), effects);
        }
    }

    #[async_trait]
    impl LedgerQuery for FakeLedger {
        async fn load_account(&self, address: &str) -> Result<AccountRecord, LedgerError> {
            if self.payments.lock().unwrap().contains_key(address) {
                Ok(AccountRecord {
                    account_id: address.to_owned(),
                    balances: vec![],
                })
            } else {
                Err(LedgerError::NotFound(address.to_owned()))
            }
        }

        async fn payments_for_account(
            &self,
            address: &str,
            _order: QueryOrder,
            limit: u32,
        ) -> Result<Vec<PaymentRecord>, LedgerError> {
            match self.payments.lock().unwrap().get(address) {
                Some(payments) => {
                    Ok(payments.iter().take(limit as usize).cloned().collect())
                }
                None => Err(LedgerError::NotFound(address.to_owned())),
            }
        }

        async fn transaction(&self, hash: &str) -> Result<TransactionRecord, LedgerError> {
            self.transactions
                .lock()
                .unwrap()
                .get(hash)
                .cloned()
                .ok_or_else(|| LedgerError::NotFound(hash.to_owned()))
        }

        async fn effects_for_transaction(
            &self,
            hash: &str,
        ) -> Result<Vec<DataEffect>, LedgerError> {
            Ok(self
                .effects
                .lock()
                .unwrap()
                .get(hash)
                .cloned()
                .unwrap_or_default())
        }
    }

    const ISSUER: &str = "ISSUER_ADDR";
    const ALICE: &str = "ALICE_ADDR";
    const BOB: &str = "BOB_ADDR";
    const CONTRACT: &str = "CBZM3AM3TGQ4OWJY2NCDNVTCNXGS7ZVLPUNXQRSRAEQBTDWPKJKCO2NI";

    fn metadata(event_id: &str, name: &str) -> CertificateMetadata {
        CertificateMetadata {
            event_id: event_id.to_owned(),
            event_name: Some(name.to_owned()),
            title: Some("Winner".to_owned()),
            description: None,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_marker_payments_only() {
        let ledger = FakeLedger::default();
        ledger.add_payment("tx-rent", ISSUER, ALICE, "120.5000000", None, true);
        ledger.add_badge("tx-badge", ISSUER, ALICE, &metadata("evt-12345678", "Hack"));
        ledger.add_payment("tx-tip", ISSUER, BOB, "1.0000000", Some("thanks"), true);

        let scanner = BadgeScanner::new(&ledger, 200, CONTRACT);
        let report = scanner.scan_issued(ISSUER, None).await.unwrap();
        assert_eq!(report.badges.len(), 1);
        assert_eq!(report.badges[0].transaction_ref, "tx-badge");
        assert_eq!(report.badges[0].recipient_address, ALICE);
        assert!(report.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_direction_filter() {
        let ledger = FakeLedger::default();
        ledger.add_badge("tx-1", ISSUER, ALICE, &metadata("evt-12345678", "Hack"));
        ledger.add_badge("tx-2", BOB, ALICE, &metadata("evt-12345678", "Hack"));

        let scanner = BadgeScanner::new(&ledger, 200, CONTRACT);
        let issued = scanner.scan_issued(ISSUER, None).await.unwrap();
        assert_eq!(issued.badges.len(), 1);
        assert_eq!(issued.badges[0].issuer_address, ISSUER);

        let received = scanner.scan_received(ALICE).await.unwrap();
        assert_eq!(received.badges.len(), 2);
    }

    #[tokio::test]
    async fn test_unfunded_account_is_empty_not_error() {
        let ledger = FakeLedger::default();
        let scanner = BadgeScanner::new(&ledger, 200, CONTRACT);
        let report = scanner.scan_issued("NEVER_FUNDED", None).await.unwrap();
        assert!(report.badges.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_failed_transaction_is_skipped() {
        let ledger = FakeLedger::default();
        ledger.add_payment(
            "tx-fail",
            ISSUER,
            ALICE,
            MARKER_AMOUNT,
            Some("CERT:evt-1234"),
            false,
        );
        ledger.add_badge("tx-ok", ISSUER, BOB, &metadata("evt-12345678", "Hack"));

        let scanner = BadgeScanner::new(&ledger, 200, CONTRACT);
        let report = scanner.scan_issued(ISSUER, None).await.unwrap();
        assert_eq!(report.badges.len(), 1);
        assert_eq!(
            report.skipped,
            vec![super::SkippedPayment {
                transaction_hash: "tx-fail".to_owned(),
                reason: SkipReason::TransactionFailed,
            }]
        );
    }

    #[tokio::test]
    async fn test_missing_transaction_is_skipped() {
        let ledger = FakeLedger::default();
        ledger.add_badge("tx-ok", ISSUER, ALICE, &metadata("evt-12345678", "Hack"));
        ledger.add_payment("tx-gone", ISSUER, BOB, MARKER_AMOUNT, None, true);
        ledger.transactions.lock().unwrap().remove("tx-gone");

        let scanner = BadgeScanner::new(&ledger, 200, CONTRACT);
        let report = scanner.scan_issued(ISSUER, None).await.unwrap();
        assert_eq!(report.badges.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert!(matches!(
            report.skipped[0].reason,
            SkipReason::TransactionUnavailable(_)
        ));
    }

    #[tokio::test]
    async fn test_known_event_reconciliation() {
        let ledger = FakeLedger::default();
        // Metadata lost in transit: only the marker memo survives.
        ledger.add_payment(
            "tx-bare",
            ISSUER,
            ALICE,
            MARKER_AMOUNT,
            Some("CERT:evt-1234"),
            true,
        );
        let catalog = vec![KnownEvent {
            id: "evt-12345678-spring".to_owned(),
            title: "Spring Hackathon".to_owned(),
        }];

        let scanner = BadgeScanner::new(&ledger, 200, CONTRACT);
        let report = scanner.scan_issued(ISSUER, Some(&catalog)).await.unwrap();
        assert_eq!(report.badges.len(), 1);
        assert_eq!(report.badges[0].event_id, "evt-12345678-spring");
        assert_eq!(report.badges[0].event_title, "Spring Hackathon");
    }

    #[tokio::test]
    async fn test_count_by_event() {
        let ledger = FakeLedger::default();
        ledger.add_badge("tx-1", ISSUER, ALICE, &metadata("evt-aaaaaaaa", "A"));
        ledger.add_badge("tx-2", ISSUER, BOB, &metadata("evt-aaaaaaaa", "A"));
        ledger.add_badge("tx-3", ISSUER, ALICE, &metadata("evt-bbbbbbbb", "B"));

        let scanner = BadgeScanner::new(&ledger, 200, CONTRACT);
        let report = scanner.scan_issued(ISSUER, None).await.unwrap();
        let counts = report.count_by_event();
        assert_eq!(counts.get("evt-aaaaaaaa"), Some(&2));
        assert_eq!(counts.get("evt-bbbbbbbb"), Some(&1));
    }
}
