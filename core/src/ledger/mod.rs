//! Ledger access layer
//!
//! Read and write seams against the ledger. The scanner and the API
//! consume [LedgerQuery]; badge issuance consumes [LedgerSubmit]. Both
//! are traits so tests run against an in-memory ledger and production
//! runs against Horizon.

pub mod errors;
mod horizon;

pub use errors::LedgerError;
pub use horizon::HorizonClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::commons::crypto::Ed25519KeyPair;

/// Page ordering for history queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOrder {
    Asc,
    Desc,
}

impl QueryOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// One record from an account's payments history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub transaction_hash: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub amount: Option<String>,
    pub created_at: String,
}

/// A transaction looked up by hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub hash: String,
    pub successful: bool,
    pub memo: Option<String>,
    pub memo_type: Option<String>,
    pub created_at: String,
}

/// One effect of a transaction. Only data-entry effects carry a
/// name/value pair; everything else is ignored by the scanner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEffect {
    #[serde(rename = "type")]
    pub effect_type: String,
    pub name: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balance {
    pub asset_type: String,
    pub balance: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    pub account_id: String,
    pub balances: Vec<Balance>,
}

/// Everything needed to put one badge payment on the ledger: the
/// marker payment itself plus the metadata entries that ride with it.
#[derive(Debug, Clone)]
pub struct BadgePaymentIntent {
    pub destination: String,
    pub amount: String,
    pub memo_text: String,
    /// (data-entry name, base64 value) pairs for the payment
    /// transaction itself.
    pub data_entries: Vec<(String, String)>,
}

/// Read side of the ledger.
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// Load an account by address.
    ///
    /// # Possible errors
    /// • [LedgerError::NotFound] if the account has never been funded.
    async fn load_account(&self, address: &str) -> Result<AccountRecord, LedgerError>;

    /// Payment history of an account, newest or oldest first.
    async fn payments_for_account(
        &self,
        address: &str,
        order: QueryOrder,
        limit: u32,
    ) -> Result<Vec<PaymentRecord>, LedgerError>;

    /// Look up a transaction by hash.
    async fn transaction(&self, hash: &str) -> Result<TransactionRecord, LedgerError>;

    /// All effects produced by a transaction.
    async fn effects_for_transaction(&self, hash: &str)
        -> Result<Vec<DataEffect>, LedgerError>;
}

/// Write side of the ledger.
#[async_trait]
pub trait LedgerSubmit: Send + Sync {
    /// How many data entries one transaction can carry alongside the
    /// payment operation.
    fn max_data_entries(&self) -> usize;

    /// Sign and submit the badge payment transaction. Returns the
    /// transaction hash.
    async fn submit_badge_payment(
        &self,
        issuer: &Ed25519KeyPair,
        intent: &BadgePaymentIntent,
    ) -> Result<String, LedgerError>;

    /// Sign and submit a follow-up transaction carrying additional data
    /// entries on the issuer's own account. Returns the transaction
    /// hash.
    async fn submit_data_entries(
        &self,
        issuer: &Ed25519KeyPair,
        entries: &[(String, String)],
    ) -> Result<String, LedgerError>;
}
