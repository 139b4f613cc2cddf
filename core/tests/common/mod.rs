//! In-memory ledger shared by the integration tests. Implements both
//! ledger seams so a full issue-then-scan cycle runs without a network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use proofchain_core::crypto::Ed25519KeyPair;
use proofchain_core::ledger::{
    AccountRecord, Balance, BadgePaymentIntent, DataEffect, LedgerError, LedgerQuery,
    LedgerSubmit, PaymentRecord, QueryOrder, TransactionRecord,
};
use proofchain_core::{get_default_settings, ProofchainSettings};

pub const TEST_SECRET: &str = "integration-test-secret";

pub fn test_settings() -> ProofchainSettings {
    let mut settings = get_default_settings();
    settings.node.master_secret = Some(TEST_SECRET.to_string());
    settings
}

#[derive(Default)]
pub struct MemoryLedger {
    sequence: AtomicU64,
    accounts: Mutex<HashMap<String, String>>,
    payments: Mutex<HashMap<String, Vec<PaymentRecord>>>,
    transactions: Mutex<HashMap<String, TransactionRecord>>,
    effects: Mutex<HashMap<String, Vec<DataEffect>>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an account with a native balance, the ledger-side
    /// equivalent of funding it.
    pub fn fund(&self, address: &str, balance: &str) {
        self.accounts
            .lock()
            .unwrap()
            .insert(address.to_owned(), balance.to_owned());
    }

    pub fn is_funded(&self, address: &str) -> bool {
        self.accounts.lock().unwrap().contains_key(address)
    }

    /// Record an arbitrary successful payment, unrelated to badges.
    pub fn record_plain_payment(&self, from: &str, to: &str, amount: &str) -> String {
        self.record_payment(from, to, amount, None, true)
    }

    /// Record a marker payment whose data entries did not survive,
    /// the shape badges issued by older tooling come back in.
    pub fn record_bare_marker_payment(&self, from: &str, to: &str, memo: &str) -> String {
        self.record_payment(from, to, proofchain_core::MARKER_AMOUNT, Some(memo), true)
    }

    fn next_hash(&self) -> String {
        format!("txhash{:08}", self.sequence.fetch_add(1, Ordering::SeqCst))
    }

    fn record_payment(
        &self,
        from: &str,
        to: &str,
        amount: &str,
        memo: Option<&str>,
        successful: bool,
    ) -> String {
        let hash = self.next_hash();
        let payment = PaymentRecord {
            transaction_hash: hash.clone(),
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
            hash.clone(),
            TransactionRecord {
                hash: hash.clone(),
                successful,
                memo: memo.map(str::to_owned),
                memo_type: memo.map(|_| "text".to_owned()),
                created_at: "2024-05-01T12:00:00Z".to_owned(),
            },
        );
        hash
    }
}

#[async_trait]
impl LedgerQuery for MemoryLedger {
    async fn load_account(&self, address: &str) -> Result<AccountRecord, LedgerError> {
        match self.accounts.lock().unwrap().get(address) {
            Some(balance) => Ok(AccountRecord {
                account_id: address.to_owned(),
                balances: vec![Balance {
                    asset_type: "native".to_owned(),
                    balance: balance.clone(),
                }],
            }),
            None => Err(LedgerError::NotFound(address.to_owned())),
        }
    }

    async fn payments_for_account(
        &self,
        address: &str,
        _order: QueryOrder,
        limit: u32,
    ) -> Result<Vec<PaymentRecord>, LedgerError> {
        if !self.is_funded(address) && !self.payments.lock().unwrap().contains_key(address) {
            return Err(LedgerError::NotFound(address.to_owned()));
        }
        Ok(self
            .payments
            .lock()
            .unwrap()
            .get(address)
            .map(|payments| payments.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
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

#[async_trait]
impl LedgerSubmit for MemoryLedger {
    fn max_data_entries(&self) -> usize {
        8
    }

    async fn submit_badge_payment(
        &self,
        issuer: &Ed25519KeyPair,
        intent: &BadgePaymentIntent,
    ) -> Result<String, LedgerError> {
        use proofchain_core::crypto::KeyMaterial;
        use proofchain_core::{AddressIdentifier, Derivable, KeyDerivator};

        let issuer_address =
            AddressIdentifier::new(KeyDerivator::Ed25519, &issuer.public_key_bytes()).to_str();
        let hash = self.record_payment(
            &issuer_address,
            &intent.destination,
            &intent.amount,
            Some(&intent.memo_text),
            true,
        );
        self.effects.lock().unwrap().insert(
            hash.clone(),
            intent
                .data_entries
                .iter()
                .map(|(name, value)| DataEffect {
                    effect_type: "data_created".to_owned(),
                    name: Some(name.clone()),
                    value: Some(value.clone()),
                })
                .collect(),
        );
        Ok(hash)
    }

    async fn submit_data_entries(
        &self,
        issuer: &Ed25519KeyPair,
        entries: &[(String, String)],
    ) -> Result<String, LedgerError> {
        use proofchain_core::crypto::KeyMaterial;
        use proofchain_core::{AddressIdentifier, Derivable, KeyDerivator};

        let issuer_address =
            AddressIdentifier::new(KeyDerivator::Ed25519, &issuer.public_key_bytes()).to_str();
        // Data entries ride on a self-payment of the issuer account.
        let hash = self.record_payment(&issuer_address, &issuer_address, "0.0000000", None, true);
        self.effects.lock().unwrap().insert(
            hash.clone(),
            entries
                .iter()
                .map(|(name, value)| DataEffect {
                    effect_type: "data_created".to_owned(),
                    name: Some(name.clone()),
                    value: Some(value.clone()),
                })
                .collect(),
        );
        Ok(hash)
    }
}
