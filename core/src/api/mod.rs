//! Badge module API
//!
//! Front door of the core: identity derivation, badge issuance, history
//! scans and badge verification behind one async trait. Everything
//! below it is deterministic given the ledger contents, so the API owns
//! only a small expiring cache for badge counts.

mod error;

pub use error::ApiError;

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::commons::config::ProofchainSettings;
use crate::commons::crypto::{Ed25519KeyPair, KeyMaterial};
use crate::commons::identifier::{AddressIdentifier, Derivable, KeyDerivator};
use crate::commons::models::{BadgeContent, BadgeRecord, KnownEvent};
use crate::derivation::{derive_keypair, resolve_secret, IdentityNamespace};
use crate::issuance::BadgeIssuer;
use crate::ledger::{LedgerError, LedgerQuery, LedgerSubmit};
use crate::scanner::{BadgeScanner, ScanReport};
use crate::utils::TtlCache;

const COUNTS_CACHE_TTL: Duration = Duration::from_secs(60);

/// Funding state of a ledger account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountStatus {
    pub address: String,
    pub exists: bool,
    /// Native asset balance, present only for funded accounts.
    pub native_balance: Option<String>,
}

/// Trait that allows implementing the user-facing badge operations of a
/// ProofChain node.
#[async_trait]
pub trait BadgeModuleInterface {
    /// Derive the public ledger address of an identity without touching
    /// the ledger.
    ///
    /// # Possible errors
    /// • [ApiError::Configuration] if no master secret is available.<br />
    /// • [ApiError::InvalidParameters] if the identifier is empty.
    async fn derive_address(
        &self,
        namespace: IdentityNamespace,
        identifier: &str,
    ) -> Result<String, ApiError>;

    /// Issue a badge from an organization to a recipient. The recipient
    /// may be a ledger address or a platform user id; the latter is
    /// resolved by derivation. Returns the marker transaction hash.
    ///
    /// # Possible errors
    /// • [ApiError::Configuration] if no master secret is available.<br />
    /// • [ApiError::Issuance] if a ledger submission fails.
    async fn issue_badge(
        &self,
        org_name: &str,
        recipient: &str,
        event_id: &str,
        event_name: &str,
        content: Option<BadgeContent>,
    ) -> Result<String, ApiError>;

    /// All badges issued by an organization or issuer address, newest
    /// first, with unreadable payments reported alongside.
    async fn badges_for_issuer(
        &self,
        issuer: &str,
        known_events: Option<&[KnownEvent]>,
    ) -> Result<ScanReport, ApiError>;

    /// All badges held by a recipient address, newest first.
    async fn badges_for_recipient(&self, address: &str) -> Result<ScanReport, ApiError>;

    /// Badges an issuer granted for one specific event.
    async fn badges_for_event(
        &self,
        issuer: &str,
        event: &KnownEvent,
    ) -> Result<Vec<BadgeRecord>, ApiError>;

    /// Badge totals per event for an issuer. A catalog, if given,
    /// attributes badges whose wire id was shortened to the full event
    /// id. Catalog-less calls are served from a short-lived cache and
    /// may lag the ledger by up to a minute.
    async fn badge_counts(
        &self,
        issuer: &str,
        known_events: Option<&[KnownEvent]>,
    ) -> Result<HashMap<String, u64>, ApiError>;

    /// Check that a badge's marker transaction exists on the ledger and
    /// succeeded. An unknown hash verifies as `false`, not as an error.
    async fn verify_badge(&self, transaction_ref: &str) -> Result<bool, ApiError>;

    /// Funding state and native balance of a ledger account.
    async fn account_info(&self, address: &str) -> Result<AccountStatus, ApiError>;
}

/// API implementation over a ledger query/submit pair.
pub struct BadgeAPI<Q: LedgerQuery, S: LedgerSubmit> {
    query: Arc<Q>,
    submitter: Arc<S>,
    settings: ProofchainSettings,
    counts_cache: Mutex<TtlCache<String, HashMap<String, u64>>>,
}

impl<Q: LedgerQuery, S: LedgerSubmit> BadgeAPI<Q, S> {
    pub fn new(query: Arc<Q>, submitter: Arc<S>, settings: ProofchainSettings) -> Self {
        Self {
            query,
            submitter,
            settings,
            counts_cache: Mutex::new(TtlCache::new(COUNTS_CACHE_TTL)),
        }
    }

    fn scanner(&self) -> BadgeScanner<'_, Q> {
        BadgeScanner::new(
            &*self.query,
            self.settings.ledger.page_limit,
            &self.settings.ledger.contract_ref,
        )
    }

    fn derive(
        &self,
        namespace: IdentityNamespace,
        identifier: &str,
    ) -> Result<Ed25519KeyPair, ApiError> {
        let secret = resolve_secret(&self.settings.node)?;
        Ok(derive_keypair(namespace, identifier, &secret)?)
    }

    /// Accept either a ledger address or an identifier in the given
    /// namespace, resolving the latter by derivation.
    fn resolve_address(
        &self,
        namespace: IdentityNamespace,
        value: &str,
    ) -> Result<String, ApiError> {
        if let Ok(address) = AddressIdentifier::from_str(value) {
            return Ok(address.to_str());
        }
        let keypair = self.derive(namespace, value)?;
        Ok(AddressIdentifier::new(KeyDerivator::Ed25519, &keypair.public_key_bytes()).to_str())
    }
}

#[async_trait]
impl<Q: LedgerQuery, S: LedgerSubmit> BadgeModuleInterface for BadgeAPI<Q, S> {
    async fn derive_address(
        &self,
        namespace: IdentityNamespace,
        identifier: &str,
    ) -> Result<String, ApiError> {
        let keypair = self.derive(namespace, identifier)?;
        Ok(AddressIdentifier::new(KeyDerivator::Ed25519, &keypair.public_key_bytes()).to_str())
    }

    async fn issue_badge(
        &self,
        org_name: &str,
        recipient: &str,
        event_id: &str,
        event_name: &str,
        content: Option<BadgeContent>,
    ) -> Result<String, ApiError> {
        if event_id.is_empty() {
            return Err(ApiError::InvalidParameters("event id is empty".to_owned()));
        }
        let issuer = self.derive(IdentityNamespace::Org, org_name)?;
        let recipient_address = self.resolve_address(IdentityNamespace::User, recipient)?;
        let hash = BadgeIssuer::new(&*self.submitter)
            .issue(&issuer, &recipient_address, event_id, event_name, content)
            .await?;
        Ok(hash)
    }

    async fn badges_for_issuer(
        &self,
        issuer: &str,
        known_events: Option<&[KnownEvent]>,
    ) -> Result<ScanReport, ApiError> {
        let address = self.resolve_address(IdentityNamespace::Org, issuer)?;
        Ok(self.scanner().scan_issued(&address, known_events).await?)
    }

    async fn badges_for_recipient(&self, address: &str) -> Result<ScanReport, ApiError> {
        let address = AddressIdentifier::from_str(address)
            .map_err(|error| ApiError::InvalidParameters(error.to_string()))?;
        Ok(self.scanner().scan_received(&address.to_str()).await?)
    }

    async fn badges_for_event(
        &self,
        issuer: &str,
        event: &KnownEvent,
    ) -> Result<Vec<BadgeRecord>, ApiError> {
        let catalog = std::slice::from_ref(event);
        let report = self.badges_for_issuer(issuer, Some(catalog)).await?;
        Ok(report
            .badges
            .into_iter()
            .filter(|badge| badge.event_id == event.id)
            .collect())
    }

    async fn badge_counts(
        &self,
        issuer: &str,
        known_events: Option<&[KnownEvent]>,
    ) -> Result<HashMap<String, u64>, ApiError> {
        let address = self.resolve_address(IdentityNamespace::Org, issuer)?;
        // Catalog-dependent results bypass the cache: the cache is
        // keyed by address only.
        if known_events.is_none() {
            let mut cache = self.counts_cache.lock().await;
            if let Some(counts) = cache.get(&address) {
                return Ok(counts.clone());
            }
        }
        let report = self.scanner().scan_issued(&address, known_events).await?;
        let counts = report.count_by_event();
        if known_events.is_none() {
            self.counts_cache
                .lock()
                .await
                .insert(address, counts.clone());
        }
        Ok(counts)
    }

    async fn verify_badge(&self, transaction_ref: &str) -> Result<bool, ApiError> {
        match self.query.transaction(transaction_ref).await {
            Ok(transaction) => Ok(transaction.successful),
            Err(LedgerError::NotFound(_)) => Ok(false),
            Err(error) => Err(error.into()),
        }
    }

    async fn account_info(&self, address: &str) -> Result<AccountStatus, ApiError> {
        match self.query.load_account(address).await {
            Ok(account) => {
                let native_balance = account
                    .balances
                    .iter()
                    .find(|balance| balance.asset_type == "native")
                    .map(|balance| balance.balance.clone());
                Ok(AccountStatus {
                    address: account.account_id,
                    exists: true,
                    native_balance,
                })
            }
            Err(LedgerError::NotFound(_)) => Ok(AccountStatus {
                address: address.to_owned(),
                exists: false,
                native_balance: None,
            }),
            Err(error) => Err(error.into()),
        }
    }
}
