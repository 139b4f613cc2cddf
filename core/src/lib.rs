//! ProofChain turns an ordinary payment ledger into a badge registry.
//! Identities get deterministic Ed25519 keys derived from a shared
//! secret, so no private key material is ever stored; badges are tiny
//! marker payments whose certificate metadata rides in transaction
//! memos and data entries; and the ledger itself is the only source of
//! truth, with badge records rebuilt on demand by scanning payment
//! history.
//!
//! The crate exposes the [BadgeModuleInterface] trait as its API,
//! implemented by [BadgeAPI] over a pair of ledger seams: a query side
//! (Horizon over HTTP in production) and a submit side supplied by the
//! embedding application.
//!
//! # Basic usage
//! ```no_run
//!use std::sync::Arc;
//!
//!use proofchain_core::get_default_settings;
//!use proofchain_core::BadgeAPI;
//!use proofchain_core::BadgeModuleInterface;
//!use proofchain_core::HorizonClient;
//!use proofchain_core::IdentityNamespace;
//!use proofchain_core::KnownEvent;
//!# use proofchain_core::ledger::{BadgePaymentIntent, LedgerError, LedgerSubmit};
//!# use proofchain_core::crypto::Ed25519KeyPair;
//!# struct MySubmitter;
//!# #[async_trait::async_trait]
//!# impl LedgerSubmit for MySubmitter {
//!#     fn max_data_entries(&self) -> usize { 8 }
//!#     async fn submit_badge_payment(&self, _: &Ed25519KeyPair, _: &BadgePaymentIntent) -> Result<String, LedgerError> { unimplemented!() }
//!#     async fn submit_data_entries(&self, _: &Ed25519KeyPair, _: &[(String, String)]) -> Result<String, LedgerError> { unimplemented!() }
//!# }
//!
//!#[tokio::main]
//!async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!    let mut settings = get_default_settings();
//!    settings.node.master_secret = Some("org-wide-shared-secret".to_string());
//!
//!    let horizon = Arc::new(HorizonClient::new(&settings.ledger.horizon_url)?);
//!    let submitter = Arc::new(MySubmitter);
//!    let api = BadgeAPI::new(horizon, submitter, settings);
//!
//!    // Addresses are pure functions of (namespace, identifier, secret)
//!    let address = api
//!        .derive_address(IdentityNamespace::Org, "Acme Inc")
//!        .await?;
//!    println!("issuer address: {}", address);
//!
//!    // Issue a badge and read it back from the ledger
//!    let tx = api
//!        .issue_badge("Acme Inc", "user-42", "evt-12345678", "Spring Hackathon", None)
//!        .await?;
//!    assert!(api.verify_badge(&tx).await?);
//!
//!    let catalog = vec![KnownEvent {
//!        id: "evt-12345678".to_string(),
//!        title: "Spring Hackathon".to_string(),
//!    }];
//!    let report = api.badges_for_issuer("Acme Inc", Some(&catalog)).await?;
//!    println!("{} badges issued", report.badges.len());
//!    Ok(())
//!}
//! ```

pub(crate) mod commons;
pub mod derivation;
pub mod error;
pub mod issuance;
pub mod ledger;
pub mod memo;
pub mod scanner;
pub(crate) mod utils;

mod api;

pub use api::{AccountStatus, ApiError, BadgeAPI, BadgeModuleInterface};
pub use commons::config::{
    get_default_settings, LedgerSettings, NodeSettings, ProofchainSettings,
};
pub use commons::crypto;
pub use commons::identifier;
pub use commons::identifier::{AddressIdentifier, Derivable, KeyDerivator};
pub use commons::models::{BadgeContent, BadgeRecord, CertificateMetadata, KnownEvent};
pub use derivation::{derive_address, derive_keypair, IdentityNamespace};
pub use error::Error;
pub use issuance::{BadgeIssuer, IssuanceError};
pub use ledger::{HorizonClient, LedgerError, LedgerQuery, LedgerSubmit};
pub use memo::{ChunkKey, MemoChunk, MemoError};
pub use scanner::{BadgeScanner, ScanReport, SkipReason, SkippedPayment, MARKER_AMOUNT};
