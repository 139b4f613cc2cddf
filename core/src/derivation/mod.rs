//! Deterministic identity derivation
//!
//! Turns an `(namespace, identifier, shared secret)` triple into a
//! stable Ed25519 keypair and therefore a stable ledger address. No
//! private state is persisted anywhere: the signing key is re-derived
//! on demand from the same inputs.

pub mod error;

pub use error::DerivationError;

use sha2::{Digest, Sha256};

use crate::commons::config::NodeSettings;
use crate::commons::crypto::{Ed25519KeyPair, KeyGenerator, KeyMaterial};
use crate::commons::identifier::{AddressIdentifier, KeyDerivator};

/// Secret used when no master secret is configured and `dev_mode` is on.
/// Never valid for production paths.
const DEMO_SECRET: &str = "demo-master-token-123";

/// Namespaces with distinct identifier normalization rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityNamespace {
    /// User / platform-account identifiers. Used raw.
    User,
    /// Organization names. Trimmed and lower-cased before hashing, so
    /// `"Acme Inc"` and `"  acme inc "` derive the same keys.
    Org,
}

impl IdentityNamespace {
    fn prefix(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Org => "org",
        }
    }

    fn normalize(&self, identifier: &str) -> String {
        match self {
            Self::User => identifier.to_owned(),
            Self::Org => identifier.trim().to_lowercase(),
        }
    }
}

/// Derive the keypair for an identity. Pure: no I/O, no randomness.
///
/// # Possible errors
/// • [DerivationError::MissingSecret] if `shared_secret` is empty.<br />
/// • [DerivationError::EmptyIdentifier] if the identifier normalizes to
/// an empty string.
pub fn derive_keypair(
    namespace: IdentityNamespace,
    identifier: &str,
    shared_secret: &str,
) -> Result<Ed25519KeyPair, DerivationError> {
    if shared_secret.is_empty() {
        return Err(DerivationError::MissingSecret);
    }
    let normalized = namespace.normalize(identifier);
    if normalized.is_empty() {
        return Err(DerivationError::EmptyIdentifier);
    }
    let seed_string = format!("{}:{}:{}", namespace.prefix(), normalized, shared_secret);
    let digest = Sha256::digest(seed_string.as_bytes());
    let keypair = Ed25519KeyPair::from_seed(digest.as_slice());
    log::debug!(
        "derived {} keypair, public key {}",
        namespace.prefix(),
        hex::encode(keypair.public_key_bytes())
    );
    Ok(keypair)
}

/// Derive only the public ledger address for an identity.
pub fn derive_address(
    namespace: IdentityNamespace,
    identifier: &str,
    shared_secret: &str,
) -> Result<AddressIdentifier, DerivationError> {
    let keypair = derive_keypair(namespace, identifier, shared_secret)?;
    Ok(AddressIdentifier::new(
        KeyDerivator::Ed25519,
        &keypair.public_key_bytes(),
    ))
}

/// Resolve the shared secret from node settings.
///
/// A missing secret is fatal. The demo constant is only handed out when
/// `dev_mode` is explicitly enabled.
pub fn resolve_secret(settings: &NodeSettings) -> Result<String, DerivationError> {
    match &settings.master_secret {
        Some(secret) if !secret.is_empty() => Ok(secret.clone()),
        _ if settings.dev_mode => {
            log::warn!("no master secret configured, using the demo secret (dev mode)");
            Ok(DEMO_SECRET.to_owned())
        }
        _ => Err(DerivationError::MissingSecret),
    }
}
