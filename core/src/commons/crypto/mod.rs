//! Cryptographic material for ledger identities
//!

pub(crate) mod ed25519;

pub use ed25519::Ed25519KeyPair;

use crate::commons::identifier::error::Error;

/// Asymmetric key pair. The secret part is optional: identifiers read
/// back from the ledger only carry public material.
#[derive(Debug)]
pub struct BaseKeyPair<P, S> {
    pub public_key: P,
    pub secret_key: Option<S>,
}

/// Payloads admitted by the signing operations.
#[derive(Debug, Clone)]
pub enum Payload {
    Buffer(Vec<u8>),
}

pub trait KeyGenerator: KeyMaterial {
    fn new() -> Self
    where
        Self: Sized,
    {
        Self::from_seed(&[])
    }
    /// Build a key pair from a 32 byte seed. An empty seed generates
    /// random material.
    fn from_seed(seed: &[u8]) -> Self;
    fn from_public_key(public_key: &[u8]) -> Self;
    fn from_secret_key(secret_key: &[u8]) -> Self;
}

pub trait KeyMaterial {
    fn public_key_bytes(&self) -> Vec<u8>;
    fn secret_key_bytes(&self) -> Vec<u8>;
    fn to_bytes(&self) -> Vec<u8>;
}

/// Digital signature operations over a key pair.
pub trait DSA {
    fn sign(&self, payload: Payload) -> Result<Vec<u8>, Error>;
    fn verify(&self, payload: Payload, signature: &[u8]) -> Result<(), Error>;
}

pub fn create_seed(initial_seed: &[u8]) -> Result<[u8; 32], Error> {
    let mut seed = [0u8; 32];
    if initial_seed.is_empty() {
        getrandom::getrandom(&mut seed)
            .map_err(|_| Error::SeedError("couldn't generate random seed".to_owned()))?;
    } else if initial_seed.len() == seed.len() {
        seed.copy_from_slice(initial_seed);
    } else {
        return Err(Error::SeedError(format!(
            "expected a seed of {} bytes, got {}",
            seed.len(),
            initial_seed.len()
        )));
    }
    Ok(seed)
}
