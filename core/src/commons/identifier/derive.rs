//! Key derivation codes for ledger addresses
//!

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::Error;

/// Common behavior for derivation codes prepended to encoded material.
pub trait Derivator {
    fn code_len(&self) -> usize;
    fn derivative_len(&self) -> usize;
    fn material_len(&self) -> usize {
        self.code_len() + self.derivative_len()
    }
    fn to_str(&self) -> String;
}

/// Enumeration with key derivator types
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize, Eq, Hash, PartialOrd)]
pub enum KeyDerivator {
    Ed25519,
}

impl Derivator for KeyDerivator {
    fn code_len(&self) -> usize {
        match self {
            Self::Ed25519 => 1,
        }
    }

    fn derivative_len(&self) -> usize {
        match self {
            Self::Ed25519 => 43,
        }
    }

    fn to_str(&self) -> String {
        match self {
            Self::Ed25519 => "E",
        }
        .into()
    }
}

impl FromStr for KeyDerivator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.get(..1) {
            Some("E") => Ok(Self::Ed25519),
            _ => Err(Error::DeserializationError),
        }
    }
}
