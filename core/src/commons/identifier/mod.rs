//! Identifiers module
//!

pub(crate) mod address_identifier;
pub mod derive;
pub mod error;

pub use address_identifier::AddressIdentifier;
pub use derive::KeyDerivator;

use base64::encode_config;
use std::str::FromStr;

use self::error::Error;

/// Derivable Identifiers
pub trait Derivable: FromStr<Err = Error> {
    fn derivative(&self) -> Vec<u8>;

    fn derivation_code(&self) -> String;

    fn to_str(&self) -> String {
        match self.derivative().len() {
            0 => "".to_string(),
            _ => [
                self.derivation_code(),
                encode_config(self.derivative(), base64::URL_SAFE_NO_PAD),
            ]
            .join(""),
        }
    }
}
