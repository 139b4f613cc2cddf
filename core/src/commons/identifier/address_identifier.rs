//! AddressIdentifier module

use base64::decode_config;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Display;
use std::str::FromStr;

use super::{
    derive::{Derivator, KeyDerivator},
    error::Error,
    Derivable,
};
use crate::commons::crypto::{Ed25519KeyPair, KeyGenerator, Payload, DSA};

/// Public-key based ledger address.
///
/// The string form is the derivation code followed by the url-safe
/// base64 encoding of the public key. It is the `publicAddress` handed
/// to external collaborators and the value persisted by them.
#[derive(Debug, Clone, Eq, Hash, PartialOrd)]
pub struct AddressIdentifier {
    pub public_key: Vec<u8>,

    pub derivator: KeyDerivator,
}

/// AddressIdentifier implementation
impl AddressIdentifier {
    pub fn new(derivator: KeyDerivator, pk: &[u8]) -> Self {
        Self {
            public_key: pk.to_vec(),
            derivator,
        }
    }

    /// Verify a detached signature made by the key behind this address.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<(), Error> {
        match self.derivator {
            KeyDerivator::Ed25519 => {
                let kp = Ed25519KeyPair::from_public_key(&self.public_key);
                kp.verify(Payload::Buffer(data.to_vec()), signature)
            }
        }
    }
}

/// Partial equal for AddressIdentifier
impl PartialEq for AddressIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.public_key == other.public_key && self.derivator == other.derivator
    }
}

impl Display for AddressIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// From string to AddressIdentifier
impl FromStr for AddressIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = KeyDerivator::from_str(s)?;
        if s.len() == code.material_len() {
            let k_vec = decode_config(&s[code.code_len()..code.material_len()], base64::URL_SAFE)?;
            Ok(Self {
                derivator: code,
                public_key: k_vec,
            })
        } else {
            Err(Error::SemanticError(format!(
                "Incorrect Identifier Length: {}",
                s
            )))
        }
    }
}

/// Derivable for AddressIdentifier
impl Derivable for AddressIdentifier {
    fn derivative(&self) -> Vec<u8> {
        self.public_key.clone()
    }

    fn derivation_code(&self) -> String {
        self.derivator.to_str()
    }
}

/// Serde compatible Serialize
impl Serialize for AddressIdentifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_str())
    }
}

/// Serde compatible Deserialize
impl<'de> Deserialize<'de> for AddressIdentifier {
    fn deserialize<D>(deserializer: D) -> Result<AddressIdentifier, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = <std::string::String as Deserialize>::deserialize(deserializer)?;

        AddressIdentifier::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {

    use super::{AddressIdentifier, Derivable};
    use crate::commons::crypto::{Ed25519KeyPair, KeyGenerator, KeyMaterial, Payload, DSA};
    use crate::commons::identifier::derive::KeyDerivator;

    use std::str::FromStr;

    #[test]
    fn test_to_from_string() {
        let key_pair = Ed25519KeyPair::new();
        let print = AddressIdentifier::new(KeyDerivator::Ed25519, &key_pair.public_key_bytes());
        let string = print.to_str();
        let from_str = AddressIdentifier::from_str(&string);
        assert!(from_str.is_ok());
        let des = from_str.unwrap();
        assert_eq!(des, print);
    }

    #[test]
    fn test_serialize_deserialize() {
        let key_pair = Ed25519KeyPair::new();
        let print = AddressIdentifier::new(KeyDerivator::Ed25519, &key_pair.public_key_bytes());
        let ser = serde_json::to_string(&print);
        assert!(ser.is_ok());
        let des: Result<AddressIdentifier, _> = serde_json::from_str(&ser.unwrap());
        assert!(des.is_ok());
    }

    #[test]
    fn test_verify_ed25519() {
        let kp = Ed25519KeyPair::new();
        let message = b"message";
        let sig = kp.sign(Payload::Buffer(message.to_vec())).unwrap();
        let id = AddressIdentifier::new(KeyDerivator::Ed25519, &kp.public_key_bytes());
        assert!(id.verify(message, &sig).is_ok());
    }

    #[test]
    fn test_rejects_foreign_strings() {
        assert!(AddressIdentifier::from_str("GABCDEF").is_err());
        assert!(AddressIdentifier::from_str("E_too_short").is_err());
    }
}
