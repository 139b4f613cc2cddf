use ed25519_dalek::ed25519;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Base64 Decoding error")]
    Base64DecodingError {
        #[from]
        source: base64::DecodeError,
    },

    #[error("Ed25519 error")]
    Ed25519Error {
        #[from]
        source: ed25519::Error,
    },

    #[error("Deserialization error")]
    DeserializationError,

    #[error("Seed error: {0}")]
    SeedError(String),

    #[error("Semantic error: {0}")]
    SemanticError(String),

    #[error("Sign error: {0}")]
    SignError(String),
}
