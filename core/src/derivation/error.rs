use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DerivationError {
    #[error("Master secret is required for key derivation")]
    MissingSecret,
    #[error("Identifier is empty after normalization")]
    EmptyIdentifier,
}
