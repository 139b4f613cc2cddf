//! Errors that may occur when interacting with the badge module API

use thiserror::Error;

use crate::derivation::DerivationError;
use crate::issuance::IssuanceError;
use crate::ledger::LedgerError;

/// Errors that may occur when using the badge API
#[derive(Error, Debug)]
pub enum ApiError {
    /// The node is not configured for the requested operation, usually
    /// a missing master secret.
    #[error("Configuration error: {}", source)]
    Configuration {
        #[from]
        source: DerivationError,
    },
    /// The ledger could not be reached or answered unexpectedly.
    #[error("{}", source)]
    Ledger {
        #[from]
        source: LedgerError,
    },
    /// Badge issuance failed.
    #[error("{}", source)]
    Issuance {
        #[from]
        source: IssuanceError,
    },
    /// Invalid parameters have been entered, usually identifiers.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
}
