use thiserror::Error;

use crate::derivation::DerivationError;
use crate::ledger::LedgerError;
use crate::memo::MemoError;

#[derive(Error, Debug)]
pub enum IssuanceError {
    #[error("Derivation error: {source}")]
    Derivation {
        #[from]
        source: DerivationError,
    },
    #[error("Ledger error: {source}")]
    Ledger {
        #[from]
        source: LedgerError,
    },
    #[error("Memo encoding error: {source}")]
    Memo {
        #[from]
        source: MemoError,
    },
}
