use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Resource not found on the ledger: {0}")]
    NotFound(String),
    #[error("Ledger transport error")]
    Transport {
        #[from]
        source: reqwest::Error,
    },
    #[error("Unexpected ledger response: {0}")]
    UnexpectedResponse(String),
    #[error("Submission rejected by the ledger: {0}")]
    SubmissionRejected(String),
}
