use thiserror::Error;

/// Errors of the memo encoding path. Decoding is total by design and
/// has no error type: malformed input degrades to partial metadata.
#[derive(Error, Debug)]
pub enum MemoError {
    #[error("Serde JSON error")]
    SerdeJson {
        #[from]
        source: serde_json::Error,
    },
    #[error("Chunk size must be greater than zero")]
    InvalidChunkSize,
}
