//! Possible errors of the ProofChain core
use config::ConfigError;
use thiserror::Error;

/// Errors raised while assembling the core itself. Component-level
/// errors live next to their modules.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Settings Load Error")]
    SettingsError {
        #[from]
        source: ConfigError,
    },
}
