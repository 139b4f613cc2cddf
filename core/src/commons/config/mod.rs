use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Error;

/// Configuration parameters of the ProofChain core divided into categories.
#[derive(Debug, Deserialize, Clone)]
pub struct ProofchainSettings {
    pub ledger: LedgerSettings,
    pub node: NodeSettings,
}

/// Parameters of the external ledger the core talks to.
#[derive(Debug, Deserialize, Clone)]
pub struct LedgerSettings {
    /// Base URL of the Horizon-style query API.
    #[serde(rename = "horizonurl")]
    pub horizon_url: String,
    /// Page size for payment-history scans. A recency-biased window,
    /// not a full history walk.
    #[serde(rename = "pagelimit")]
    pub page_limit: u32,
    /// Contract reference stamped into reconstructed badge records.
    #[serde(rename = "contractref")]
    pub contract_ref: String,
}

/// General settings of the ProofChain core.
#[derive(Debug, Deserialize, Clone)]
pub struct NodeSettings {
    /// Shared secret for deterministic key derivation. Its absence is a
    /// fatal configuration error on every production derivation path.
    #[serde(rename = "mastersecret")]
    pub master_secret: Option<String>,
    /// Allows the built-in demo secret when no master secret is set.
    #[serde(rename = "devmode")]
    pub dev_mode: bool,
}

impl ProofchainSettings {
    /// Load settings from an optional TOML file plus `PROOFCHAIN__*`
    /// environment variables (environment wins).
    pub fn load(path: Option<&str>) -> Result<Self, Error> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }
        let settings = builder
            .add_source(Environment::with_prefix("PROOFCHAIN").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

pub fn get_default_settings() -> ProofchainSettings {
    ProofchainSettings {
        ledger: LedgerSettings {
            horizon_url: "https://horizon-testnet.stellar.org".into(),
            page_limit: 200u32,
            contract_ref: "CBZM3AM3TGQ4OWJY2NCDNVTCNXGS7ZVLPUNXQRSRAEQBTDWPKJKCO2NI".into(),
        },
        node: NodeSettings {
            master_secret: Option::<String>::None,
            dev_mode: false,
        },
    }
}
