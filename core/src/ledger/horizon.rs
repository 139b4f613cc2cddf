//! Horizon REST client implementing the read side of the ledger.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{
    AccountRecord, DataEffect, LedgerError, LedgerQuery, PaymentRecord, QueryOrder,
    TransactionRecord,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Horizon wraps every collection in an `_embedded.records` envelope.
#[derive(Deserialize)]
struct Page<T> {
    #[serde(rename = "_embedded")]
    embedded: Embedded<T>,
}

#[derive(Deserialize)]
struct Embedded<T> {
    records: Vec<T>,
}

pub struct HorizonClient {
    client: reqwest::Client,
    base_url: String,
}

impl HorizonClient {
    pub fn new(horizon_url: &str) -> Result<Self, LedgerError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: horizon_url.trim_end_matches('/').to_owned(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, LedgerError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(LedgerError::NotFound(path.to_owned()));
        }
        if !response.status().is_success() {
            return Err(LedgerError::UnexpectedResponse(format!(
                "{} returned {}",
                path,
                response.status()
            )));
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl LedgerQuery for HorizonClient {
    async fn load_account(&self, address: &str) -> Result<AccountRecord, LedgerError> {
        self.get_json(&format!("/accounts/{}", address)).await
    }

    async fn payments_for_account(
        &self,
        address: &str,
        order: QueryOrder,
        limit: u32,
    ) -> Result<Vec<PaymentRecord>, LedgerError> {
        let page: Page<PaymentRecord> = self
            .get_json(&format!(
                "/accounts/{}/payments?order={}&limit={}",
                address,
                order.as_str(),
                limit
            ))
            .await?;
        Ok(page.embedded.records)
    }

    async fn transaction(&self, hash: &str) -> Result<TransactionRecord, LedgerError> {
        self.get_json(&format!("/transactions/{}", hash)).await
    }

    async fn effects_for_transaction(
        &self,
        hash: &str,
    ) -> Result<Vec<DataEffect>, LedgerError> {
        let page: Page<DataEffect> = self
            .get_json(&format!("/transactions/{}/effects?limit=200", hash))
            .await?;
        Ok(page.embedded.records)
    }
}
