//! Safe client-gateway implementation of `TransactionSource`.

use super::{SourceError, TransactionSource};
use crate::domain::TxDetails;
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Fetches multisig transactions from the Safe client gateway.
#[derive(Debug, Clone)]
pub struct SafeClientSource {
    client: Client,
    base_url: String,
    max_elapsed: Duration,
}

impl SafeClientSource {
    /// `base_url` is the transactions collection, e.g.
    /// `https://safe-client.safe.global/v1/chains/1/transactions`.
    pub fn new(base_url: String, max_elapsed: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url,
            max_elapsed,
        }
    }

    pub fn transaction_url(&self, tx_id: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), tx_id)
    }

    async fn get_json(&self, tx_id: &str) -> Result<serde_json::Value, SourceError> {
        let url = self.transaction_url(tx_id);
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(self.max_elapsed),
            ..Default::default()
        };

        retry(backoff, || async {
            let response = self.client.get(&url).send().await.map_err(|e| {
                backoff::Error::transient(SourceError::NetworkError(e.to_string()))
            })?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(backoff::Error::transient(SourceError::RateLimited));
            }
            if status.is_server_error() {
                return Err(backoff::Error::transient(SourceError::HttpError {
                    status: status.as_u16(),
                    message: "Server error".to_string(),
                }));
            }
            if status == StatusCode::NOT_FOUND {
                return Err(backoff::Error::permanent(SourceError::NotFound(
                    tx_id.to_string(),
                )));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(SourceError::HttpError {
                    status: status.as_u16(),
                    message: "Client error".to_string(),
                }));
            }

            response
                .json::<serde_json::Value>()
                .await
                .map_err(|e| backoff::Error::permanent(SourceError::ParseError(e.to_string())))
        })
        .await
    }
}

#[async_trait]
impl TransactionSource for SafeClientSource {
    async fn fetch_transaction(&self, tx_id: &str) -> Result<TxDetails, SourceError> {
        debug!("Fetching transaction {} from {}", tx_id, self.base_url);

        let body = self.get_json(tx_id).await?;
        TxDetails::from_json_value(body).map_err(|e| SourceError::ParseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_url() {
        let source = SafeClientSource::new(
            "https://safe-client.safe.global/v1/chains/1/transactions/".to_string(),
            Duration::from_secs(1),
        );
        assert_eq!(
            source.transaction_url("multisig_0xabc_0xdef"),
            "https://safe-client.safe.global/v1/chains/1/transactions/multisig_0xabc_0xdef"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let source = SafeClientSource::new(
            "http://127.0.0.1:1/v1/chains/1/transactions".to_string(),
            Duration::from_millis(10),
        );
        let err = source.fetch_transaction("tx").await.unwrap_err();
        assert!(matches!(err, SourceError::NetworkError(_)));
    }
}
