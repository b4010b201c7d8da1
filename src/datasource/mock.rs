//! Mock transaction source for testing without network calls.

use super::{SourceError, TransactionSource};
use crate::domain::TxDetails;
use async_trait::async_trait;
use std::collections::HashMap;

/// Mock source that serves predefined transactions by id.
#[derive(Debug, Clone, Default)]
pub struct MockTransactionSource {
    transactions: HashMap<String, TxDetails>,
}

impl MockTransactionSource {
    /// Create a new mock source with no transactions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `details` for `tx_id`.
    pub fn with_transaction(mut self, tx_id: &str, details: TxDetails) -> Self {
        self.transactions.insert(tx_id.to_string(), details);
        self
    }

    /// Serve the envelope parsed from a transaction-service JSON body.
    pub fn with_json(self, tx_id: &str, body: serde_json::Value) -> Result<Self, SourceError> {
        let details =
            TxDetails::from_json_value(body).map_err(|e| SourceError::ParseError(e.to_string()))?;
        Ok(self.with_transaction(tx_id, details))
    }
}

#[async_trait]
impl TransactionSource for MockTransactionSource {
    async fn fetch_transaction(&self, tx_id: &str) -> Result<TxDetails, SourceError> {
        self.transactions
            .get(tx_id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(tx_id.to_string()))
    }
}
