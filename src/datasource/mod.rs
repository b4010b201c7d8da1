//! Inputs of a reconciliation run: the transaction envelope, the address book and
//! the payout plan.

use crate::domain::TxDetails;
use async_trait::async_trait;
use std::fmt;

pub mod address_book;
pub mod mock;
pub mod payouts;
pub mod safe_client;

pub use address_book::{load_address_book, read_address_book, AddressBookError};
pub use mock::MockTransactionSource;
pub use payouts::{load_payouts, read_payouts, PayoutError};
pub use safe_client::SafeClientSource;

/// Source of decoded multisend transactions.
#[async_trait]
pub trait TransactionSource: Send + Sync + fmt::Debug {
    /// Fetch a transaction by its transaction-service id and parse it into
    /// strict domain types.
    async fn fetch_transaction(&self, tx_id: &str) -> Result<TxDetails, SourceError>;
}

/// Error type for transaction source operations.
#[derive(Debug, Clone)]
pub enum SourceError {
    /// Network error (e.g., connection timeout, DNS failure)
    NetworkError(String),
    /// HTTP error (e.g., 404 unknown transaction, 5xx server error)
    HttpError { status: u16, message: String },
    /// Parsing error (invalid JSON or malformed envelope)
    ParseError(String),
    /// Rate limit exceeded
    RateLimited,
    /// Transaction id unknown to the source
    NotFound(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            SourceError::HttpError { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            SourceError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            SourceError::RateLimited => write!(f, "Rate limited"),
            SourceError::NotFound(tx_id) => write!(f, "Transaction not found: {}", tx_id),
        }
    }
}

impl std::error::Error for SourceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_display() {
        let err = SourceError::NetworkError("connection timeout".to_string());
        assert_eq!(err.to_string(), "Network error: connection timeout");

        let err = SourceError::HttpError {
            status: 502,
            message: "Server error".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error 502: Server error");

        let err = SourceError::ParseError("invalid JSON".to_string());
        assert_eq!(err.to_string(), "Parse error: invalid JSON");

        let err = SourceError::RateLimited;
        assert_eq!(err.to_string(), "Rate limited");

        let err = SourceError::NotFound("multisig_0xabc".to_string());
        assert_eq!(err.to_string(), "Transaction not found: multisig_0xabc");
    }
}
