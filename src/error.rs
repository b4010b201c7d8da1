use crate::config::ConfigError;
use crate::datasource::{AddressBookError, PayoutError, SourceError};
use crate::engine::ScanAborted;
use crate::ledger::LedgerError;
use thiserror::Error;

/// Anything that stops a reconciliation run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Address book error: {0}")]
    AddressBook(#[from] AddressBookError),
    #[error("Payout plan error: {0}")]
    Payouts(#[from] PayoutError),
    #[error("Transaction source error: {0}")]
    Source(#[from] SourceError),
    #[error("{0}")]
    Validation(#[from] ScanAborted),
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl AppError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Validation(_) => 2,
            _ => 1,
        }
    }
}
