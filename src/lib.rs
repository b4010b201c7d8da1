pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod orchestration;

pub use config::Config;
pub use datasource::{MockTransactionSource, SafeClientSource, SourceError, TransactionSource};
pub use domain::{
    Address, AddressBookEntry, Amount, ExpectedPayout, SubTransaction, TokenId, Total,
    Transfer, TransferKind, TxDetails,
};
pub use engine::{
    AddressRegistry, Diagnostic, Reconciler, ReconciliationPolicy, ReconciliationResult,
    ScanAborted, Totals, ValidationError, Verdict,
};
pub use error::AppError;
