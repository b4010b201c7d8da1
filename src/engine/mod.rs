//! Pure reconciliation engine: registry, checks, classifier and batch scan.

use crate::config::Config;
use crate::domain::{Address, Amount, Transfer};
use std::fmt;

pub mod classifier;
pub mod reconcile;
pub mod registry;
pub mod validation;

pub use classifier::{classify, Classifier};
pub use reconcile::{BatchScanner, Reconciler, ReconciliationResult, ScanAborted, Totals, Verdict};
pub use registry::{AddressBookRow, AddressRegistry, RegistryError};
pub use validation::{Diagnostic, Diagnostics, Mismatch, ValidationError};

/// Method the outer transaction must invoke on the multisend contract.
pub const MULTISEND_METHOD: &str = "multiSend";
/// Decimals of the chain's native currency.
pub const NATIVE_DECIMALS: u8 = 18;
/// Allowed base-unit gap between a payout row and the on-chain amount.
pub const DEFAULT_PAYOUT_TOLERANCE: u64 = 5_000;

/// Kind of a sub-transaction, decided before any validation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubTransactionKind {
    /// No call data: moves the native currency.
    NativeTransfer,
    /// Call to the wrapped-native token contract.
    WrappedUnwrap,
    /// Any other call, expected to be an ERC20 `transfer`.
    TokenTransfer,
}

impl fmt::Display for SubTransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubTransactionKind::NativeTransfer => write!(f, "native transfer"),
            SubTransactionKind::WrappedUnwrap => write!(f, "wrapped-native unwrap"),
            SubTransactionKind::TokenTransfer => write!(f, "token transfer"),
        }
    }
}

/// Fixed addresses and limits a batch is checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationPolicy {
    pub multisend: Address,
    pub wrapped_native: Address,
    pub primary_token: Address,
    pub token_decimals: u8,
    pub payout_tolerance: Amount,
}

impl ReconciliationPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            multisend: config.multisend_address,
            wrapped_native: config.wrapped_native_token,
            primary_token: config.primary_token,
            token_decimals: config.token_decimals,
            payout_tolerance: config.payout_tolerance,
        }
    }
}

/// Outcome of processing one sub-transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedTransfer {
    pub kind: SubTransactionKind,
    /// `None` for unwraps, which are validated but not paid out.
    pub transfer: Option<Transfer>,
    pub native_delta: Amount,
    pub token_delta: Amount,
}
