//! Expected payout rows the batch is reconciled against.

use crate::domain::{Address, TokenId};
use std::fmt;

/// Kind of transfer a payout row expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferKind {
    Native,
    Erc20,
}

impl fmt::Display for TransferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferKind::Native => write!(f, "native"),
            TransferKind::Erc20 => write!(f, "erc20"),
        }
    }
}

/// One planned payout, aligned by position with the batch's sub-transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedPayout {
    /// `TokenId::Native` for native rows, the token contract for erc20 rows.
    pub token: TokenId,
    pub receiver: Option<Address>,
    /// Decimal string in human units (e.g. `"1.5"`), converted at reconciliation.
    pub amount: Option<String>,
}

impl ExpectedPayout {
    pub fn native(receiver: Option<Address>, amount: Option<String>) -> Self {
        Self {
            token: TokenId::Native,
            receiver,
            amount,
        }
    }

    pub fn erc20(token: Address, receiver: Option<Address>, amount: Option<String>) -> Self {
        Self {
            token: TokenId::Erc20(token),
            receiver,
            amount,
        }
    }

    pub fn kind(&self) -> TransferKind {
        match self.token {
            TokenId::Native => TransferKind::Native,
            TokenId::Erc20(_) => TransferKind::Erc20,
        }
    }
}
