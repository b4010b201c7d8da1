//! Transfer ledger record.

use crate::domain::{Address, Amount, TokenId};

/// One payout extracted from the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub receiver: Address,
    pub amount: Amount,
    pub token: TokenId,
    /// Address book label of the receiver, or the raw address when unknown.
    pub name: String,
}

impl Transfer {
    pub fn new(receiver: Address, amount: Amount, token: TokenId, name: String) -> Self {
        Self {
            receiver,
            amount,
            token,
            name,
        }
    }
}
