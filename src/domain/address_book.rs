//! Address book entry.

use crate::domain::Address;

/// Chain id of Ethereum mainnet; only mainnet entries feed the authorization sets.
pub const MAINNET_CHAIN_ID: u64 = 1;

/// A labelled address from the address book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressBookEntry {
    pub address: Address,
    pub name: String,
    pub chain_id: u64,
}

impl AddressBookEntry {
    pub fn new(address: Address, name: String, chain_id: u64) -> Self {
        Self {
            address,
            name,
            chain_id,
        }
    }

    /// Human label used in diagnostics and the ledger `name` column.
    pub fn full_name(&self) -> String {
        format!("{} ({} @ chainId {})", self.address, self.name, self.chain_id)
    }

    /// Names of the form `prod-*` or `barn-*` on mainnet.
    pub fn is_solver(&self) -> bool {
        self.chain_id == MAINNET_CHAIN_ID
            && (self.name.starts_with("prod-") || self.name.starts_with("barn-"))
    }

    /// Names of the form `RewardTarget(...)` on mainnet.
    pub fn is_reward_target(&self) -> bool {
        self.chain_id == MAINNET_CHAIN_ID
            && self.name.starts_with("RewardTarget(")
            && self.name.ends_with(')')
    }
}
