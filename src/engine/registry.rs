//! In-memory address registry with derived authorization sets.

use crate::domain::{Address, AddressBookEntry, AddressParseError};
use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("address book row {row}: {source}")]
    MalformedAddress {
        row: usize,
        #[source]
        source: AddressParseError,
    },
    #[error("address book row {row}: invalid chainId {value:?}")]
    InvalidChainId { row: usize, value: String },
}

/// Unvalidated address book row as it appears in the CSV file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddressBookRow {
    pub address: String,
    pub name: String,
    #[serde(rename = "chainId")]
    pub chain_id: String,
}

impl AddressBookRow {
    pub fn new(address: &str, name: &str, chain_id: u64) -> Self {
        Self {
            address: address.to_string(),
            name: name.to_string(),
            chain_id: chain_id.to_string(),
        }
    }
}

/// Known addresses plus the solver and reward-target sets derived from their names.
///
/// Built once per run and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct AddressRegistry {
    entries: Vec<AddressBookEntry>,
    solvers: HashSet<Address>,
    reward_targets: HashSet<Address>,
}

impl AddressRegistry {
    /// Validate the rows and derive the authorization sets.
    ///
    /// Rows are numbered from 1 in errors. Duplicate addresses are kept; lookups
    /// return the first one.
    pub fn build<I>(rows: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = AddressBookRow>,
    {
        let mut registry = AddressRegistry::default();

        for (index, row) in rows.into_iter().enumerate() {
            let row_number = index + 1;
            let address = Address::parse(&row.address).map_err(|source| {
                RegistryError::MalformedAddress {
                    row: row_number,
                    source,
                }
            })?;
            let chain_id = row.chain_id.trim().parse::<u64>().map_err(|_| {
                RegistryError::InvalidChainId {
                    row: row_number,
                    value: row.chain_id.clone(),
                }
            })?;

            let entry = AddressBookEntry::new(address, row.name, chain_id);
            if entry.is_solver() {
                registry.solvers.insert(address);
            } else if entry.is_reward_target() {
                registry.reward_targets.insert(address);
            }
            registry.entries.push(entry);
        }

        tracing::info!(
            "Address registry loaded: {} entries, {} solvers, {} reward targets",
            registry.entries.len(),
            registry.solvers.len(),
            registry.reward_targets.len()
        );

        Ok(registry)
    }

    pub fn entries(&self) -> &[AddressBookEntry] {
        &self.entries
    }

    pub fn lookup(&self, address: &Address) -> Option<&AddressBookEntry> {
        self.entries.iter().find(|entry| entry.address == *address)
    }

    /// Label for an address given as text.
    ///
    /// Returns `"<checksummed> (<name> @ chainId <id>)"` for a known address and the
    /// input unchanged otherwise, including input that is not an address at all.
    pub fn resolve_display_name(&self, address: &str) -> String {
        Address::parse(address)
            .ok()
            .and_then(|parsed| self.lookup(&parsed))
            .map(AddressBookEntry::full_name)
            .unwrap_or_else(|| address.to_string())
    }

    /// Label for a parsed address; unknown addresses render checksummed.
    pub fn display_name(&self, address: &Address) -> String {
        self.lookup(address)
            .map(AddressBookEntry::full_name)
            .unwrap_or_else(|| address.to_string())
    }

    pub fn is_solver(&self, address: &Address) -> bool {
        self.solvers.contains(address)
    }

    pub fn is_reward_target(&self, address: &Address) -> bool {
        self.reward_targets.contains(address)
    }

    pub fn solvers(&self) -> impl Iterator<Item = &Address> {
        self.solvers.iter()
    }

    pub fn reward_targets(&self) -> impl Iterator<Item = &Address> {
        self.reward_targets.iter()
    }
}
