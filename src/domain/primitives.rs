//! Domain primitives: Address, TokenId.

use std::str::FromStr;
use thiserror::Error;

/// Sentinel used in the ledger for native-currency transfers.
pub const NATIVE_TOKEN: &str = "NATIVE";

/// Error returned when a string cannot be normalized to a checksummed address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed address {input:?}: {reason}")]
pub struct AddressParseError {
    pub input: String,
    pub reason: String,
}

impl AddressParseError {
    fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// 20-byte account address.
///
/// Equality and hashing operate on the raw bytes, so two strings that differ only
/// in case parse to the same `Address`. Display renders the EIP-55 checksummed form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(alloy_primitives::Address);

impl Address {
    /// Parse a `0x`-prefixed hex address.
    ///
    /// All-lowercase and all-uppercase inputs are accepted as-is. Mixed-case input
    /// must carry a valid EIP-55 checksum.
    pub fn parse(input: &str) -> Result<Self, AddressParseError> {
        let trimmed = input.trim();
        let hex_part = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| AddressParseError::new(input, "address must start with 0x"))?;

        if hex_part.len() != 40 {
            return Err(AddressParseError::new(
                input,
                format!("expected 40 hex characters, got {}", hex_part.len()),
            ));
        }
        if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AddressParseError::new(
                input,
                "address contains non-hex characters",
            ));
        }

        let is_all_lower = hex_part.chars().all(|c| !c.is_ascii_uppercase());
        let is_all_upper = hex_part.chars().all(|c| !c.is_ascii_lowercase());

        let inner = if is_all_lower || is_all_upper {
            alloy_primitives::Address::from_str(hex_part)
                .map_err(|e| AddressParseError::new(input, e.to_string()))?
        } else {
            alloy_primitives::Address::parse_checksummed(format!("0x{}", hex_part), None)
                .map_err(|_| AddressParseError::new(input, "invalid EIP-55 checksum"))?
        };

        Ok(Address(inner))
    }

    /// EIP-55 checksummed representation.
    pub fn to_checksum(&self) -> String {
        self.0.to_checksum(None)
    }

    /// Lowercase hex representation, used as the case-insensitive sort key.
    pub fn to_lowercase_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0.as_slice()))
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_checksum())
    }
}

/// Asset moved by a transfer: the chain's native currency or a token contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenId {
    Native,
    Erc20(Address),
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenId::Native => write!(f, "{}", NATIVE_TOKEN),
            TokenId::Erc20(address) => write!(f, "{}", address),
        }
    }
}
