//! Lossless base-unit amounts.
//!
//! `Amount` holds a single on-chain value (uint256). `Total` accumulates many of
//! them in 512 bits, so a batch sum never overflows.

use alloy_primitives::utils::{format_units, parse_units, ParseUnits};
use alloy_primitives::{U256, U512};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("invalid base-unit amount {0:?}")]
    InvalidBaseUnits(String),
    #[error("invalid human-readable amount {input:?}: {reason}")]
    InvalidUnits { input: String, reason: String },
    #[error("negative amount {0:?}")]
    Negative(String),
}

/// Non-negative integer amount in base units (wei for the native currency).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(U256);

impl Amount {
    /// Parse a base-unit decimal string (`"1000"`) without loss.
    pub fn from_base_units(s: &str) -> Result<Self, AmountError> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(AmountError::InvalidBaseUnits(s.to_string()));
        }
        U256::from_str_radix(trimmed, 10)
            .map(Amount)
            .map_err(|_| AmountError::InvalidBaseUnits(s.to_string()))
    }

    /// Convert a human-readable decimal string (`"1.5"`) into base units.
    ///
    /// Fractional digits beyond `decimals` are truncated, so the result can be
    /// short by less than one base unit.
    pub fn from_human_units(s: &str, decimals: u8) -> Result<Self, AmountError> {
        let parsed = parse_units(s.trim(), decimals).map_err(|e| AmountError::InvalidUnits {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        match parsed {
            ParseUnits::U256(value) => Ok(Amount(value)),
            ParseUnits::I256(value) if value.is_negative() => {
                Err(AmountError::Negative(s.to_string()))
            }
            ParseUnits::I256(value) => Ok(Amount(value.into_raw())),
        }
    }

    /// Render in human units with the given number of decimals.
    pub fn to_human_units(&self, decimals: u8) -> String {
        format_units(self.0, decimals).unwrap_or_else(|_| self.0.to_string())
    }

    pub fn zero() -> Self {
        Amount(U256::ZERO)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Absolute difference between two amounts.
    pub fn abs_diff(&self, other: Amount) -> Amount {
        if self.0 >= other.0 {
            Amount(self.0 - other.0)
        } else {
            Amount(other.0 - self.0)
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base_units(s)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Amount(U256::from(value))
    }
}

impl From<U256> for Amount {
    fn from(value: U256) -> Self {
        Amount(value)
    }
}

/// Running sum of amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Total(U512);

impl Total {
    pub fn zero() -> Self {
        Total(U512::ZERO)
    }

    /// Add one amount. A batch would need 2^256 maximal values to overflow 512 bits.
    pub fn accumulate(self, amount: Amount) -> Self {
        Total(self.0 + U512::from(amount.0))
    }

    /// Render in human units with the given number of decimals.
    pub fn to_human_units(&self, decimals: u8) -> String {
        if decimals == 0 {
            return self.0.to_string();
        }
        let scale = U512::from(10u8).pow(U512::from(decimals));
        let whole = self.0 / scale;
        let fraction = self.0 % scale;
        format!(
            "{}.{:0>width$}",
            whole,
            fraction.to_string(),
            width = decimals as usize
        )
    }
}

impl From<Amount> for Total {
    fn from(amount: Amount) -> Self {
        Total::zero().accumulate(amount)
    }
}

impl fmt::Display for Total {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
