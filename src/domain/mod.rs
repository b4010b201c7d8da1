//! Domain types for multisend reconciliation.
//!
//! This module provides:
//! - Checksummed addresses with case-insensitive identity
//! - Lossless 256-bit base-unit amounts and 512-bit running totals
//! - The transaction envelope, parsed once into strict types
//! - Address book entries, expected payouts and transfer records
//! - Stable ledger ordering

pub mod address_book;
pub mod amount;
pub mod ordering;
pub mod payout;
pub mod primitives;
pub mod transaction;
pub mod transfer;

pub use address_book::{AddressBookEntry, MAINNET_CHAIN_ID};
pub use amount::{Amount, AmountError, Total};
pub use ordering::sort_transfers_for_ledger;
pub use payout::{ExpectedPayout, TransferKind};
pub use primitives::{Address, AddressParseError, TokenId, NATIVE_TOKEN};
pub use transaction::{DecodedCall, EnvelopeError, SubTransaction, TxDetails};
pub use transfer::Transfer;
