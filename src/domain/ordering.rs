//! Stable transfer ordering for the ledger.

use crate::domain::Transfer;
use std::cmp::Ordering;

/// Compare two receivers case-insensitively, larger address first.
pub fn receiver_descending(a: &Transfer, b: &Transfer) -> Ordering {
    let key_a = a.receiver.to_lowercase_hex();
    let key_b = b.receiver.to_lowercase_hex();
    key_b.cmp(&key_a)
}

/// Sort transfers by receiver, descending. Equal receivers keep their batch order.
pub fn sort_transfers_for_ledger(transfers: &mut [Transfer]) {
    transfers.sort_by(receiver_descending);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, Amount, TokenId};

    fn transfer(receiver: &str, amount: u64) -> Transfer {
        Transfer::new(
            Address::parse(receiver).unwrap(),
            Amount::from(amount),
            TokenId::Native,
            receiver.to_string(),
        )
    }

    #[test]
    fn test_sort_descending() {
        let mut transfers = vec![
            transfer("0x1111111111111111111111111111111111111111", 1),
            transfer("0xffffffffffffffffffffffffffffffffffffffff", 2),
            transfer("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", 3),
        ];

        sort_transfers_for_ledger(&mut transfers);

        let amounts: Vec<String> = transfers.iter().map(|t| t.amount.to_string()).collect();
        assert_eq!(amounts, vec!["2", "3", "1"]);
    }

    #[test]
    fn test_sort_ignores_case() {
        let mut transfers = vec![
            transfer("0xBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB", 1),
            transfer("0xcccccccccccccccccccccccccccccccccccccccc", 2),
            transfer("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", 3),
        ];

        sort_transfers_for_ledger(&mut transfers);

        let amounts: Vec<String> = transfers.iter().map(|t| t.amount.to_string()).collect();
        assert_eq!(amounts, vec!["2", "1", "3"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_receivers() {
        let mut transfers = vec![
            transfer("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", 1),
            transfer("0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb", 2),
            transfer("0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA", 3),
        ];

        sort_transfers_for_ledger(&mut transfers);

        let amounts: Vec<String> = transfers.iter().map(|t| t.amount.to_string()).collect();
        assert_eq!(amounts, vec!["2", "1", "3"]);
    }
}
