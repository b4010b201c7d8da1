//! CSV ledger output.

use crate::domain::{sort_transfers_for_ledger, Transfer};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("cannot create ledger {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("csv write error: {0}")]
    Csv(String),
}

/// Matches the field names of `LedgerRow`, written up front so an empty ledger
/// still has a header.
const LEDGER_HEADER: [&str; 4] = ["receiver", "amount", "token", "name"];

/// Column order follows the `Transfer` fields: receiver, amount, token, name.
#[derive(Debug, Serialize)]
struct LedgerRow {
    receiver: String,
    amount: String,
    token: String,
    name: String,
}

impl From<&Transfer> for LedgerRow {
    fn from(transfer: &Transfer) -> Self {
        Self {
            receiver: transfer.receiver.to_string(),
            amount: transfer.amount.to_string(),
            token: transfer.token.to_string(),
            name: transfer.name.clone(),
        }
    }
}

/// Write the transfers sorted by receiver (descending, case-insensitive).
///
/// Returns the number of rows written. The header is emitted even for an empty list.
pub fn write_ledger<W: Write>(writer: W, transfers: &[Transfer]) -> Result<usize, LedgerError> {
    let mut sorted = transfers.to_vec();
    sort_transfers_for_ledger(&mut sorted);

    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer
        .write_record(LEDGER_HEADER)
        .map_err(|e| LedgerError::Csv(e.to_string()))?;

    for transfer in &sorted {
        csv_writer
            .serialize(LedgerRow::from(transfer))
            .map_err(|e| LedgerError::Csv(e.to_string()))?;
    }
    csv_writer
        .flush()
        .map_err(|e| LedgerError::Csv(e.to_string()))?;

    Ok(sorted.len())
}

pub fn write_ledger_file(
    path: impl AsRef<Path>,
    transfers: &[Transfer],
) -> Result<usize, LedgerError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| LedgerError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let written = write_ledger(file, transfers)?;
    tracing::info!("Wrote {} transfers to {}", written, path.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, Amount, TokenId};

    #[test]
    fn test_write_ledger_rows() {
        let token = Address::parse("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap();
        let transfers = vec![
            Transfer::new(
                Address::parse("0x1111111111111111111111111111111111111111").unwrap(),
                Amount::from(10u64),
                TokenId::Native,
                "0x1111111111111111111111111111111111111111".to_string(),
            ),
            Transfer::new(
                Address::parse("0x2222222222222222222222222222222222222222").unwrap(),
                Amount::from(20u64),
                TokenId::Erc20(token),
                "solver, with comma".to_string(),
            ),
        ];

        let mut out = Vec::new();
        let written = write_ledger(&mut out, &transfers).unwrap();
        assert_eq!(written, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "receiver,amount,token,name");
        assert_eq!(
            lines[1],
            "0x2222222222222222222222222222222222222222,20,0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed,\"solver, with comma\""
        );
        assert_eq!(
            lines[2],
            "0x1111111111111111111111111111111111111111,10,NATIVE,0x1111111111111111111111111111111111111111"
        );
    }

    #[test]
    fn test_header_matches_row_fields() {
        let row = LedgerRow {
            receiver: String::new(),
            amount: String::new(),
            token: String::new(),
            name: String::new(),
        };
        let mut out = Vec::new();
        {
            let mut csv_writer = csv::Writer::from_writer(&mut out);
            csv_writer.serialize(row).unwrap();
            csv_writer.flush().unwrap();
        }
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.lines().next(), Some(LEDGER_HEADER.join(",").as_str()));
    }

    #[test]
    fn test_write_empty_ledger_keeps_header() {
        let mut out = Vec::new();
        assert_eq!(write_ledger(&mut out, &[]).unwrap(), 0);
        assert_eq!(String::from_utf8(out).unwrap(), "receiver,amount,token,name\n");
    }

    #[test]
    fn test_write_ledger_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_ledger_file(&path, &[]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("receiver,amount,token,name"));
    }
}
