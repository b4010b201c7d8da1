//! Payout plan CSV loader.
//!
//! Rows use the CSV-airdrop layout `token_type,token_address,receiver,amount[,id]`
//! and line up by position with the batch's sub-transactions.

use crate::domain::{Address, ExpectedPayout};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayoutError {
    #[error("cannot open payout plan {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("csv parse error: {0}")]
    Csv(String),
    #[error("payout row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },
}

#[derive(Debug, Deserialize)]
struct PayoutRow {
    token_type: String,
    #[serde(default)]
    token_address: Option<String>,
    #[serde(default)]
    receiver: Option<String>,
    #[serde(default)]
    amount: Option<String>,
}

pub fn read_payouts<R: Read>(reader: R) -> Result<Vec<ExpectedPayout>, PayoutError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut payouts = Vec::new();
    for (index, record) in reader.deserialize::<PayoutRow>().enumerate() {
        let row = record.map_err(|e| PayoutError::Csv(e.to_string()))?;
        payouts.push(parse_row(index + 1, row)?);
    }

    tracing::info!("Payout plan loaded: {} rows", payouts.len());
    Ok(payouts)
}

pub fn load_payouts(path: impl AsRef<Path>) -> Result<Vec<ExpectedPayout>, PayoutError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| PayoutError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_payouts(file)
}

fn parse_row(row: usize, raw: PayoutRow) -> Result<ExpectedPayout, PayoutError> {
    let invalid = |reason: String| PayoutError::InvalidRow { row, reason };

    let receiver = non_empty(raw.receiver)
        .map(|r| Address::parse(&r))
        .transpose()
        .map_err(|e| invalid(e.to_string()))?;
    let amount = non_empty(raw.amount);

    match raw.token_type.to_ascii_lowercase().as_str() {
        "native" => Ok(ExpectedPayout::native(receiver, amount)),
        "erc20" => {
            let token = non_empty(raw.token_address)
                .ok_or_else(|| invalid("erc20 row without token_address".to_string()))?;
            let token = Address::parse(&token).map_err(|e| invalid(e.to_string()))?;
            Ok(ExpectedPayout::erc20(token, receiver, amount))
        }
        other => Err(invalid(format!(
            "token_type must be native or erc20, got {:?}",
            other
        ))),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
