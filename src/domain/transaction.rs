//! Multisend transaction envelope and its decoded sub-transactions.
//!
//! The transaction service returns loosely typed JSON. It is deserialized into the
//! `Raw*` shapes below and converted exactly once into the strict domain types, so
//! nothing past this module ever sees an unchecked string address or amount.

use crate::domain::{Address, AddressParseError, Amount, AmountError};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("invalid transaction JSON: {0}")]
    Json(String),
    #[error("missing field {0}")]
    MissingField(&'static str),
    #[error("{field}: {source}")]
    Address {
        field: String,
        #[source]
        source: AddressParseError,
    },
    #[error("{field}: {source}")]
    Amount {
        field: String,
        #[source]
        source: AmountError,
    },
    #[error("{field}: invalid call data: {reason}")]
    CallData { field: String, reason: String },
}

/// Decoded contract call: method name plus positional parameter values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCall {
    pub method: String,
    pub parameters: Vec<String>,
}

/// One call inside a multisend batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubTransaction {
    pub to: Address,
    pub value: Amount,
    /// Raw call data; `None` for plain native-currency transfers.
    pub data: Option<Vec<u8>>,
    pub data_decoded: Option<DecodedCall>,
    /// 0 = call, anything else = delegatecall.
    pub operation: u8,
}

impl SubTransaction {
    pub fn method(&self) -> Option<&str> {
        self.data_decoded.as_ref().map(|d| d.method.as_str())
    }

    pub fn parameter_count(&self) -> usize {
        self.data_decoded
            .as_ref()
            .map(|d| d.parameters.len())
            .unwrap_or(0)
    }
}

/// The outer multisend transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxDetails {
    /// Contract the outer transaction calls.
    pub target: Address,
    pub method: String,
    pub value: Amount,
    pub sub_transactions: Vec<SubTransaction>,
}

impl TxDetails {
    /// Parse the transaction-service JSON body.
    pub fn from_json_str(body: &str) -> Result<Self, EnvelopeError> {
        let raw: RawTxDetails =
            serde_json::from_str(body).map_err(|e| EnvelopeError::Json(e.to_string()))?;
        raw.try_into()
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, EnvelopeError> {
        let raw: RawTxDetails =
            serde_json::from_value(value).map_err(|e| EnvelopeError::Json(e.to_string()))?;
        raw.try_into()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTxDetails {
    tx_info: RawTxInfo,
    tx_data: RawTxData,
}

#[derive(Debug, Deserialize)]
struct RawTxInfo {
    to: RawAddressInfo,
}

#[derive(Debug, Deserialize)]
struct RawAddressInfo {
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTxData {
    value: Option<String>,
    data_decoded: Option<RawOuterDecoded>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOuterDecoded {
    method: String,
    #[serde(default)]
    parameters: Vec<RawOuterParameter>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOuterParameter {
    value_decoded: Option<Vec<RawSubTransaction>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSubTransaction {
    to: String,
    value: Option<String>,
    data: Option<String>,
    data_decoded: Option<RawCallDecoded>,
    #[serde(default)]
    operation: u8,
}

#[derive(Debug, Deserialize)]
struct RawCallDecoded {
    method: String,
    #[serde(default)]
    parameters: Vec<RawCallParameter>,
}

#[derive(Debug, Deserialize)]
struct RawCallParameter {
    value: serde_json::Value,
}

impl TryFrom<RawTxDetails> for TxDetails {
    type Error = EnvelopeError;

    fn try_from(raw: RawTxDetails) -> Result<Self, Self::Error> {
        let target = parse_address("txInfo.to.value", &raw.tx_info.to.value)?;
        let value = parse_amount("txData.value", raw.tx_data.value.as_deref())?;
        let decoded = raw
            .tx_data
            .data_decoded
            .ok_or(EnvelopeError::MissingField("txData.dataDecoded"))?;
        let raw_subs = decoded
            .parameters
            .into_iter()
            .next()
            .and_then(|p| p.value_decoded)
            .ok_or(EnvelopeError::MissingField(
                "txData.dataDecoded.parameters[0].valueDecoded",
            ))?;

        let sub_transactions = raw_subs
            .into_iter()
            .enumerate()
            .map(|(index, sub)| sub.into_domain(index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TxDetails {
            target,
            method: decoded.method,
            value,
            sub_transactions,
        })
    }
}

impl RawSubTransaction {
    fn into_domain(self, index: usize) -> Result<SubTransaction, EnvelopeError> {
        let field = |name: &str| format!("valueDecoded[{}].{}", index, name);

        let to = Address::parse(&self.to).map_err(|source| EnvelopeError::Address {
            field: field("to"),
            source,
        })?;
        let value = match self.value.as_deref() {
            None => Amount::zero(),
            Some(v) => Amount::from_base_units(v).map_err(|source| EnvelopeError::Amount {
                field: field("value"),
                source,
            })?,
        };
        let data = match self.data {
            None => None,
            Some(hex_str) => {
                let stripped = hex_str.strip_prefix("0x").unwrap_or(&hex_str);
                Some(hex::decode(stripped).map_err(|e| EnvelopeError::CallData {
                    field: field("data"),
                    reason: e.to_string(),
                })?)
            }
        };
        let data_decoded = self.data_decoded.map(|d| DecodedCall {
            method: d.method,
            parameters: d
                .parameters
                .into_iter()
                .map(|p| parameter_to_string(p.value))
                .collect(),
        });

        Ok(SubTransaction {
            to,
            value,
            data,
            data_decoded,
            operation: self.operation,
        })
    }
}

fn parameter_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

fn parse_address(field: &str, value: &str) -> Result<Address, EnvelopeError> {
    Address::parse(value).map_err(|source| EnvelopeError::Address {
        field: field.to_string(),
        source,
    })
}

fn parse_amount(field: &str, value: Option<&str>) -> Result<Amount, EnvelopeError> {
    match value {
        None => Ok(Amount::zero()),
        Some(v) => Amount::from_base_units(v).map_err(|source| EnvelopeError::Amount {
            field: field.to_string(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(subs: serde_json::Value) -> serde_json::Value {
        json!({
            "txInfo": { "to": { "value": "0x40A2aCCbd92BCA938b02010E17A5b8929b49130D" } },
            "txData": {
                "value": "0",
                "dataDecoded": {
                    "method": "multiSend",
                    "parameters": [{ "name": "transactions", "valueDecoded": subs }]
                }
            }
        })
    }

    #[test]
    fn test_parse_envelope() {
        let body = envelope(json!([
            {
                "operation": 0,
                "to": "0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359",
                "value": "1000",
                "data": null,
                "dataDecoded": null
            },
            {
                "operation": 0,
                "to": "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
                "value": "0",
                "data": "0xa9059cbb",
                "dataDecoded": {
                    "method": "transfer",
                    "parameters": [
                        { "name": "to", "type": "address", "value": "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB" },
                        { "name": "value", "type": "uint256", "value": "42" }
                    ]
                }
            }
        ]));

        let details = TxDetails::from_json_value(body).unwrap();
        assert_eq!(details.method, "multiSend");
        assert!(details.value.is_zero());
        assert_eq!(details.sub_transactions.len(), 2);

        let native = &details.sub_transactions[0];
        assert!(native.data.is_none());
        assert_eq!(native.value, Amount::from(1000u64));

        let token = &details.sub_transactions[1];
        assert_eq!(token.data.as_deref(), Some(&[0xa9, 0x05, 0x9c, 0xbb][..]));
        assert_eq!(token.method(), Some("transfer"));
        assert_eq!(token.parameter_count(), 2);
        assert_eq!(
            token.data_decoded.as_ref().unwrap().parameters[1],
            "42".to_string()
        );
    }

    #[test]
    fn test_non_string_parameters_are_stringified() {
        let body = envelope(json!([{
            "to": "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "value": "0",
            "data": "0x",
            "dataDecoded": { "method": "batch", "parameters": [{ "value": [1, 2] }] }
        }]));
        let details = TxDetails::from_json_value(body).unwrap();
        let sub = &details.sub_transactions[0];
        assert_eq!(sub.data.as_deref(), Some(&[][..]));
        assert_eq!(sub.data_decoded.as_ref().unwrap().parameters[0], "[1,2]");
        assert_eq!(sub.operation, 0);
    }

    #[test]
    fn test_missing_value_decoded_is_rejected() {
        let body = json!({
            "txInfo": { "to": { "value": "0x40A2aCCbd92BCA938b02010E17A5b8929b49130D" } },
            "txData": { "value": "0", "dataDecoded": { "method": "multiSend", "parameters": [] } }
        });
        let err = TxDetails::from_json_value(body).unwrap_err();
        assert!(matches!(err, EnvelopeError::MissingField(_)));
    }

    #[test]
    fn test_malformed_sub_transaction_address_is_rejected() {
        let body = envelope(json!([{ "to": "0x1234", "value": "0", "data": null }]));
        let err = TxDetails::from_json_value(body).unwrap_err();
        match err {
            EnvelopeError::Address { field, .. } => assert_eq!(field, "valueDecoded[0].to"),
            other => panic!("Expected Address error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_value_is_rejected() {
        let body = envelope(json!([{
            "to": "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "value": "1.5",
            "data": null
        }]));
        let err = TxDetails::from_json_value(body).unwrap_err();
        assert!(matches!(err, EnvelopeError::Amount { .. }));
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let err = TxDetails::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, EnvelopeError::Json(_)));
    }
}
