use crate::domain::{Address, Amount};
use crate::engine::DEFAULT_PAYOUT_TOLERANCE;
use std::collections::HashMap;
use thiserror::Error;

pub const DEFAULT_SAFE_CLIENT_URL: &str = "https://safe-client.safe.global/v1/chains/1/transactions";
/// MultiSendCallOnly v1.3.0.
pub const DEFAULT_MULTISEND_ADDRESS: &str = "0x40a2accbd92bca938b02010e17a5b8929b49130d";
/// Mainnet WETH.
pub const DEFAULT_WRAPPED_NATIVE_TOKEN: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";
/// Mainnet COW.
pub const DEFAULT_PRIMARY_TOKEN: &str = "0xdef1ca1fb7fbcae1afd3b0e6e5e2c76e5f1bb3e9";

#[derive(Debug, Clone)]
pub struct Config {
    pub safe_client_url: String,
    pub multisend_address: Address,
    pub wrapped_native_token: Address,
    pub primary_token: Address,
    pub token_decimals: u8,
    pub payout_tolerance: Amount,
    pub address_book_path: String,
    pub ledger_path: String,
    pub fetch_timeout_secs: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let safe_client_url = env_map
            .get("SAFE_CLIENT_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_SAFE_CLIENT_URL.to_string());

        let multisend_address =
            parse_address_from_map(&env_map, "MULTISEND_ADDRESS", DEFAULT_MULTISEND_ADDRESS)?;
        let wrapped_native_token = parse_address_from_map(
            &env_map,
            "WRAPPED_NATIVE_TOKEN",
            DEFAULT_WRAPPED_NATIVE_TOKEN,
        )?;
        let primary_token =
            parse_address_from_map(&env_map, "PRIMARY_TOKEN", DEFAULT_PRIMARY_TOKEN)?;

        let token_decimals = env_map
            .get("TOKEN_DECIMALS")
            .map(|s| s.as_str())
            .unwrap_or("18")
            .parse::<u8>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "TOKEN_DECIMALS".to_string(),
                    "must be a valid u8".to_string(),
                )
            })?;
        if token_decimals > 77 {
            return Err(ConfigError::InvalidValue(
                "TOKEN_DECIMALS".to_string(),
                format!("must be at most 77, got {}", token_decimals),
            ));
        }

        let payout_tolerance = match env_map.get("PAYOUT_TOLERANCE") {
            Some(raw) => Amount::from_base_units(raw).map_err(|_| {
                ConfigError::InvalidValue(
                    "PAYOUT_TOLERANCE".to_string(),
                    "must be a non-negative integer in base units".to_string(),
                )
            })?,
            None => Amount::from(DEFAULT_PAYOUT_TOLERANCE),
        };

        let address_book_path = env_map
            .get("ADDRESS_BOOK_PATH")
            .cloned()
            .unwrap_or_else(|| "AddressBook.csv".to_string());

        let ledger_path = env_map
            .get("LEDGER_PATH")
            .cloned()
            .unwrap_or_else(|| "out.csv".to_string());

        let fetch_timeout_secs = env_map
            .get("FETCH_TIMEOUT_SECS")
            .map(|s| s.as_str())
            .unwrap_or("30")
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "FETCH_TIMEOUT_SECS".to_string(),
                    "must be a valid u64".to_string(),
                )
            })?;

        Ok(Config {
            safe_client_url,
            multisend_address,
            wrapped_native_token,
            primary_token,
            token_decimals,
            payout_tolerance,
            address_book_path,
            ledger_path,
            fetch_timeout_secs,
        })
    }
}

fn parse_address_from_map(
    env_map: &HashMap<String, String>,
    key: &str,
    default: &str,
) -> Result<Address, ConfigError> {
    let raw = env_map.get(key).map(|s| s.as_str()).unwrap_or(default);
    Address::parse(raw).map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string()))
}
