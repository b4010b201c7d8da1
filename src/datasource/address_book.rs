//! Address book CSV loader.

use crate::engine::{AddressBookRow, AddressRegistry, RegistryError};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AddressBookError {
    #[error("cannot open address book {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("csv parse error: {0}")]
    Csv(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Parse `address,name,chainId` rows and build the registry.
pub fn read_address_book<R: Read>(reader: R) -> Result<AddressRegistry, AddressBookError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let rows = reader
        .deserialize::<AddressBookRow>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AddressBookError::Csv(e.to_string()))?;

    Ok(AddressRegistry::build(rows)?)
}

pub fn load_address_book(path: impl AsRef<Path>) -> Result<AddressRegistry, AddressBookError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| AddressBookError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_address_book(file)
}
