//! Utility functions shared across the engine crate.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{AuctionError, AuctionResult};

/// Serialize a record snapshot to CBOR bytes for wire transport.
pub fn to_cbor<T: Serialize>(value: &T) -> AuctionResult<Vec<u8>> {
    let mut data = Vec::new();
    ciborium::into_writer(value, &mut data)
        .map_err(|e| AuctionError::Serialization(format!("CBOR serialization failed: {e}")))?;
    Ok(data)
}

/// Deserialize CBOR data with a size limit to reject oversized payloads.
pub fn cbor_from_limited_reader<T: DeserializeOwned>(
    data: &[u8],
    max_bytes: usize,
) -> AuctionResult<T> {
    if data.len() > max_bytes {
        return Err(AuctionError::Validation(format!(
            "CBOR payload too large: {} bytes (max {})",
            data.len(),
            max_bytes
        )));
    }
    ciborium::from_reader(data)
        .map_err(|e| AuctionError::Serialization(format!("CBOR deserialization failed: {e}")))
}
