use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::MAX_WIRE_VALUE_SIZE;
use crate::error::AuctionResult;
use crate::util::{cbor_from_limited_reader, to_cbor};

/// One completed ownership transfer, owned by its auction record.
///
/// Written only by settlement, only when the owner actually changes,
/// exactly once per successful settlement. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionHistory {
    /// Store-assigned identity
    pub id: u64,

    /// The auction this transfer settled
    pub auction_id: u64,

    /// Internal user id of the seller, when known
    pub seller_id: Option<u64>,

    /// Internal user id of the buyer, when known
    pub buyer_id: Option<u64>,

    /// Price the transfer settled at
    pub final_price: Decimal,

    /// Caller-supplied external transaction reference, recorded opaquely
    pub external_ref: Option<String>,

    /// Unix timestamp of settlement
    pub settled_at: u64,
}

impl TransactionHistory {
    /// Serialize to CBOR for wire transport.
    pub fn to_cbor(&self) -> AuctionResult<Vec<u8>> {
        to_cbor(self)
    }

    /// Deserialize from CBOR.
    pub fn from_cbor(data: &[u8]) -> AuctionResult<Self> {
        cbor_from_limited_reader(data, MAX_WIRE_VALUE_SIZE)
    }
}
