use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::MAX_WIRE_VALUE_SIZE;
use crate::error::AuctionResult;
use crate::util::{cbor_from_limited_reader, to_cbor};

/// One accepted bid, owned by its auction record.
///
/// Bid rows are append-only and immutable once written. The ledger only
/// accepts a bid strictly above the price visible at acceptance, so for
/// a given auction the amounts are strictly increasing in `bid_time`
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    /// Store-assigned identity
    pub id: u64,

    /// The auction this bid belongs to
    pub auction_id: u64,

    /// Bidder's internal user id, when known
    pub bidder_id: Option<u64>,

    /// Bidder's address (string identity)
    pub bidder_address: String,

    /// Bid amount, exact decimal
    pub amount: Decimal,

    /// Caller-supplied external transaction reference, recorded opaquely
    pub external_ref: Option<String>,

    /// Unix timestamp assigned at acceptance
    pub bid_time: u64,
}

impl Bid {
    /// Serialize to CBOR for wire transport.
    pub fn to_cbor(&self) -> AuctionResult<Vec<u8>> {
        to_cbor(self)
    }

    /// Deserialize from CBOR.
    pub fn from_cbor(data: &[u8]) -> AuctionResult<Self> {
        cbor_from_limited_reader(data, MAX_WIRE_VALUE_SIZE)
    }
}

/// A bid row joined with the bidder's display name, for history views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidView {
    #[serde(flatten)]
    pub bid: Bid,
    /// Display name of the bidder, when the directory knows them
    pub bidder_name: Option<String>,
}
