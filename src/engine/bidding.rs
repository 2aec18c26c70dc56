//! The bid ledger: validates and appends bids, keeping the record's
//! current price monotonically increasing under concurrent submissions.

use rust_decimal::Decimal;
use tracing::{debug, info};

use super::AuctionEngine;
use crate::error::{AuctionError, AuctionResult};
use crate::model::{AuctionItem, ItemStatus};
use crate::traits::{ItemPatch, NewBid, RecordStore, TimeProvider, UpdateGuard};

/// Parameters for a bid submission.
#[derive(Debug, Clone)]
pub struct BidRequest {
    pub auction_id: u64,
    pub bidder_id: Option<u64>,
    pub bidder_address: String,
    pub amount: Decimal,
    /// External transaction reference, recorded opaquely.
    pub external_ref: Option<String>,
}

impl<S: RecordStore, T: TimeProvider> AuctionEngine<S, T> {
    /// Place a bid on a listed auction.
    ///
    /// A bid at or below the visible floor is `Declined` — an expected
    /// outcome, not a fault. The price write is a single conditional
    /// update guarded on the record still being `Listed` *and* its
    /// current price still being below the bid at commit time; losing
    /// that race is `Conflict` and the caller decides whether to re-read
    /// and retry. Guarding on status alone would let two concurrent
    /// bids above the old price both commit, dropping one amount.
    pub async fn place_bid(&self, req: BidRequest) -> AuctionResult<AuctionItem> {
        let id = req.auction_id;
        let item = self.require_item(id).await?;

        if item.status != ItemStatus::Listed {
            return Err(AuctionError::InvalidState(format!(
                "auction {id} is {}, not open for bidding",
                item.status
            )));
        }

        let now = self.now();
        if now < item.auction_start {
            return Err(AuctionError::WindowViolation(format!(
                "auction {id} has not started (opens at {})",
                item.auction_start
            )));
        }
        if item.has_ended(now) {
            return Err(AuctionError::WindowViolation(format!(
                "auction {id} already ended (closed at {})",
                item.auction_end
            )));
        }

        let floor = item.bid_floor();
        if req.amount <= floor {
            debug!(id, amount = %req.amount, floor = %floor, "Bid below floor, declined");
            return Err(AuctionError::Declined(format!(
                "bid {} is not above the current price {floor}",
                req.amount
            )));
        }

        let applied = self
            .store()
            .update_item(
                id,
                ItemPatch {
                    current_price: Some(req.amount),
                    updated_at: now,
                    ..ItemPatch::default()
                },
                Some(UpdateGuard::status_and_price(ItemStatus::Listed, req.amount)),
            )
            .await
            .map_err(AuctionError::store)?;
        if !applied {
            return Err(AuctionError::Conflict(format!(
                "auction {id} was outbid or closed before the bid committed"
            )));
        }

        let bid = self
            .store()
            .append_bid(NewBid {
                auction_id: id,
                bidder_id: req.bidder_id,
                bidder_address: req.bidder_address,
                amount: req.amount,
                external_ref: req.external_ref,
                bid_time: now,
            })
            .await
            .map_err(AuctionError::store)?;

        info!(id, bid_id = bid.id, amount = %bid.amount, "Accepted bid");
        self.reload_item(id).await
    }
}
