//! Settlement: closes a listed auction exactly once, resolving the
//! winner, recording the transfer, and flipping the terminal status.

use rust_decimal::Decimal;
use tracing::{info, warn};

use super::AuctionEngine;
use crate::config::UNKNOWN_BUYER;
use crate::error::{AuctionError, AuctionResult};
use crate::model::{AuctionItem, ItemStatus};
use crate::traits::{ItemPatch, NewHistory, RecordStore, TimeProvider, UpdateGuard};

/// Parameters for closing an auction.
///
/// With an explicit buyer this is a direct sale; without one the winner
/// is the highest bidder, or the current owner when nobody bid.
#[derive(Debug, Clone, Default)]
pub struct SettleRequest {
    pub auction_id: u64,
    /// Explicit buyer address. `None` or the `"unknown"` sentinel means
    /// "resolve from the bid ledger".
    pub buyer_address: Option<String>,
    pub buyer_id: Option<u64>,
    /// Final price for a direct sale; ignored when the winner comes from
    /// the bid ledger.
    pub final_price: Option<Decimal>,
    /// External transaction reference, recorded opaquely.
    pub external_ref: Option<String>,
    /// Close before the window expires (administrative override).
    pub force_end: bool,
}

/// The winner a settlement resolved to.
struct ResolvedWinner {
    address: String,
    user_id: Option<u64>,
    price: Option<Decimal>,
}

impl<S: RecordStore, T: TimeProvider> AuctionEngine<S, T> {
    /// Settle a listed auction.
    ///
    /// The final conditional update on `status == Listed` is the
    /// single-writer point: of N concurrent settles exactly one
    /// commits, the rest fail `Conflict`. The history row is written
    /// before the flip, and a retry after a crash between the two finds
    /// the row already present and does not duplicate it.
    pub async fn settle(&self, req: SettleRequest) -> AuctionResult<AuctionItem> {
        let id = req.auction_id;
        let item = self.require_item(id).await?;

        // Fast-path check; the conditional update below is the guard.
        if item.status != ItemStatus::Listed {
            return Err(AuctionError::InvalidState(format!(
                "auction {id} is {}, not open for settlement",
                item.status
            )));
        }

        let now = self.now();
        if !req.force_end && !item.has_ended(now) {
            return Err(AuctionError::WindowViolation(format!(
                "auction {id} has not ended (closes at {})",
                item.auction_end
            )));
        }

        let winner = self.resolve_winner(&item, &req).await?;
        let ownership_changes = winner.address != item.owner_address;

        if ownership_changes {
            if let Some(price) = winner.price {
                self.record_transfer(&item, &winner, price, req.external_ref.clone(), now)
                    .await?;
            } else {
                warn!(id, "Ownership transfer without a known final price; no history row");
            }
        }

        let (new_status, patch) = if ownership_changes {
            (
                ItemStatus::Sold,
                ItemPatch {
                    status: Some(ItemStatus::Sold),
                    owner: Some((winner.address.clone(), winner.user_id)),
                    current_price: winner.price,
                    updated_at: now,
                    ..ItemPatch::default()
                },
            )
        } else {
            // No transfer: close the record and leave price and owner
            // untouched.
            (
                ItemStatus::Delisted,
                ItemPatch {
                    status: Some(ItemStatus::Delisted),
                    updated_at: now,
                    ..ItemPatch::default()
                },
            )
        };

        let applied = self
            .store()
            .update_item(id, patch, Some(UpdateGuard::status_is(ItemStatus::Listed)))
            .await
            .map_err(AuctionError::store)?;
        if !applied {
            return Err(AuctionError::Conflict(format!(
                "auction {id} was already settled"
            )));
        }

        info!(id, status = %new_status, winner = %winner.address, "Settled auction");
        self.reload_item(id).await
    }

    /// Winner resolution: explicit buyer, else highest bid, else the
    /// current owner (closing without a transfer).
    async fn resolve_winner(
        &self,
        item: &AuctionItem,
        req: &SettleRequest,
    ) -> AuctionResult<ResolvedWinner> {
        let explicit = req
            .buyer_address
            .as_deref()
            .filter(|addr| *addr != UNKNOWN_BUYER);

        if let Some(address) = explicit {
            return Ok(ResolvedWinner {
                address: address.to_string(),
                user_id: req.buyer_id,
                price: req.final_price,
            });
        }

        match self
            .store()
            .highest_bid(item.id)
            .await
            .map_err(AuctionError::store)?
        {
            Some(bid) => Ok(ResolvedWinner {
                address: bid.bidder_address,
                user_id: bid.bidder_id,
                price: Some(bid.amount),
            }),
            None => Ok(ResolvedWinner {
                address: item.owner_address.clone(),
                user_id: item.owner_id,
                price: None,
            }),
        }
    }

    /// Write the history row for a transfer, unless one already exists
    /// for this auction (idempotent retry after a crash between the
    /// history write and the status flip).
    async fn record_transfer(
        &self,
        item: &AuctionItem,
        winner: &ResolvedWinner,
        price: Decimal,
        external_ref: Option<String>,
        now: u64,
    ) -> AuctionResult<()> {
        let existing = self
            .store()
            .history_for(item.id)
            .await
            .map_err(AuctionError::store)?;
        if !existing.is_empty() {
            warn!(id = item.id, "History row already present; skipping duplicate");
            return Ok(());
        }

        self.store()
            .append_history(NewHistory {
                auction_id: item.id,
                seller_id: item.owner_id,
                buyer_id: winner.user_id,
                final_price: price,
                external_ref,
                settled_at: now,
            })
            .await
            .map_err(AuctionError::store)?;
        Ok(())
    }
}
