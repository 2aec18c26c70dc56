//! Read-only projections over the record store.
//!
//! Pure reads reflecting committed state; no side effects, no
//! invariants of their own.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::AuctionEngine;
use crate::error::{AuctionError, AuctionResult};
use crate::model::{AuctionItem, BidView, ItemStatus, TransactionHistory};
use crate::traits::{RecordStore, TimeProvider};

/// An auction record joined with its owner's display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemView {
    #[serde(flatten)]
    pub item: AuctionItem,
    /// Display name of the current owner, when the directory knows them
    pub owner_name: Option<String>,
}

impl<S: RecordStore, T: TimeProvider> AuctionEngine<S, T> {
    /// Point read by auction id.
    pub async fn item(&self, id: u64) -> AuctionResult<AuctionItem> {
        self.require_item(id).await
    }

    /// Every record, regardless of status.
    pub async fn all_items(&self) -> AuctionResult<Vec<AuctionItem>> {
        self.store().all_items().await.map_err(AuctionError::store)
    }

    /// Submissions waiting for review.
    pub async fn pending_items(&self) -> AuctionResult<Vec<AuctionItem>> {
        self.store()
            .items_by_status(ItemStatus::Pending)
            .await
            .map_err(AuctionError::store)
    }

    /// Items currently open on the marketplace.
    pub async fn marketplace_items(&self) -> AuctionResult<Vec<AuctionItem>> {
        self.store()
            .items_by_status(ItemStatus::Listed)
            .await
            .map_err(AuctionError::store)
    }

    /// Items owned by an address.
    pub async fn items_by_owner(&self, owner_address: &str) -> AuctionResult<Vec<AuctionItem>> {
        self.store()
            .items_by_owner(owner_address)
            .await
            .map_err(AuctionError::store)
    }

    /// Items owned by an internal user id.
    pub async fn items_by_owner_id(&self, owner_id: u64) -> AuctionResult<Vec<AuctionItem>> {
        self.store()
            .items_by_owner_id(owner_id)
            .await
            .map_err(AuctionError::store)
    }

    /// Keyword match over title and description.
    pub async fn search(&self, keyword: &str) -> AuctionResult<Vec<AuctionItem>> {
        debug!(keyword, "Searching items");
        self.store()
            .search_items(keyword)
            .await
            .map_err(AuctionError::store)
    }

    /// Bid ledger for an auction, newest first, each entry joined with
    /// the bidder's display name.
    pub async fn bid_history(&self, auction_id: u64) -> AuctionResult<Vec<BidView>> {
        let bids = self
            .store()
            .bids_for(auction_id)
            .await
            .map_err(AuctionError::store)?;

        let mut views = Vec::with_capacity(bids.len());
        for bid in bids {
            let bidder_name = match bid.bidder_id {
                Some(uid) => self
                    .store()
                    .display_name(uid)
                    .await
                    .map_err(AuctionError::store)?,
                None => None,
            };
            views.push(BidView { bid, bidder_name });
        }
        Ok(views)
    }

    /// Transfer history for an auction, oldest first.
    pub async fn transaction_history(
        &self,
        auction_id: u64,
    ) -> AuctionResult<Vec<TransactionHistory>> {
        self.store()
            .history_for(auction_id)
            .await
            .map_err(AuctionError::store)
    }

    /// Attach owner display names to a set of records.
    pub async fn with_owner_names(
        &self,
        items: Vec<AuctionItem>,
    ) -> AuctionResult<Vec<ItemView>> {
        let mut views = Vec::with_capacity(items.len());
        for item in items {
            let owner_name = match item.owner_id {
                Some(uid) => self
                    .store()
                    .display_name(uid)
                    .await
                    .map_err(AuctionError::store)?,
                None => None,
            };
            views.push(ItemView { item, owner_name });
        }
        Ok(views)
    }

    /// Marketplace listing joined with owner display names.
    pub async fn marketplace_with_owner_names(&self) -> AuctionResult<Vec<ItemView>> {
        let items = self.marketplace_items().await?;
        self.with_owner_names(items).await
    }
}
