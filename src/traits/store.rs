//! Record store abstraction for auction records, bids and history.
//!
//! The engine performs every mutation through [`RecordStore::update_item`]
//! with an optional [`UpdateGuard`]; the guard is the only serialization
//! point between concurrent callers touching the same auction. Bid and
//! history rows are append-only and need no concurrency control beyond
//! insert durability.

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::model::{AuctionItem, Bid, ItemStatus, TransactionHistory};

/// Field values for a new auction record. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: String,
    pub description: String,
    pub category: String,
    pub image_ref: String,
    pub attachment_refs: Vec<String>,
    pub owner_address: String,
    pub owner_id: Option<u64>,
    pub start_price: Decimal,
    pub status: ItemStatus,
    pub created_at: u64,
    pub updated_at: u64,
    pub auction_start: u64,
    pub auction_end: u64,
}

/// Field values for a new bid row. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewBid {
    pub auction_id: u64,
    pub bidder_id: Option<u64>,
    pub bidder_address: String,
    pub amount: Decimal,
    pub external_ref: Option<String>,
    pub bid_time: u64,
}

/// Field values for a new transaction-history row. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewHistory {
    pub auction_id: u64,
    pub seller_id: Option<u64>,
    pub buyer_id: Option<u64>,
    pub final_price: Decimal,
    pub external_ref: Option<String>,
    pub settled_at: u64,
}

/// Mutable fields of an auction record. `None` leaves a field untouched.
///
/// `updated_at` is always written; every mutation refreshes it.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub status: Option<ItemStatus>,
    pub current_price: Option<Decimal>,
    /// New owner address and owner id, set together on transfer.
    pub owner: Option<(String, Option<u64>)>,
    /// Review/closure note. The outer `Some` writes the field, including
    /// `Some(None)` to clear it.
    pub reason: Option<Option<String>>,
    pub updated_at: u64,
}

/// Precondition evaluated against the record's current fields at commit
/// time. The update applies only while the guard holds.
#[derive(Debug, Clone)]
pub struct UpdateGuard {
    /// Required current status.
    pub status: ItemStatus,
    /// When set, the current price must be unset or strictly below this
    /// amount. Guarding on price as well as status closes the
    /// lost-update race between two simultaneous bids.
    pub price_below: Option<Decimal>,
}

impl UpdateGuard {
    /// Guard on status only.
    pub const fn status_is(status: ItemStatus) -> Self {
        Self {
            status,
            price_below: None,
        }
    }

    /// Guard on status and on the current price being below `amount`.
    pub const fn status_and_price(status: ItemStatus, amount: Decimal) -> Self {
        Self {
            status,
            price_below: Some(amount),
        }
    }

    /// Evaluate the guard against a record's current fields.
    pub fn holds_for(&self, item: &AuctionItem) -> bool {
        if item.status != self.status {
            return false;
        }
        match self.price_below {
            Some(ceiling) => item.current_price.map_or(true, |p| p < ceiling),
            None => true,
        }
    }
}

/// Durable storage for auction records, bid rows and history rows.
///
/// Implementations must make `update_item` atomic with respect to other
/// `update_item` calls on the same id: the guard is evaluated and the
/// patch applied as one step, never interleaved with another writer.
#[async_trait]
pub trait RecordStore: Send + Sync + Clone {
    /// Insert a new auction record and return it with its assigned id.
    ///
    /// The identity comes back from the same call; there is no separate
    /// "last inserted id" read.
    async fn insert_item(&self, item: NewItem) -> Result<AuctionItem>;

    /// Point read. `None` when no record has this id.
    async fn get_item(&self, id: u64) -> Result<Option<AuctionItem>>;

    /// Conditionally update a record.
    ///
    /// Returns `true` when the patch was applied, `false` when the record
    /// is missing or the guard did not hold at commit time. `None` for
    /// the guard applies unconditionally (administrative overwrite).
    async fn update_item(
        &self,
        id: u64,
        patch: ItemPatch,
        guard: Option<UpdateGuard>,
    ) -> Result<bool>;

    /// Append a bid row and return it with its assigned id.
    async fn append_bid(&self, bid: NewBid) -> Result<Bid>;

    /// Append a history row and return it with its assigned id.
    async fn append_history(&self, entry: NewHistory) -> Result<TransactionHistory>;

    /// The winning candidate for an auction: maximum amount, tie-broken
    /// by earliest `bid_time`, then lowest id.
    async fn highest_bid(&self, auction_id: u64) -> Result<Option<Bid>>;

    /// All bids for an auction, newest first.
    async fn bids_for(&self, auction_id: u64) -> Result<Vec<Bid>>;

    /// All history rows for an auction, oldest first.
    async fn history_for(&self, auction_id: u64) -> Result<Vec<TransactionHistory>>;

    /// All records with the given status.
    async fn items_by_status(&self, status: ItemStatus) -> Result<Vec<AuctionItem>>;

    /// All records owned by the given address.
    async fn items_by_owner(&self, owner_address: &str) -> Result<Vec<AuctionItem>>;

    /// All records owned by the given internal user id.
    async fn items_by_owner_id(&self, owner_id: u64) -> Result<Vec<AuctionItem>>;

    /// Every record in the store.
    async fn all_items(&self) -> Result<Vec<AuctionItem>>;

    /// Case-insensitive substring match over title and description.
    async fn search_items(&self, keyword: &str) -> Result<Vec<AuctionItem>>;

    /// Display name for an internal user id, for joined projections.
    async fn display_name(&self, user_id: u64) -> Result<Option<String>>;
}
