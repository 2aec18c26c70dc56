//! In-memory record store for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::model::{AuctionItem, Bid, ItemStatus, TransactionHistory};
use crate::traits::{ItemPatch, NewBid, NewHistory, NewItem, RecordStore, UpdateGuard};

/// Types of failures that can be simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryStoreFailure {
    /// Fail all operations.
    All,
    /// Fail only read operations.
    Reads,
    /// Fail only write operations.
    Writes,
}

#[derive(Debug, Default)]
struct Tables {
    items: HashMap<u64, AuctionItem>,
    bids: Vec<Bid>,
    history: Vec<TransactionHistory>,
    users: HashMap<u64, String>,
}

#[derive(Debug)]
struct MemoryStoreInner {
    tables: RwLock<Tables>,
    next_item_id: AtomicU64,
    next_bid_id: AtomicU64,
    next_history_id: AtomicU64,
    next_user_id: AtomicU64,
    fail_mode: RwLock<Option<MemoryStoreFailure>>,
}

/// Shared-state in-memory [`RecordStore`].
///
/// Clones share the underlying tables, so many engine handles (or many
/// tasks) operate on one dataset. `update_item` evaluates its guard and
/// applies its patch under a single write lock, giving the same
/// atomicity a database conditional update would.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MemoryStoreInner {
                tables: RwLock::new(Tables::default()),
                next_item_id: AtomicU64::new(1),
                next_bid_id: AtomicU64::new(1),
                next_history_id: AtomicU64::new(1),
                next_user_id: AtomicU64::new(1),
                fail_mode: RwLock::new(None),
            }),
        }
    }

    /// Simulate storage failures for subsequent operations.
    pub async fn set_fail_mode(&self, mode: Option<MemoryStoreFailure>) {
        *self.inner.fail_mode.write().await = mode;
    }

    /// Add a user to the directory and return the assigned id.
    pub async fn register_user(&self, name: &str) -> u64 {
        let id = self.inner.next_user_id.fetch_add(1, Ordering::SeqCst);
        self.inner
            .tables
            .write()
            .await
            .users
            .insert(id, name.to_string());
        id
    }

    async fn check_read(&self) -> Result<()> {
        match *self.inner.fail_mode.read().await {
            Some(MemoryStoreFailure::All) | Some(MemoryStoreFailure::Reads) => {
                bail!("simulated storage read failure")
            }
            _ => Ok(()),
        }
    }

    async fn check_write(&self) -> Result<()> {
        match *self.inner.fail_mode.read().await {
            Some(MemoryStoreFailure::All) | Some(MemoryStoreFailure::Writes) => {
                bail!("simulated storage write failure")
            }
            _ => Ok(()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_item(&self, item: NewItem) -> Result<AuctionItem> {
        self.check_write().await?;
        let id = self.inner.next_item_id.fetch_add(1, Ordering::SeqCst);
        let record = AuctionItem {
            id,
            title: item.title,
            description: item.description,
            category: item.category,
            image_ref: item.image_ref,
            attachment_refs: item.attachment_refs,
            owner_address: item.owner_address,
            owner_id: item.owner_id,
            start_price: item.start_price,
            current_price: None,
            status: item.status,
            reason: None,
            created_at: item.created_at,
            updated_at: item.updated_at,
            auction_start: item.auction_start,
            auction_end: item.auction_end,
        };
        self.inner
            .tables
            .write()
            .await
            .items
            .insert(id, record.clone());
        Ok(record)
    }

    async fn get_item(&self, id: u64) -> Result<Option<AuctionItem>> {
        self.check_read().await?;
        Ok(self.inner.tables.read().await.items.get(&id).cloned())
    }

    async fn update_item(
        &self,
        id: u64,
        patch: ItemPatch,
        guard: Option<UpdateGuard>,
    ) -> Result<bool> {
        self.check_write().await?;

        // Guard evaluation and patch application under one write lock:
        // this is the compare-and-swap the engine relies on.
        let mut tables = self.inner.tables.write().await;
        let Some(item) = tables.items.get_mut(&id) else {
            return Ok(false);
        };
        if let Some(guard) = &guard {
            if !guard.holds_for(item) {
                return Ok(false);
            }
        }

        if let Some(status) = patch.status {
            item.status = status;
        }
        if let Some(price) = patch.current_price {
            item.current_price = Some(price);
        }
        if let Some((address, user_id)) = patch.owner {
            item.owner_address = address;
            item.owner_id = user_id;
        }
        if let Some(reason) = patch.reason {
            item.reason = reason;
        }
        item.updated_at = patch.updated_at;
        Ok(true)
    }

    async fn append_bid(&self, bid: NewBid) -> Result<Bid> {
        self.check_write().await?;
        let id = self.inner.next_bid_id.fetch_add(1, Ordering::SeqCst);
        let row = Bid {
            id,
            auction_id: bid.auction_id,
            bidder_id: bid.bidder_id,
            bidder_address: bid.bidder_address,
            amount: bid.amount,
            external_ref: bid.external_ref,
            bid_time: bid.bid_time,
        };
        self.inner.tables.write().await.bids.push(row.clone());
        Ok(row)
    }

    async fn append_history(&self, entry: NewHistory) -> Result<TransactionHistory> {
        self.check_write().await?;
        let id = self.inner.next_history_id.fetch_add(1, Ordering::SeqCst);
        let row = TransactionHistory {
            id,
            auction_id: entry.auction_id,
            seller_id: entry.seller_id,
            buyer_id: entry.buyer_id,
            final_price: entry.final_price,
            external_ref: entry.external_ref,
            settled_at: entry.settled_at,
        };
        self.inner.tables.write().await.history.push(row.clone());
        Ok(row)
    }

    async fn highest_bid(&self, auction_id: u64) -> Result<Option<Bid>> {
        self.check_read().await?;
        let tables = self.inner.tables.read().await;
        Ok(tables
            .bids
            .iter()
            .filter(|b| b.auction_id == auction_id)
            .max_by(|a, b| {
                // Highest amount wins; ties go to the earliest bid,
                // then the lowest id.
                a.amount
                    .cmp(&b.amount)
                    .then_with(|| b.bid_time.cmp(&a.bid_time))
                    .then_with(|| b.id.cmp(&a.id))
            })
            .cloned())
    }

    async fn bids_for(&self, auction_id: u64) -> Result<Vec<Bid>> {
        self.check_read().await?;
        let tables = self.inner.tables.read().await;
        let mut bids: Vec<Bid> = tables
            .bids
            .iter()
            .filter(|b| b.auction_id == auction_id)
            .cloned()
            .collect();
        bids.sort_by(|a, b| b.bid_time.cmp(&a.bid_time).then_with(|| b.id.cmp(&a.id)));
        Ok(bids)
    }

    async fn history_for(&self, auction_id: u64) -> Result<Vec<TransactionHistory>> {
        self.check_read().await?;
        let tables = self.inner.tables.read().await;
        Ok(tables
            .history
            .iter()
            .filter(|h| h.auction_id == auction_id)
            .cloned()
            .collect())
    }

    async fn items_by_status(&self, status: ItemStatus) -> Result<Vec<AuctionItem>> {
        self.check_read().await?;
        let tables = self.inner.tables.read().await;
        let mut items: Vec<AuctionItem> = tables
            .items
            .values()
            .filter(|i| i.status == status)
            .cloned()
            .collect();
        items.sort_by_key(|i| i.id);
        Ok(items)
    }

    async fn items_by_owner(&self, owner_address: &str) -> Result<Vec<AuctionItem>> {
        self.check_read().await?;
        let tables = self.inner.tables.read().await;
        let mut items: Vec<AuctionItem> = tables
            .items
            .values()
            .filter(|i| i.owner_address == owner_address)
            .cloned()
            .collect();
        items.sort_by_key(|i| i.id);
        Ok(items)
    }

    async fn items_by_owner_id(&self, owner_id: u64) -> Result<Vec<AuctionItem>> {
        self.check_read().await?;
        let tables = self.inner.tables.read().await;
        let mut items: Vec<AuctionItem> = tables
            .items
            .values()
            .filter(|i| i.owner_id == Some(owner_id))
            .cloned()
            .collect();
        items.sort_by_key(|i| i.id);
        Ok(items)
    }

    async fn all_items(&self) -> Result<Vec<AuctionItem>> {
        self.check_read().await?;
        let tables = self.inner.tables.read().await;
        let mut items: Vec<AuctionItem> = tables.items.values().cloned().collect();
        items.sort_by_key(|i| i.id);
        Ok(items)
    }

    async fn search_items(&self, keyword: &str) -> Result<Vec<AuctionItem>> {
        self.check_read().await?;
        let needle = keyword.to_lowercase();
        let tables = self.inner.tables.read().await;
        let mut items: Vec<AuctionItem> = tables
            .items
            .values()
            .filter(|i| {
                i.title.to_lowercase().contains(&needle)
                    || i.description.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        items.sort_by_key(|i| i.id);
        Ok(items)
    }

    async fn display_name(&self, user_id: u64) -> Result<Option<String>> {
        self.check_read().await?;
        Ok(self.inner.tables.read().await.users.get(&user_id).cloned())
    }
}
