//! The auction engine: lifecycle transitions, the bid ledger,
//! settlement, and read-only query views.
//!
//! The engine holds no in-process locks. Every mutation of an auction
//! record goes through the store's conditional update; a failed
//! condition surfaces as [`AuctionError::Conflict`] and is never
//! retried automatically — retry policy belongs to the caller.

pub mod bidding;
pub mod lifecycle;
pub mod queries;
pub mod settlement;

pub use bidding::BidRequest;
pub use queries::ItemView;
pub use settlement::SettleRequest;

use crate::error::{AuctionError, AuctionResult};
use crate::model::AuctionItem;
use crate::traits::{RecordStore, SystemTimeProvider, TimeProvider};

/// Engine over a record store and a clock.
///
/// Cloneable and cheap to share: concurrent callers may invoke any
/// operation on the same engine instance; serialization per auction id
/// happens in the store's conditional update, not here.
#[derive(Debug, Clone)]
pub struct AuctionEngine<S, T = SystemTimeProvider> {
    store: S,
    time: T,
}

impl<S: RecordStore> AuctionEngine<S> {
    /// Create an engine using the system clock.
    pub fn new(store: S) -> Self {
        Self {
            store,
            time: SystemTimeProvider::new(),
        }
    }
}

impl<S: RecordStore, T: TimeProvider> AuctionEngine<S, T> {
    /// Create an engine with an injected clock.
    pub fn with_time(store: S, time: T) -> Self {
        Self { store, time }
    }

    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn now(&self) -> u64 {
        self.time.now_unix()
    }

    /// Load a record or fail with `NotFound`.
    pub(crate) async fn require_item(&self, id: u64) -> AuctionResult<AuctionItem> {
        self.store
            .get_item(id)
            .await
            .map_err(AuctionError::store)?
            .ok_or(AuctionError::NotFound(id))
    }

    /// Re-read a record after a committed update. A record that vanishes
    /// between commit and re-read is a storage fault, not a NotFound.
    pub(crate) async fn reload_item(&self, id: u64) -> AuctionResult<AuctionItem> {
        self.store
            .get_item(id)
            .await
            .map_err(AuctionError::store)?
            .ok_or_else(|| {
                AuctionError::store(anyhow::anyhow!(
                    "record {id} disappeared after a committed update"
                ))
            })
    }
}
