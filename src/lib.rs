//! Lifecycle, bidding and settlement engine for timed auctions.
//!
//! The engine moves an item through submission, review and listing,
//! keeps the bid ledger's price monotonic under concurrent submissions,
//! and settles each auction at most once — by direct sale, highest-bid
//! resolution at expiry, or forced early closure. Storage is an
//! external collaborator behind [`RecordStore`]; the engine holds no
//! in-process locks and serializes same-auction writers only through
//! the store's conditional update.

pub mod assets;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod traits;
pub mod util;

#[cfg(any(test, feature = "test-support"))]
pub mod mocks;

pub use assets::LocalAssets;
pub use engine::{AuctionEngine, BidRequest, ItemView, SettleRequest};
pub use error::{AuctionError, AuctionResult};
pub use model::{
    AuctionItem, Bid, BidView, DraftBuilder, ItemDraft, ItemStatus, ReviewDecision,
    TransactionHistory,
};
pub use traits::{
    AssetStore, ItemPatch, NewBid, NewHistory, NewItem, RecordStore, SystemTimeProvider,
    TimeProvider, UpdateGuard,
};
