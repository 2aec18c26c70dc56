//! Data model for the auction engine: the mutable auction record and
//! its append-only children (bids, transaction history).

pub mod bid;
pub mod history;
pub mod item;

pub use bid::{Bid, BidView};
pub use history::TransactionHistory;
pub use item::{AuctionItem, DraftBuilder, ItemDraft, ItemStatus, ReviewDecision};
