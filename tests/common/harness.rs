//! Test harness for integration testing.
//!
//! Wraps an engine over the shared-state in-memory store and a mock
//! clock, with helpers that walk an item through submission, review and
//! listing so tests can start from a biddable auction.

use gavel::mocks::{MemoryStore, MockTime};
use gavel::{AuctionEngine, AuctionItem, BidRequest, ItemDraft, ReviewDecision};
use rust_decimal::Decimal;

/// Default window length used by harness listings: one hour.
pub const WINDOW_SECS: u64 = 3600;

pub struct EngineHarness {
    pub engine: AuctionEngine<MemoryStore, MockTime>,
    pub store: MemoryStore,
    pub time: MockTime,
}

#[allow(dead_code)]
impl EngineHarness {
    /// Create a harness with the clock at `start_time`.
    pub fn new(start_time: u64) -> Self {
        let store = MemoryStore::new();
        let time = MockTime::new(start_time);
        let engine = AuctionEngine::with_time(store.clone(), time.clone());
        Self {
            engine,
            store,
            time,
        }
    }

    /// Submit, approve and list an item whose window opens now and runs
    /// for [`WINDOW_SECS`]. Returns the listed record.
    pub async fn listed_item(&self, title: &str, start_price: u64) -> AuctionItem {
        let now = self.time.get();
        let draft = ItemDraft::builder()
            .title(title)
            .description(format!("{title} (integration fixture)"))
            .category("art")
            .image_ref("img.png")
            .owner_address("0xseller")
            .owner_id(1)
            .start_price(Decimal::from(start_price))
            .window(now, now + WINDOW_SECS)
            .build()
            .expect("fixture draft is complete");

        let item = self.engine.submit(draft).await.expect("submit fixture");
        self.engine
            .review(item.id, ReviewDecision::Approved, None)
            .await
            .expect("approve fixture");
        self.engine
            .list(item.id, Decimal::from(start_price))
            .await
            .expect("list fixture")
    }

    /// Submit and approve an item without listing it.
    pub async fn approved_item(&self, title: &str, start_price: u64) -> AuctionItem {
        let draft = ItemDraft::builder()
            .title(title)
            .description(format!("{title} (integration fixture)"))
            .category("art")
            .image_ref("img.png")
            .owner_address("0xseller")
            .owner_id(1)
            .start_price(Decimal::from(start_price))
            .build()
            .expect("fixture draft is complete");

        let item = self.engine.submit(draft).await.expect("submit fixture");
        self.engine
            .review(item.id, ReviewDecision::Approved, None)
            .await
            .expect("approve fixture")
    }

    /// A bid request from numbered bidder `n`.
    pub fn bid(&self, auction_id: u64, bidder: u64, amount: u64) -> BidRequest {
        BidRequest {
            auction_id,
            bidder_id: Some(bidder),
            bidder_address: format!("0xbidder{bidder}"),
            amount: Decimal::from(amount),
            external_ref: None,
        }
    }
}
