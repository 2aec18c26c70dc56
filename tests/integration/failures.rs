//! Storage failures must surface as typed errors, never be swallowed.

use gavel::mocks::MemoryStoreFailure;
use gavel::{AuctionError, ItemDraft, ReviewDecision, SettleRequest};
use rust_decimal::Decimal;

use crate::common::harness::EngineHarness;

#[tokio::test]
async fn test_submit_surfaces_write_failure() {
    let h = EngineHarness::new(1000);
    h.store
        .set_fail_mode(Some(MemoryStoreFailure::Writes))
        .await;

    let draft = ItemDraft::builder()
        .title("Doomed Lot")
        .description("the store is down")
        .category("art")
        .image_ref("img.png")
        .owner_address("0xseller")
        .start_price(Decimal::from(10u64))
        .build()
        .unwrap();

    let result = h.engine.submit(draft).await;
    assert!(matches!(result, Err(AuctionError::Store(_))));
}

#[tokio::test]
async fn test_place_bid_surfaces_read_failure() {
    let h = EngineHarness::new(1000);
    let item = h.listed_item("Flaky Lot", 10).await;

    h.store.set_fail_mode(Some(MemoryStoreFailure::Reads)).await;
    let result = h.engine.place_bid(h.bid(item.id, 2, 15)).await;
    assert!(matches!(result, Err(AuctionError::Store(_))));

    // Recovery: clearing the fault lets the same bid through.
    h.store.set_fail_mode(None).await;
    let after = h.engine.place_bid(h.bid(item.id, 2, 15)).await.unwrap();
    assert_eq!(after.current_price, Some(Decimal::from(15u64)));
}

#[tokio::test]
async fn test_settle_write_failure_leaves_auction_listed() {
    let h = EngineHarness::new(1000);
    let item = h.listed_item("Stuck Lot", 10).await;
    h.engine.place_bid(h.bid(item.id, 2, 15)).await.unwrap();

    h.store
        .set_fail_mode(Some(MemoryStoreFailure::Writes))
        .await;
    let result = h
        .engine
        .settle(SettleRequest {
            auction_id: item.id,
            force_end: true,
            ..SettleRequest::default()
        })
        .await;
    assert!(matches!(result, Err(AuctionError::Store(_))));

    // The record is still LISTED and a retry completes the settlement
    // without duplicating history.
    h.store.set_fail_mode(None).await;
    let item_now = h.engine.item(item.id).await.unwrap();
    assert_eq!(item_now.status, gavel::ItemStatus::Listed);

    let settled = h
        .engine
        .settle(SettleRequest {
            auction_id: item.id,
            force_end: true,
            ..SettleRequest::default()
        })
        .await
        .unwrap();
    assert_eq!(settled.status, gavel::ItemStatus::Sold);
    assert_eq!(
        h.engine.transaction_history(item.id).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn test_review_surfaces_failure_without_partial_state() {
    let h = EngineHarness::new(1000);
    let item = h.listed_item("Reviewed Lot", 10).await;

    h.store.set_fail_mode(Some(MemoryStoreFailure::All)).await;
    let result = h
        .engine
        .review(item.id, ReviewDecision::Rejected, Some("oops".to_string()))
        .await;
    assert!(matches!(result, Err(AuctionError::Store(_))));

    h.store.set_fail_mode(None).await;
    let unchanged = h.engine.item(item.id).await.unwrap();
    assert_eq!(unchanged.status, gavel::ItemStatus::Listed);
    assert_eq!(unchanged.reason, None);
}
