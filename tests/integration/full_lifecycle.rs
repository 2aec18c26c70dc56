//! End-to-end lifecycle scenarios: submission through settlement.

use gavel::{AuctionError, ItemStatus, SettleRequest};
use rust_decimal::Decimal;

use crate::common::harness::EngineHarness;

#[tokio::test]
async fn test_full_auction_with_bids_ends_sold() {
    // Item listed at 10, window [t0, t0+1h). Bid 15 accepted, bid 12
    // declined, bid 20 accepted; forced settlement sells to the bidder
    // of 20 and records a history row at 20.
    let h = EngineHarness::new(1000);
    let item = h.listed_item("Scripted Lot", 10).await;

    h.time.advance(60);
    let after = h.engine.place_bid(h.bid(item.id, 2, 15)).await.unwrap();
    assert_eq!(after.current_price, Some(Decimal::from(15u64)));

    h.time.advance(60);
    let low = h.engine.place_bid(h.bid(item.id, 3, 12)).await;
    assert!(matches!(low, Err(AuctionError::Declined(_))));

    h.time.advance(60);
    let after = h.engine.place_bid(h.bid(item.id, 4, 20)).await.unwrap();
    assert_eq!(after.current_price, Some(Decimal::from(20u64)));

    h.time.advance(60);
    let settled = h
        .engine
        .settle(SettleRequest {
            auction_id: item.id,
            force_end: true,
            ..SettleRequest::default()
        })
        .await
        .unwrap();

    assert_eq!(settled.status, ItemStatus::Sold);
    assert_eq!(settled.owner_address, "0xbidder4");
    assert_eq!(settled.current_price, Some(Decimal::from(20u64)));

    let history = h.engine.transaction_history(item.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].final_price, Decimal::from(20u64));
    assert_eq!(history[0].buyer_id, Some(4));

    // A late bid on the sold item is refused.
    h.time.advance(60);
    let late = h.engine.place_bid(h.bid(item.id, 5, 25)).await;
    assert!(matches!(late, Err(AuctionError::InvalidState(_))));
}

#[tokio::test]
async fn test_expired_auction_without_bids_ends_delisted() {
    let h = EngineHarness::new(1000);
    let item = h.listed_item("Unwanted Lot", 10).await;

    // Let the window lapse, then close it.
    h.time.advance(3600 + 1);
    let settled = h
        .engine
        .settle(SettleRequest {
            auction_id: item.id,
            force_end: true,
            ..SettleRequest::default()
        })
        .await
        .unwrap();

    assert_eq!(settled.status, ItemStatus::Delisted);
    assert_eq!(settled.owner_address, "0xseller");
    assert!(h
        .engine
        .transaction_history(item.id)
        .await
        .unwrap()
        .is_empty());

    // Terminal state: nothing mutates the record anymore.
    let relist = h.engine.list(item.id, Decimal::from(5u64)).await;
    assert!(matches!(relist, Err(AuctionError::InvalidState(_))));
    let resettle = h
        .engine
        .settle(SettleRequest {
            auction_id: item.id,
            force_end: true,
            ..SettleRequest::default()
        })
        .await;
    assert!(matches!(resettle, Err(AuctionError::InvalidState(_))));
}

#[tokio::test]
async fn test_marketplace_views_track_lifecycle() {
    let h = EngineHarness::new(1000);
    let item = h.listed_item("Visible Lot", 10).await;
    let hidden = h.approved_item("Approved Lot", 10).await;

    let marketplace = h.engine.marketplace_items().await.unwrap();
    assert_eq!(marketplace.len(), 1);
    assert_eq!(marketplace[0].id, item.id);

    // Settlement removes it from the marketplace view.
    h.engine
        .settle(SettleRequest {
            auction_id: item.id,
            buyer_address: Some("0xcollector".to_string()),
            buyer_id: Some(9),
            final_price: Some(Decimal::from(30u64)),
            force_end: true,
            ..SettleRequest::default()
        })
        .await
        .unwrap();

    assert!(h.engine.marketplace_items().await.unwrap().is_empty());

    // The approved-but-unlisted item never appeared.
    let all = h.engine.all_items().await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().any(|i| i.id == hidden.id));

    // The buyer now owns the sold item.
    let owned = h.engine.items_by_owner("0xcollector").await.unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].id, item.id);
}

#[tokio::test]
async fn test_bid_history_joins_bidder_names() {
    let h = EngineHarness::new(1000);
    let carol = h.store.register_user("carol").await;
    let item = h.listed_item("Named Lot", 10).await;

    h.engine
        .place_bid(gavel::BidRequest {
            auction_id: item.id,
            bidder_id: Some(carol),
            bidder_address: "0xcarol".to_string(),
            amount: Decimal::from(12u64),
            external_ref: None,
        })
        .await
        .unwrap();

    let history = h.engine.bid_history(item.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].bidder_name.as_deref(), Some("carol"));
}
