//! PostgreSQL 저장소 테스트
//! 실행하려면 DATABASE_URL 을 설정하고 `cargo test -- --ignored` 로 실행한다.
mod common;

use chrono::Utc;
use commerce_auctions::auction::events::{AuctionEvent, LogPublisher};
use commerce_auctions::bidding::commands::{
    handle_close_auction, handle_place_bid, CloseAuctionCommand, PlaceBidCommand,
};
use commerce_auctions::bidding::model::NewUser;
use commerce_auctions::bidding::policy::BidPolicy;
use commerce_auctions::database::DatabaseManager;
use commerce_auctions::error::AuctionError;
use commerce_auctions::store::{AuctionStore, PostgresAuctionStore, StoreError};
use common::{create_listing, init_tracing, RecordingPublisher};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tracing::info;

/// 데이터베이스 매니저 설정
async fn setup() -> PostgresAuctionStore {
    init_tracing();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let db_manager = DatabaseManager::connect(&database_url, 5)
        .await
        .expect("Failed to create pool");
    db_manager
        .initialize_database(false)
        .await
        .expect("Failed to initialize schema");
    PostgresAuctionStore::new(Arc::new(db_manager))
}

/// 테스트마다 겹치지 않는 사용자 이름
fn unique_name(prefix: &str) -> String {
    format!(
        "{prefix}-{}",
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    )
}

async fn register(store: &PostgresAuctionStore, prefix: &str) -> i64 {
    store
        .create_user(
            &NewUser {
                username: unique_name(prefix),
                email: String::new(),
            },
            Utc::now(),
        )
        .await
        .unwrap()
        .id
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_postgres_bid_and_close() {
    let store = setup().await;
    let policy = BidPolicy::default();
    let seller = register(&store, "seller").await;
    let bidder = register(&store, "bidder").await;
    let listing = create_listing(&store, seller, dec!(100)).await;

    let err = handle_place_bid(
        PlaceBidCommand {
            listing_id: listing.id,
            bidder_id: bidder,
            bid_amount: dec!(100),
        },
        &store,
        &LogPublisher,
        &policy,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AuctionError::BidTooLow { .. }));

    let placed = handle_place_bid(
        PlaceBidCommand {
            listing_id: listing.id,
            bidder_id: bidder,
            bid_amount: dec!(100.01),
        },
        &store,
        &LogPublisher,
        &policy,
    )
    .await
    .unwrap();
    assert_eq!(placed.listing.highest_bid, Some(dec!(100.01)));
    assert_eq!(placed.listing.version, listing.version + 1);
    assert_eq!(placed.bid_count, 1);

    handle_close_auction(
        CloseAuctionCommand {
            listing_id: listing.id,
            requested_by: seller,
        },
        &store,
        &LogPublisher,
        &policy,
    )
    .await
    .unwrap();

    let err = handle_place_bid(
        PlaceBidCommand {
            listing_id: listing.id,
            bidder_id: bidder,
            bid_amount: dec!(999),
        },
        &store,
        &LogPublisher,
        &policy,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AuctionError::AuctionClosed(_)));
    assert_eq!(store.list_bids(listing.id).await.unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_postgres_watchers_and_duplicates() {
    let store = setup().await;
    let seller = register(&store, "seller").await;
    let listing = create_listing(&store, seller, dec!(5)).await;

    store.add_watcher(listing.id, seller).await.unwrap();
    store.add_watcher(listing.id, seller).await.unwrap();
    assert!(store.is_watching(listing.id, seller).await.unwrap());
    let watched = store.watched_listings(seller).await.unwrap();
    assert_eq!(watched.iter().filter(|l| l.id == listing.id).count(), 1);

    store.remove_watcher(listing.id, seller).await.unwrap();
    assert!(!store.is_watching(listing.id, seller).await.unwrap());

    let name = unique_name("dup");
    let user = NewUser {
        username: name,
        email: String::new(),
    };
    store.create_user(&user, Utc::now()).await.unwrap();
    let err = store.create_user(&user, Utc::now()).await.unwrap_err();
    assert!(matches!(err, StoreError::Duplicate("username")));
}

/// 동시 입찰: 버전 조건을 통과한 입찰만 반영되고 나머지는 충돌 후 거절된다
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires DATABASE_URL"]
async fn test_postgres_concurrent_bidding() {
    let store = Arc::new(setup().await);
    let publisher = Arc::new(RecordingPublisher::default());
    let seller = register(&store, "seller").await;
    let listing = create_listing(store.as_ref(), seller, dec!(100)).await;

    let mut bidders = Vec::new();
    for i in 1..=40 {
        bidders.push(register(&store, &format!("bidder-{i}")).await);
    }

    // 40개의 동시 입찰 생성
    let mut handles = vec![];
    for (i, bidder) in bidders.into_iter().enumerate() {
        let store = Arc::clone(&store);
        let publisher = Arc::clone(&publisher);
        let cmd = PlaceBidCommand {
            listing_id: listing.id,
            bidder_id: bidder,
            bid_amount: dec!(100) + Decimal::from(i as i64 + 1),
        };
        handles.push(tokio::spawn(async move {
            handle_place_bid(cmd, store.as_ref(), publisher.as_ref(), &BidPolicy::default()).await
        }));
    }

    let mut successful_bids = 0;
    let mut failed_bids = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successful_bids += 1,
            Err(AuctionError::BidTooLow { .. }) => failed_bids += 1,
            Err(e) => panic!("unexpected rejection: {e:?}"),
        }
    }
    info!(
        "성공한 입찰 수: {}, 실패한 입찰 수: {}",
        successful_bids, failed_bids
    );
    assert!(successful_bids >= 1);
    assert_eq!(successful_bids + failed_bids, 40);

    // 저장된 입찰은 커밋 순서대로 엄격히 증가한다
    let mut bids = store.list_bids(listing.id).await.unwrap();
    bids.sort_by_key(|b| b.id);
    assert_eq!(bids.len(), successful_bids);
    assert!(bids.windows(2).all(|w| w[0].bid_amount < w[1].bid_amount));

    let last = bids.last().unwrap();
    let stored = store.get_listing(listing.id).await.unwrap().unwrap();
    assert_eq!(stored.highest_bid, Some(last.bid_amount));
    assert_eq!(stored.highest_bid_user, Some(last.bidder_id));
    assert_eq!(stored.version, listing.version + successful_bids as i64);

    let published = publisher
        .events()
        .await
        .into_iter()
        .filter(|e| matches!(e, AuctionEvent::BidPlaced { .. }))
        .count();
    assert_eq!(published, successful_bids);
}
