#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use commerce_auctions::auction::events::{AuctionEvent, EventPublisher};
use commerce_auctions::bidding::model::{
    Bid, Comment, Listing, NewBid, NewComment, NewListing, NewUser, User,
};
use commerce_auctions::store::{
    AuctionStore, BidCommit, CloseOutcome, InMemoryAuctionStore, StoreError,
};
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::Once;
use tokio::sync::Mutex;

static TRACING: Once = Once::new();

/// 트레이싱 초기화 (여러 테스트에서 호출해도 한 번만)
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .without_time()
            .with_target(false)
            .with_test_writer()
            .try_init();
    });
}

/// 발행된 이벤트를 모아두는 발행자
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<AuctionEvent>>,
}

impl RecordingPublisher {
    pub async fn events(&self) -> Vec<AuctionEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: &AuctionEvent) -> Result<(), String> {
        self.events.lock().await.push(event.clone());
        Ok(())
    }
}

/// 항상 실패하는 발행자
pub struct FailingPublisher;

#[async_trait]
impl EventPublisher for FailingPublisher {
    async fn publish(&self, _event: &AuctionEvent) -> Result<(), String> {
        Err("broker unavailable".to_string())
    }
}

pub async fn create_user(store: &dyn AuctionStore, username: &str) -> User {
    store
        .create_user(
            &NewUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
            },
            Utc::now(),
        )
        .await
        .unwrap()
}

pub fn new_listing(title: &str, min_price: Decimal, category: &str) -> NewListing {
    NewListing {
        title: title.to_string(),
        description: format!("{title} in good condition"),
        min_price,
        image_url: String::new(),
        category: category.to_string(),
    }
}

pub async fn create_listing(
    store: &dyn AuctionStore,
    owner_id: i64,
    min_price: Decimal,
) -> Listing {
    store
        .create_listing(owner_id, &new_listing("Camera", min_price, "Electronics"), Utc::now())
        .await
        .unwrap()
}

/// 입찰 기록 직전에 경쟁 입찰을 먼저 반영하는 저장소
/// 낙관적 동시성 충돌을 재현하기 위해 사용한다.
pub struct RacingStore {
    pub inner: InMemoryAuctionStore,
    racing_bids: Mutex<VecDeque<(i64, Decimal)>>,
}

impl RacingStore {
    pub fn new(inner: InMemoryAuctionStore) -> Self {
        Self {
            inner,
            racing_bids: Mutex::new(VecDeque::new()),
        }
    }

    pub async fn queue_racing_bid(&self, bidder_id: i64, amount: Decimal) {
        self.racing_bids
            .lock()
            .await
            .push_back((bidder_id, amount));
    }
}

#[async_trait]
impl AuctionStore for RacingStore {
    async fn create_user(
        &self,
        user: &NewUser,
        created_at: DateTime<Utc>,
    ) -> Result<User, StoreError> {
        self.inner.create_user(user, created_at).await
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        self.inner.get_user(user_id).await
    }

    async fn create_listing(
        &self,
        owner_id: i64,
        listing: &NewListing,
        created_at: DateTime<Utc>,
    ) -> Result<Listing, StoreError> {
        self.inner.create_listing(owner_id, listing, created_at).await
    }

    async fn get_listing(&self, listing_id: i64) -> Result<Option<Listing>, StoreError> {
        self.inner.get_listing(listing_id).await
    }

    async fn list_listings(&self) -> Result<Vec<Listing>, StoreError> {
        self.inner.list_listings().await
    }

    async fn list_listings_in_category(
        &self,
        category: &str,
    ) -> Result<Vec<Listing>, StoreError> {
        self.inner.list_listings_in_category(category).await
    }

    async fn list_categories(&self) -> Result<Vec<String>, StoreError> {
        self.inner.list_categories().await
    }

    async fn commit_bid(
        &self,
        bid: &NewBid,
        expected_version: i64,
    ) -> Result<BidCommit, StoreError> {
        let racing = self.racing_bids.lock().await.pop_front();
        if let Some((bidder_id, amount)) = racing {
            let current = self
                .inner
                .get_listing(bid.listing_id)
                .await?
                .expect("listing exists");
            let racer = NewBid {
                listing_id: bid.listing_id,
                bidder_id,
                bid_amount: amount,
                placed_at: Utc::now(),
            };
            let outcome = self.inner.commit_bid(&racer, current.version).await?;
            assert!(matches!(outcome, BidCommit::Committed { .. }));
        }
        self.inner.commit_bid(bid, expected_version).await
    }

    async fn list_bids(&self, listing_id: i64) -> Result<Vec<Bid>, StoreError> {
        self.inner.list_bids(listing_id).await
    }

    async fn count_bids(&self, listing_id: i64) -> Result<i64, StoreError> {
        self.inner.count_bids(listing_id).await
    }

    async fn close_listing(&self, listing_id: i64) -> Result<CloseOutcome, StoreError> {
        self.inner.close_listing(listing_id).await
    }

    async fn add_watcher(&self, listing_id: i64, user_id: i64) -> Result<(), StoreError> {
        self.inner.add_watcher(listing_id, user_id).await
    }

    async fn remove_watcher(&self, listing_id: i64, user_id: i64) -> Result<(), StoreError> {
        self.inner.remove_watcher(listing_id, user_id).await
    }

    async fn is_watching(&self, listing_id: i64, user_id: i64) -> Result<bool, StoreError> {
        self.inner.is_watching(listing_id, user_id).await
    }

    async fn watched_listings(&self, user_id: i64) -> Result<Vec<Listing>, StoreError> {
        self.inner.watched_listings(user_id).await
    }

    async fn add_comment(&self, comment: &NewComment) -> Result<Comment, StoreError> {
        self.inner.add_comment(comment).await
    }

    async fn list_comments(&self, listing_id: i64) -> Result<Vec<Comment>, StoreError> {
        self.inner.list_comments(listing_id).await
    }
}
