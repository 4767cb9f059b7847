/// 경매 데이터 저장소
/// 커맨드/쿼리 핸들러는 이 트레이트에만 의존한다.
/// 1. PostgreSQL 구현 (운영)
/// 2. 인메모리 구현 (개발/테스트)
// region:    --- Imports
use crate::bidding::model::{
    Bid, Comment, Listing, NewBid, NewComment, NewListing, NewUser, User,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

// endregion: --- Imports

// region:    --- Modules
pub mod memory;
pub mod postgres;

pub use memory::InMemoryAuctionStore;
pub use postgres::PostgresAuctionStore;
// endregion: --- Modules

// region:    --- Store Types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("duplicate value for {0}")]
    Duplicate(&'static str),
}

/// 입찰 기록 결과
#[derive(Debug, Clone, PartialEq)]
pub enum BidCommit {
    /// 입찰 기록과 최고가 갱신이 함께 반영됨
    Committed {
        listing: Listing,
        bid: Bid,
        bid_count: i64,
    },
    /// 읽은 뒤 다른 요청이 먼저 상품을 변경함 (버전 충돌, 또는 종료됨)
    Conflict,
}

/// 경매 종료 결과
#[derive(Debug, Clone, PartialEq)]
pub enum CloseOutcome {
    Closed(Listing),
    AlreadyClosed(Listing),
    NotFound,
}
// endregion: --- Store Types

// region:    --- Auction Store Trait
#[async_trait]
pub trait AuctionStore: Send + Sync {
    // -- Users
    async fn create_user(
        &self,
        user: &NewUser,
        created_at: DateTime<Utc>,
    ) -> Result<User, StoreError>;
    async fn get_user(&self, user_id: i64) -> Result<Option<User>, StoreError>;

    // -- Listings
    async fn create_listing(
        &self,
        owner_id: i64,
        listing: &NewListing,
        created_at: DateTime<Utc>,
    ) -> Result<Listing, StoreError>;
    async fn get_listing(&self, listing_id: i64) -> Result<Option<Listing>, StoreError>;
    /// 최신 등록순
    async fn list_listings(&self) -> Result<Vec<Listing>, StoreError>;
    async fn list_listings_in_category(&self, category: &str)
        -> Result<Vec<Listing>, StoreError>;
    /// 비어 있지 않은 카테고리, 이름순
    async fn list_categories(&self) -> Result<Vec<String>, StoreError>;

    // -- Bids
    /// 입찰 추가와 최고가 갱신을 하나의 트랜잭션으로 처리한다.
    /// 상품 버전이 expected_version 과 다르거나 종료된 경우 아무것도 바꾸지 않고 Conflict.
    async fn commit_bid(&self, bid: &NewBid, expected_version: i64)
        -> Result<BidCommit, StoreError>;
    /// 최신 입찰순
    async fn list_bids(&self, listing_id: i64) -> Result<Vec<Bid>, StoreError>;
    async fn count_bids(&self, listing_id: i64) -> Result<i64, StoreError>;

    // -- Close
    async fn close_listing(&self, listing_id: i64) -> Result<CloseOutcome, StoreError>;

    // -- Watchlist
    async fn add_watcher(&self, listing_id: i64, user_id: i64) -> Result<(), StoreError>;
    async fn remove_watcher(&self, listing_id: i64, user_id: i64) -> Result<(), StoreError>;
    async fn is_watching(&self, listing_id: i64, user_id: i64) -> Result<bool, StoreError>;
    async fn watched_listings(&self, user_id: i64) -> Result<Vec<Listing>, StoreError>;

    // -- Comments
    async fn add_comment(&self, comment: &NewComment) -> Result<Comment, StoreError>;
    /// 작성순
    async fn list_comments(&self, listing_id: i64) -> Result<Vec<Comment>, StoreError>;
}
// endregion: --- Auction Store Trait
