// region:    --- Imports
use super::{AuctionStore, BidCommit, CloseOutcome, StoreError};
use crate::bidding::model::{
    Bid, Comment, Listing, NewBid, NewComment, NewListing, NewUser, User,
};
use crate::database::DatabaseManager;
use crate::query::queries;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

// endregion: --- Imports

// region:    --- Postgres Store
/// PostgreSQL 저장소 구현체
pub struct PostgresAuctionStore {
    db_manager: Arc<DatabaseManager>,
}

impl PostgresAuctionStore {
    pub fn new(db_manager: Arc<DatabaseManager>) -> Self {
        Self { db_manager }
    }
}

/// 최고가 갱신 (버전 조건을 만족하지 못하면 None)
async fn update_listing_highest_bid(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    bid: &NewBid,
    expected_version: i64,
) -> Result<Option<Listing>, sqlx::Error> {
    sqlx::query_as::<_, Listing>(queries::UPDATE_LISTING_HIGHEST_BID)
        .bind(bid.bid_amount)
        .bind(bid.bidder_id)
        .bind(bid.listing_id)
        .bind(expected_version)
        .fetch_optional(&mut **tx)
        .await
}

/// 입찰 기록 추가
async fn insert_bid(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    bid: &NewBid,
) -> Result<Bid, sqlx::Error> {
    sqlx::query_as::<_, Bid>(queries::INSERT_BID)
        .bind(bid.listing_id)
        .bind(bid.bidder_id)
        .bind(bid.bid_amount)
        .bind(bid.placed_at)
        .fetch_one(&mut **tx)
        .await
}

#[async_trait]
impl AuctionStore for PostgresAuctionStore {
    async fn create_user(
        &self,
        user: &NewUser,
        created_at: DateTime<Utc>,
    ) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(queries::INSERT_USER)
            .bind(&user.username)
            .bind(&user.email)
            .bind(created_at)
            .fetch_one(self.db_manager.pool())
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    StoreError::Duplicate("username")
                }
                e => StoreError::Database(e),
            })
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(queries::GET_USER)
            .bind(user_id)
            .fetch_optional(self.db_manager.pool())
            .await?;
        Ok(user)
    }

    async fn create_listing(
        &self,
        owner_id: i64,
        listing: &NewListing,
        created_at: DateTime<Utc>,
    ) -> Result<Listing, StoreError> {
        let listing = sqlx::query_as::<_, Listing>(queries::INSERT_LISTING)
            .bind(&listing.title)
            .bind(&listing.description)
            .bind(listing.min_price)
            .bind(&listing.image_url)
            .bind(&listing.category)
            .bind(owner_id)
            .bind(created_at)
            .fetch_one(self.db_manager.pool())
            .await?;
        Ok(listing)
    }

    async fn get_listing(&self, listing_id: i64) -> Result<Option<Listing>, StoreError> {
        let listing = sqlx::query_as::<_, Listing>(queries::GET_LISTING)
            .bind(listing_id)
            .fetch_optional(self.db_manager.pool())
            .await?;
        Ok(listing)
    }

    async fn list_listings(&self) -> Result<Vec<Listing>, StoreError> {
        let listings = sqlx::query_as::<_, Listing>(queries::GET_ALL_LISTINGS)
            .fetch_all(self.db_manager.pool())
            .await?;
        Ok(listings)
    }

    async fn list_listings_in_category(
        &self,
        category: &str,
    ) -> Result<Vec<Listing>, StoreError> {
        let listings = sqlx::query_as::<_, Listing>(queries::GET_LISTINGS_IN_CATEGORY)
            .bind(category)
            .fetch_all(self.db_manager.pool())
            .await?;
        Ok(listings)
    }

    async fn list_categories(&self) -> Result<Vec<String>, StoreError> {
        let categories = sqlx::query_scalar::<_, String>(queries::GET_CATEGORIES)
            .fetch_all(self.db_manager.pool())
            .await?;
        Ok(categories)
    }

    async fn commit_bid(
        &self,
        bid: &NewBid,
        expected_version: i64,
    ) -> Result<BidCommit, StoreError> {
        let bid = bid.clone();
        self.db_manager
            .transaction::<_, BidCommit, StoreError>(|tx| {
                Box::pin(async move {
                    // 조건부 갱신이 먼저: 실패하면 입찰 기록도 남기지 않는다
                    let Some(listing) = update_listing_highest_bid(tx, &bid, expected_version).await?
                    else {
                        debug!(
                            "{:<12} --> 버전 충돌: listing={}, expected_version={}",
                            "Store", bid.listing_id, expected_version
                        );
                        return Ok(BidCommit::Conflict);
                    };

                    let stored = insert_bid(tx, &bid).await?;

                    let bid_count = sqlx::query_scalar::<_, i64>(queries::COUNT_BIDS)
                        .bind(bid.listing_id)
                        .fetch_one(&mut **tx)
                        .await?;

                    info!(
                        "{:<12} --> 입찰 반영: listing={}, amount={}, version={}",
                        "Store", listing.id, stored.bid_amount, listing.version
                    );
                    Ok(BidCommit::Committed {
                        listing,
                        bid: stored,
                        bid_count,
                    })
                })
            })
            .await
    }

    async fn list_bids(&self, listing_id: i64) -> Result<Vec<Bid>, StoreError> {
        let bids = sqlx::query_as::<_, Bid>(queries::GET_BID_HISTORY)
            .bind(listing_id)
            .fetch_all(self.db_manager.pool())
            .await?;
        Ok(bids)
    }

    async fn count_bids(&self, listing_id: i64) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(queries::COUNT_BIDS)
            .bind(listing_id)
            .fetch_one(self.db_manager.pool())
            .await?;
        Ok(count)
    }

    async fn close_listing(&self, listing_id: i64) -> Result<CloseOutcome, StoreError> {
        let closed = sqlx::query_as::<_, Listing>(queries::CLOSE_LISTING)
            .bind(listing_id)
            .fetch_optional(self.db_manager.pool())
            .await?;

        if let Some(listing) = closed {
            return Ok(CloseOutcome::Closed(listing));
        }

        // 종료는 되돌릴 수 없으므로 여기서 읽은 상품은 이미 종료된 상태다
        match self.get_listing(listing_id).await? {
            Some(listing) => Ok(CloseOutcome::AlreadyClosed(listing)),
            None => Ok(CloseOutcome::NotFound),
        }
    }

    async fn add_watcher(&self, listing_id: i64, user_id: i64) -> Result<(), StoreError> {
        sqlx::query(queries::INSERT_WATCHER)
            .bind(listing_id)
            .bind(user_id)
            .execute(self.db_manager.pool())
            .await?;
        Ok(())
    }

    async fn remove_watcher(&self, listing_id: i64, user_id: i64) -> Result<(), StoreError> {
        sqlx::query(queries::DELETE_WATCHER)
            .bind(listing_id)
            .bind(user_id)
            .execute(self.db_manager.pool())
            .await?;
        Ok(())
    }

    async fn is_watching(&self, listing_id: i64, user_id: i64) -> Result<bool, StoreError> {
        let watching = sqlx::query_scalar::<_, bool>(queries::IS_WATCHING)
            .bind(listing_id)
            .bind(user_id)
            .fetch_one(self.db_manager.pool())
            .await?;
        Ok(watching)
    }

    async fn watched_listings(&self, user_id: i64) -> Result<Vec<Listing>, StoreError> {
        let listings = sqlx::query_as::<_, Listing>(queries::GET_WATCHED_LISTINGS)
            .bind(user_id)
            .fetch_all(self.db_manager.pool())
            .await?;
        Ok(listings)
    }

    async fn add_comment(&self, comment: &NewComment) -> Result<Comment, StoreError> {
        let comment = sqlx::query_as::<_, Comment>(queries::INSERT_COMMENT)
            .bind(comment.listing_id)
            .bind(comment.author_id)
            .bind(&comment.body)
            .bind(comment.created_at)
            .fetch_one(self.db_manager.pool())
            .await?;
        Ok(comment)
    }

    async fn list_comments(&self, listing_id: i64) -> Result<Vec<Comment>, StoreError> {
        let comments = sqlx::query_as::<_, Comment>(queries::GET_COMMENTS)
            .bind(listing_id)
            .fetch_all(self.db_manager.pool())
            .await?;
        Ok(comments)
    }
}
// endregion: --- Postgres Store
