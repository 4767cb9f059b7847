// region:    --- Imports
use crate::bidding::model::{AuctionState, Bid, Comment, Listing};
use crate::bidding::rules::status_message;
use crate::error::AuctionError;
use crate::store::AuctionStore;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

// endregion: --- Imports

// region:    --- Views
/// 상품 상세 화면
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ListingView {
    pub listing: Listing,
    pub state: AuctionState,
    pub bid_count: i64,
    /// 다음 입찰이 초과해야 하는 금액
    pub floor: Decimal,
    pub comments: Vec<Comment>,
    pub watching: bool,
    pub is_owner: bool,
    pub status_message: Option<String>,
}
// endregion: --- Views

// region:    --- Query Handlers

/// 상품 상세 조회 (요청자가 없으면 익명 화면)
pub async fn get_listing_view(
    store: &dyn AuctionStore,
    listing_id: i64,
    requester_id: Option<i64>,
) -> Result<ListingView, AuctionError> {
    info!("{:<12} --> 상품 조회 id: {}", "Query", listing_id);
    let listing = store
        .get_listing(listing_id)
        .await?
        .ok_or(AuctionError::ListingNotFound(listing_id))?;

    let bid_count = store.count_bids(listing_id).await?;
    let comments = store.list_comments(listing_id).await?;
    let watching = match requester_id {
        Some(user_id) => store.is_watching(listing_id, user_id).await?,
        None => false,
    };
    let is_high_bidder = requester_id.is_some_and(|id| listing.is_highest_bidder(id));

    Ok(ListingView {
        state: listing.state(),
        floor: listing.floor(),
        status_message: status_message(!listing.is_available, is_high_bidder, bid_count),
        is_owner: requester_id == Some(listing.listed_by),
        bid_count,
        comments,
        watching,
        listing,
    })
}

/// 모든 상품 조회
pub async fn get_all_listings(store: &dyn AuctionStore) -> Result<Vec<Listing>, AuctionError> {
    info!("{:<12} --> 모든 상품 조회", "Query");
    Ok(store.list_listings().await?)
}

/// 입찰 이력 조회
pub async fn get_bid_history(
    store: &dyn AuctionStore,
    listing_id: i64,
) -> Result<Vec<Bid>, AuctionError> {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "Query", listing_id);
    if store.get_listing(listing_id).await?.is_none() {
        return Err(AuctionError::ListingNotFound(listing_id));
    }
    Ok(store.list_bids(listing_id).await?)
}

/// 관심 목록 조회
pub async fn get_watchlist(
    store: &dyn AuctionStore,
    user_id: i64,
) -> Result<Vec<Listing>, AuctionError> {
    info!("{:<12} --> 관심 목록 조회 user: {}", "Query", user_id);
    Ok(store.watched_listings(user_id).await?)
}

/// 카테고리 목록 조회
pub async fn get_categories(store: &dyn AuctionStore) -> Result<Vec<String>, AuctionError> {
    info!("{:<12} --> 카테고리 목록 조회", "Query");
    Ok(store.list_categories().await?)
}

/// 카테고리별 상품 조회
pub async fn get_category_listings(
    store: &dyn AuctionStore,
    category: &str,
) -> Result<Vec<Listing>, AuctionError> {
    info!("{:<12} --> 카테고리별 상품 조회: {}", "Query", category);
    Ok(store.list_listings_in_category(category).await?)
}

// endregion: --- Query Handlers
