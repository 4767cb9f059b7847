// region:    --- Imports
use super::{AuctionStore, BidCommit, CloseOutcome, StoreError};
use crate::bidding::model::{
    Bid, Comment, Listing, NewBid, NewComment, NewListing, NewUser, User,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::Mutex;

// endregion: --- Imports

// region:    --- In-Memory Store
#[derive(Default)]
struct MemoryState {
    user_seq: i64,
    listing_seq: i64,
    bid_seq: i64,
    comment_seq: i64,
    users: BTreeMap<i64, User>,
    listings: BTreeMap<i64, Listing>,
    bids: Vec<Bid>,
    comments: Vec<Comment>,
    /// (listing_id, user_id)
    watchers: BTreeSet<(i64, i64)>,
}

impl MemoryState {
    fn newest_first(mut listings: Vec<Listing>) -> Vec<Listing> {
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        listings
    }

    fn count_bids(&self, listing_id: i64) -> i64 {
        self.bids.iter().filter(|b| b.listing_id == listing_id).count() as i64
    }
}

/// 인메모리 저장소 구현체
/// 하나의 뮤텍스로 모든 변경을 직렬화하고, 버전 검사는 PostgreSQL 구현과 같은 규칙을 따른다.
#[derive(Default)]
pub struct InMemoryAuctionStore {
    state: Mutex<MemoryState>,
}

impl InMemoryAuctionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuctionStore for InMemoryAuctionStore {
    async fn create_user(
        &self,
        user: &NewUser,
        created_at: DateTime<Utc>,
    ) -> Result<User, StoreError> {
        let mut state = self.state.lock().await;
        if state.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate("username"));
        }
        state.user_seq += 1;
        let user = User {
            id: state.user_seq,
            username: user.username.clone(),
            email: user.email.clone(),
            created_at,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.state.lock().await.users.get(&user_id).cloned())
    }

    async fn create_listing(
        &self,
        owner_id: i64,
        listing: &NewListing,
        created_at: DateTime<Utc>,
    ) -> Result<Listing, StoreError> {
        let mut state = self.state.lock().await;
        state.listing_seq += 1;
        let listing = Listing {
            id: state.listing_seq,
            title: listing.title.clone(),
            description: listing.description.clone(),
            min_price: listing.min_price,
            image_url: listing.image_url.clone(),
            category: listing.category.clone(),
            listed_by: owner_id,
            created_at,
            highest_bid: None,
            highest_bid_user: None,
            is_available: true,
            version: 0,
        };
        state.listings.insert(listing.id, listing.clone());
        Ok(listing)
    }

    async fn get_listing(&self, listing_id: i64) -> Result<Option<Listing>, StoreError> {
        Ok(self.state.lock().await.listings.get(&listing_id).cloned())
    }

    async fn list_listings(&self) -> Result<Vec<Listing>, StoreError> {
        let state = self.state.lock().await;
        Ok(MemoryState::newest_first(
            state.listings.values().cloned().collect(),
        ))
    }

    async fn list_listings_in_category(
        &self,
        category: &str,
    ) -> Result<Vec<Listing>, StoreError> {
        let state = self.state.lock().await;
        Ok(MemoryState::newest_first(
            state
                .listings
                .values()
                .filter(|l| l.category == category)
                .cloned()
                .collect(),
        ))
    }

    async fn list_categories(&self) -> Result<Vec<String>, StoreError> {
        let state = self.state.lock().await;
        let categories: BTreeSet<String> = state
            .listings
            .values()
            .filter(|l| !l.category.is_empty())
            .map(|l| l.category.clone())
            .collect();
        Ok(categories.into_iter().collect())
    }

    async fn commit_bid(
        &self,
        bid: &NewBid,
        expected_version: i64,
    ) -> Result<BidCommit, StoreError> {
        let mut state = self.state.lock().await;
        let listing = match state.listings.get_mut(&bid.listing_id) {
            Some(listing) if listing.version == expected_version && listing.is_available => {
                listing
            }
            _ => return Ok(BidCommit::Conflict),
        };

        listing.highest_bid = Some(bid.bid_amount);
        listing.highest_bid_user = Some(bid.bidder_id);
        listing.version += 1;
        let listing = listing.clone();

        state.bid_seq += 1;
        let stored = Bid {
            id: state.bid_seq,
            listing_id: bid.listing_id,
            bidder_id: bid.bidder_id,
            bid_amount: bid.bid_amount,
            placed_at: bid.placed_at,
        };
        state.bids.push(stored.clone());

        Ok(BidCommit::Committed {
            bid_count: state.count_bids(listing.id),
            listing,
            bid: stored,
        })
    }

    async fn list_bids(&self, listing_id: i64) -> Result<Vec<Bid>, StoreError> {
        let state = self.state.lock().await;
        // 추가 순서가 곧 수락 순서
        Ok(state
            .bids
            .iter()
            .rev()
            .filter(|b| b.listing_id == listing_id)
            .cloned()
            .collect())
    }

    async fn count_bids(&self, listing_id: i64) -> Result<i64, StoreError> {
        Ok(self.state.lock().await.count_bids(listing_id))
    }

    async fn close_listing(&self, listing_id: i64) -> Result<CloseOutcome, StoreError> {
        let mut state = self.state.lock().await;
        let Some(listing) = state.listings.get_mut(&listing_id) else {
            return Ok(CloseOutcome::NotFound);
        };
        if !listing.is_available {
            return Ok(CloseOutcome::AlreadyClosed(listing.clone()));
        }
        listing.is_available = false;
        listing.version += 1;
        Ok(CloseOutcome::Closed(listing.clone()))
    }

    async fn add_watcher(&self, listing_id: i64, user_id: i64) -> Result<(), StoreError> {
        self.state
            .lock()
            .await
            .watchers
            .insert((listing_id, user_id));
        Ok(())
    }

    async fn remove_watcher(&self, listing_id: i64, user_id: i64) -> Result<(), StoreError> {
        self.state
            .lock()
            .await
            .watchers
            .remove(&(listing_id, user_id));
        Ok(())
    }

    async fn is_watching(&self, listing_id: i64, user_id: i64) -> Result<bool, StoreError> {
        Ok(self
            .state
            .lock()
            .await
            .watchers
            .contains(&(listing_id, user_id)))
    }

    async fn watched_listings(&self, user_id: i64) -> Result<Vec<Listing>, StoreError> {
        let state = self.state.lock().await;
        Ok(MemoryState::newest_first(
            state
                .watchers
                .iter()
                .filter(|(_, watcher)| *watcher == user_id)
                .filter_map(|(listing_id, _)| state.listings.get(listing_id).cloned())
                .collect(),
        ))
    }

    async fn add_comment(&self, comment: &NewComment) -> Result<Comment, StoreError> {
        let mut state = self.state.lock().await;
        state.comment_seq += 1;
        let comment = Comment {
            id: state.comment_seq,
            listing_id: comment.listing_id,
            author_id: comment.author_id,
            body: comment.body.clone(),
            created_at: comment.created_at,
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn list_comments(&self, listing_id: i64) -> Result<Vec<Comment>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .comments
            .iter()
            .filter(|c| c.listing_id == listing_id)
            .cloned()
            .collect())
    }
}
// endregion: --- In-Memory Store
