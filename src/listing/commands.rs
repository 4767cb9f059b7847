/// 상품/사용자 관련 커맨드 처리
/// 1. 사용자 등록
/// 2. 상품 등록
/// 3. 관심 목록 추가/삭제
/// 4. 댓글 작성
// region:    --- Imports
use crate::auction::events::{publish_event, AuctionEvent, EventPublisher};
use crate::bidding::model::{Comment, Listing, NewComment, NewListing, NewUser, User};
use crate::bidding::rules::validate_amount;
use crate::error::AuctionError;
use crate::store::{AuctionStore, StoreError};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
// endregion: --- Imports

// region:    --- Validation
pub const MAX_USERNAME_LEN: usize = 150;
pub const MAX_TITLE_LEN: usize = 64;
pub const MAX_TEXT_LEN: usize = 5000;
pub const MAX_IMAGE_URL_LEN: usize = 500;
pub const MAX_CATEGORY_LEN: usize = 64;

fn required_text(field: &str, value: &str, max_len: usize) -> Result<String, AuctionError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AuctionError::Validation(format!("{field} is required.")));
    }
    optional_text(field, value, max_len)
}

fn optional_text(field: &str, value: &str, max_len: usize) -> Result<String, AuctionError> {
    let value = value.trim();
    if value.chars().count() > max_len {
        return Err(AuctionError::Validation(format!(
            "{field} must be at most {max_len} characters."
        )));
    }
    Ok(value.to_string())
}
// endregion: --- Validation

// region:    --- Commands
/// 관심 목록 상태
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WatchStatus {
    pub listing_id: i64,
    pub watching: bool,
}

/// 1. 사용자 등록
pub async fn handle_register_user(
    user: NewUser,
    store: &dyn AuctionStore,
) -> Result<User, AuctionError> {
    let user = NewUser {
        username: required_text("Username", &user.username, MAX_USERNAME_LEN)?,
        email: user.email.trim().to_string(),
    };
    info!("{:<12} --> 사용자 등록: {}", "Command", user.username);

    store
        .create_user(&user, Utc::now())
        .await
        .map_err(|e| match e {
            StoreError::Duplicate(_) => AuctionError::UsernameTaken,
            e => AuctionError::Store(e),
        })
}

/// 2. 상품 등록
pub async fn handle_create_listing(
    owner_id: i64,
    listing: NewListing,
    store: &dyn AuctionStore,
    publisher: &dyn EventPublisher,
) -> Result<Listing, AuctionError> {
    let listing = NewListing {
        title: required_text("Title", &listing.title, MAX_TITLE_LEN)?,
        description: required_text("Description", &listing.description, MAX_TEXT_LEN)?,
        min_price: validate_amount("Minimum price", listing.min_price)?,
        image_url: optional_text("Image URL", &listing.image_url, MAX_IMAGE_URL_LEN)?,
        category: optional_text("Category", &listing.category, MAX_CATEGORY_LEN)?,
    };
    info!(
        "{:<12} --> 상품 등록: owner={}, title={}",
        "Command", owner_id, listing.title
    );

    let created = store.create_listing(owner_id, &listing, Utc::now()).await?;
    publish_event(
        publisher,
        AuctionEvent::ListingCreated {
            listing_id: created.id,
            owner_id,
            title: created.title.clone(),
            min_price: created.min_price,
            timestamp: created.created_at,
        },
    )
    .await;
    Ok(created)
}

/// 3-1. 관심 목록 추가 (이미 있으면 그대로)
pub async fn handle_add_watch(
    listing_id: i64,
    user_id: i64,
    store: &dyn AuctionStore,
) -> Result<WatchStatus, AuctionError> {
    ensure_listing(store, listing_id).await?;
    store.add_watcher(listing_id, user_id).await?;
    info!(
        "{:<12} --> 관심 목록 추가: listing={}, user={}",
        "Command", listing_id, user_id
    );
    Ok(WatchStatus {
        listing_id,
        watching: true,
    })
}

/// 3-2. 관심 목록 삭제 (없으면 그대로)
pub async fn handle_remove_watch(
    listing_id: i64,
    user_id: i64,
    store: &dyn AuctionStore,
) -> Result<WatchStatus, AuctionError> {
    ensure_listing(store, listing_id).await?;
    store.remove_watcher(listing_id, user_id).await?;
    info!(
        "{:<12} --> 관심 목록 삭제: listing={}, user={}",
        "Command", listing_id, user_id
    );
    Ok(WatchStatus {
        listing_id,
        watching: false,
    })
}

/// 4. 댓글 작성
pub async fn handle_add_comment(
    listing_id: i64,
    author_id: i64,
    body: &str,
    store: &dyn AuctionStore,
    publisher: &dyn EventPublisher,
) -> Result<Comment, AuctionError> {
    let body = required_text("Comment", body, MAX_TEXT_LEN)?;
    ensure_listing(store, listing_id).await?;

    let comment = store
        .add_comment(&NewComment {
            listing_id,
            author_id,
            body,
            created_at: Utc::now(),
        })
        .await?;
    info!(
        "{:<12} --> 댓글 작성: listing={}, comment={}",
        "Command", listing_id, comment.id
    );
    publish_event(
        publisher,
        AuctionEvent::CommentAdded {
            listing_id,
            comment_id: comment.id,
            author_id,
            timestamp: comment.created_at,
        },
    )
    .await;
    Ok(comment)
}

async fn ensure_listing(store: &dyn AuctionStore, listing_id: i64) -> Result<Listing, AuctionError> {
    store
        .get_listing(listing_id)
        .await?
        .ok_or(AuctionError::ListingNotFound(listing_id))
}

// endregion: --- Commands
