// region:    --- Imports
use crate::auction::events::EventPublisher;
use crate::auth::{CurrentUser, MaybeUser};
use crate::bidding::commands::{self as bid_commands, CloseAuctionCommand, PlaceBidCommand};
use crate::bidding::model::{NewListing, NewUser};
use crate::bidding::policy::BidPolicy;
use crate::error::AuctionError;
use crate::listing::commands as listing_commands;
use crate::query;
use crate::store::AuctionStore;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

// endregion: --- Imports

// region:    --- App State
/// 모든 핸들러가 공유하는 상태
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AuctionStore>,
    pub publisher: Arc<dyn EventPublisher>,
    pub policy: BidPolicy,
}

impl AppState {
    pub fn new(
        store: Arc<dyn AuctionStore>,
        publisher: Arc<dyn EventPublisher>,
        policy: BidPolicy,
    ) -> Self {
        Self {
            store,
            publisher,
            policy,
        }
    }
}
// endregion: --- App State

// region:    --- Requests
/// 입찰 금액 입력 (문자열/숫자 모두 허용)
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(serde_json::Number),
    Text(String),
}

impl AmountInput {
    pub fn parse(&self) -> Result<Decimal, AuctionError> {
        let raw = match self {
            AmountInput::Number(n) => n.to_string(),
            AmountInput::Text(s) => s.trim().to_string(),
        };
        Decimal::from_str(&raw)
            .or_else(|_| Decimal::from_scientific(&raw))
            .map_err(|_| AuctionError::Validation(format!("'{raw}' is not a valid amount.")))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceBidRequest {
    pub bid_amount: AmountInput,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddCommentRequest {
    pub body: String,
}
// endregion: --- Requests

// region:    --- Router
/// 라우터 설정
pub fn router(state: AppState) -> Router {
    // 테스트 페이지를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/users", post(handle_register_user))
        .route(
            "/listings",
            get(handle_get_listings).post(handle_create_listing),
        )
        .route("/listings/:id", get(handle_get_listing))
        .route(
            "/listings/:id/bids",
            get(handle_get_bid_history).post(handle_bid),
        )
        .route("/listings/:id/close", post(handle_close_auction))
        .route(
            "/listings/:id/watch",
            post(handle_add_watch).delete(handle_remove_watch),
        )
        .route("/listings/:id/comments", post(handle_add_comment))
        .route("/watchlist", get(handle_get_watchlist))
        .route("/categories", get(handle_get_categories))
        .route("/categories/:name", get(handle_get_category_listings))
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .with_state(state)
}
// endregion: --- Router

// region:    --- Command Handlers

/// 사용자 등록
pub async fn handle_register_user(
    State(state): State<AppState>,
    Json(user): Json<NewUser>,
) -> Result<impl IntoResponse, AuctionError> {
    let user = listing_commands::handle_register_user(user, state.store.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// 상품 등록
pub async fn handle_create_listing(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(listing): Json<NewListing>,
) -> Result<impl IntoResponse, AuctionError> {
    let listing = listing_commands::handle_create_listing(
        user.id(),
        listing,
        state.store.as_ref(),
        state.publisher.as_ref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// 입찰 요청 처리
pub async fn handle_bid(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
    user: CurrentUser,
    Json(req): Json<PlaceBidRequest>,
) -> Result<impl IntoResponse, AuctionError> {
    let cmd = PlaceBidCommand {
        listing_id,
        bidder_id: user.id(),
        bid_amount: req.bid_amount.parse()?,
    };
    let placed = bid_commands::handle_place_bid(
        cmd,
        state.store.as_ref(),
        state.publisher.as_ref(),
        &state.policy,
    )
    .await?;
    Ok(Json(placed))
}

/// 경매 종료 요청 처리
pub async fn handle_close_auction(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
    user: CurrentUser,
) -> Result<impl IntoResponse, AuctionError> {
    let cmd = CloseAuctionCommand {
        listing_id,
        requested_by: user.id(),
    };
    let listing = bid_commands::handle_close_auction(
        cmd,
        state.store.as_ref(),
        state.publisher.as_ref(),
        &state.policy,
    )
    .await?;
    Ok(Json(listing))
}

/// 관심 목록 추가
pub async fn handle_add_watch(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
    user: CurrentUser,
) -> Result<impl IntoResponse, AuctionError> {
    let status =
        listing_commands::handle_add_watch(listing_id, user.id(), state.store.as_ref()).await?;
    Ok(Json(status))
}

/// 관심 목록 삭제
pub async fn handle_remove_watch(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
    user: CurrentUser,
) -> Result<impl IntoResponse, AuctionError> {
    let status =
        listing_commands::handle_remove_watch(listing_id, user.id(), state.store.as_ref())
            .await?;
    Ok(Json(status))
}

/// 댓글 작성
pub async fn handle_add_comment(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
    user: CurrentUser,
    Json(req): Json<AddCommentRequest>,
) -> Result<impl IntoResponse, AuctionError> {
    let comment = listing_commands::handle_add_comment(
        listing_id,
        user.id(),
        &req.body,
        state.store.as_ref(),
        state.publisher.as_ref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 상태 확인
pub async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// 모든 상품 조회
pub async fn handle_get_listings(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AuctionError> {
    info!("{:<12} --> 모든 상품 조회", "HandlerQuery");
    Ok(Json(query::handlers::get_all_listings(state.store.as_ref()).await?))
}

/// 상품 상세 조회
pub async fn handle_get_listing(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
    user: MaybeUser,
) -> Result<impl IntoResponse, AuctionError> {
    info!("{:<12} --> 상품 조회 id: {}", "HandlerQuery", listing_id);
    let view = query::handlers::get_listing_view(
        state.store.as_ref(),
        listing_id,
        user.id(),
    )
    .await?;
    Ok(Json(view))
}

/// 입찰 이력 조회
pub async fn handle_get_bid_history(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
) -> Result<impl IntoResponse, AuctionError> {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "HandlerQuery", listing_id);
    Ok(Json(
        query::handlers::get_bid_history(state.store.as_ref(), listing_id).await?,
    ))
}

/// 관심 목록 조회
pub async fn handle_get_watchlist(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse, AuctionError> {
    Ok(Json(
        query::handlers::get_watchlist(state.store.as_ref(), user.id()).await?,
    ))
}

/// 카테고리 목록 조회
pub async fn handle_get_categories(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AuctionError> {
    Ok(Json(
        query::handlers::get_categories(state.store.as_ref()).await?,
    ))
}

/// 카테고리별 상품 조회
pub async fn handle_get_category_listings(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<impl IntoResponse, AuctionError> {
    Ok(Json(
        query::handlers::get_category_listings(state.store.as_ref(), &category).await?,
    ))
}

// endregion: --- Query Handlers
