// region:    --- Imports
use crate::store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::error;

// endregion: --- Imports

// region:    --- Auction Error
/// 커맨드/쿼리 처리 중 발생하는 오류
/// 저장소 오류를 제외하면 모두 사용자가 다시 시도할 수 있는 오류다.
#[derive(Debug, Error)]
pub enum AuctionError {
    #[error("Listing {0} does not exist.")]
    ListingNotFound(i64),

    #[error("The auction for listing {0} is closed.")]
    AuctionClosed(i64),

    /// `contested`: 재시도까지 다른 입찰에 밀려 거절됨 (금액 자체는 기준가보다 높았을 수 있다)
    #[error("{}", bid_too_low_message(.amount, .floor, .contested))]
    BidTooLow {
        amount: Decimal,
        floor: Decimal,
        contested: bool,
    },

    #[error("{0}")]
    Validation(String),

    #[error("You cannot bid on your own listing.")]
    OwnerCannotBid,

    #[error("You already hold the highest bid.")]
    AlreadyHighestBidder,

    #[error("Only the seller can close this auction.")]
    NotListingOwner,

    #[error("A known user id is required.")]
    Unauthenticated,

    #[error("Username already taken.")]
    UsernameTaken,

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn bid_too_low_message(amount: &Decimal, floor: &Decimal, contested: &bool) -> String {
    if *contested {
        format!("Another bid was accepted first. The current bid is now {floor}, please bid again.")
    } else {
        format!("Your bid of {amount} must be higher than {floor}.")
    }
}

impl AuctionError {
    /// 클라이언트가 분기할 수 있는 오류 코드
    pub fn code(&self) -> &'static str {
        match self {
            AuctionError::ListingNotFound(_) => "NOT_FOUND",
            AuctionError::AuctionClosed(_) => "ALREADY_ENDED",
            AuctionError::BidTooLow { .. } => "LOW_BID",
            AuctionError::Validation(_) => "VALIDATION",
            AuctionError::OwnerCannotBid => "OWNER_BID",
            AuctionError::AlreadyHighestBidder => "ALREADY_HIGHEST",
            AuctionError::NotListingOwner => "NOT_OWNER",
            AuctionError::Unauthenticated => "UNAUTHENTICATED",
            AuctionError::UsernameTaken => "USERNAME_TAKEN",
            AuctionError::Store(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuctionError::ListingNotFound(_) => StatusCode::NOT_FOUND,
            AuctionError::AuctionClosed(_) => StatusCode::CONFLICT,
            AuctionError::BidTooLow { .. } => StatusCode::BAD_REQUEST,
            AuctionError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AuctionError::OwnerCannotBid => StatusCode::FORBIDDEN,
            AuctionError::AlreadyHighestBidder => StatusCode::CONFLICT,
            AuctionError::NotListingOwner => StatusCode::FORBIDDEN,
            AuctionError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuctionError::UsernameTaken => StatusCode::CONFLICT,
            AuctionError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuctionError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AuctionError::BidTooLow {
                amount,
                floor,
                contested,
            } => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
                "bid_amount": amount,
                "floor": floor,
                "contested": contested,
            }),
            AuctionError::Store(e) => {
                error!("{:<12} --> 저장소 오류: {:?}", "Handler", e);
                serde_json::json!({
                    "error": "Internal server error.",
                    "code": self.code(),
                })
            }
            _ => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
            }),
        };
        (status, Json(body)).into_response()
    }
}
// endregion: --- Auction Error

// endregion: --- Tests
