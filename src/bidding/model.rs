use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// 사용자 모델 (자격 증명은 외부 인증 서비스가 관리)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

// 경매 상품 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Listing {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub min_price: Decimal,
    pub image_url: String,
    pub category: String,
    pub listed_by: i64,
    pub created_at: DateTime<Utc>,
    /// 마지막으로 수락된 입찰 금액 (입찰 전에는 없음)
    pub highest_bid: Option<Decimal>,
    pub highest_bid_user: Option<i64>,
    pub is_available: bool,
    /// 낙관적 동시성 제어용 버전, 변경될 때마다 1 증가
    pub version: i64,
}

/// 경매 상태 (Closed 는 종료 상태)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuctionState {
    Open,
    Closed,
}

impl Listing {
    pub fn state(&self) -> AuctionState {
        if self.is_available {
            AuctionState::Open
        } else {
            AuctionState::Closed
        }
    }

    /// 다음 입찰이 반드시 초과해야 하는 금액
    pub fn floor(&self) -> Decimal {
        match self.highest_bid {
            Some(highest) if highest > self.min_price => highest,
            _ => self.min_price,
        }
    }

    pub fn is_highest_bidder(&self, user_id: i64) -> bool {
        self.highest_bid_user == Some(user_id)
    }
}

// 입찰 모델 (생성 후 변경 불가)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub listing_id: i64,
    pub bidder_id: i64,
    pub bid_amount: Decimal,
    pub placed_at: DateTime<Utc>,
}

// 댓글 모델 (생성 후 변경 불가)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub listing_id: i64,
    pub author_id: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// 사용자 등록 요청
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// 상품 등록 요청
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub min_price: Decimal,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub category: String,
}

/// 저장소에 기록할 입찰
#[derive(Debug, Clone, PartialEq)]
pub struct NewBid {
    pub listing_id: i64,
    pub bidder_id: i64,
    pub bid_amount: Decimal,
    pub placed_at: DateTime<Utc>,
}

/// 저장소에 기록할 댓글
#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub listing_id: i64,
    pub author_id: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
