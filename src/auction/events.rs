// region:    --- Imports
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Auction Event
/// 커밋 이후 외부로 알리는 경매 이벤트
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum AuctionEvent {
    // 상품 등록 이벤트
    ListingCreated {
        listing_id: i64,
        owner_id: i64,
        title: String,
        min_price: Decimal,
        timestamp: DateTime<Utc>,
    },
    // 입찰 이벤트
    BidPlaced {
        listing_id: i64,
        bidder_id: i64,
        bid_amount: Decimal,
        timestamp: DateTime<Utc>,
    },
    // 경매 종료 이벤트 (입찰이 없었으면 낙찰자 없음)
    AuctionClosed {
        listing_id: i64,
        closed_by: i64,
        winner_id: Option<i64>,
        winning_bid: Option<Decimal>,
        timestamp: DateTime<Utc>,
    },
    // 댓글 이벤트
    CommentAdded {
        listing_id: i64,
        comment_id: i64,
        author_id: i64,
        timestamp: DateTime<Utc>,
    },
}

impl AuctionEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            AuctionEvent::ListingCreated { .. } => "ListingCreated",
            AuctionEvent::BidPlaced { .. } => "BidPlaced",
            AuctionEvent::AuctionClosed { .. } => "AuctionClosed",
            AuctionEvent::CommentAdded { .. } => "CommentAdded",
        }
    }

    /// 메시지 키 (같은 상품의 이벤트는 같은 파티션으로)
    pub fn listing_id(&self) -> i64 {
        match self {
            AuctionEvent::ListingCreated { listing_id, .. }
            | AuctionEvent::BidPlaced { listing_id, .. }
            | AuctionEvent::AuctionClosed { listing_id, .. }
            | AuctionEvent::CommentAdded { listing_id, .. } => *listing_id,
        }
    }
}
// endregion: --- Auction Event

// region:    --- Event Publisher
/// 이벤트 발행 트레이트
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &AuctionEvent) -> Result<(), String>;
}

/// 메시지 브로커 없이 로그로만 남기는 발행자
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPublisher;

#[async_trait]
impl EventPublisher for LogPublisher {
    async fn publish(&self, event: &AuctionEvent) -> Result<(), String> {
        info!(
            "{:<12} --> {} (listing={})",
            "Event",
            event.event_type(),
            event.listing_id()
        );
        Ok(())
    }
}

/// 이벤트 발행
/// 데이터는 이미 커밋되었으므로 발행 실패는 경고만 남긴다.
pub async fn publish_event(publisher: &dyn EventPublisher, event: AuctionEvent) {
    if let Err(e) = publisher.publish(&event).await {
        warn!(
            "{:<12} --> {} 이벤트 발행 실패: {}",
            "Event",
            event.event_type(),
            e
        );
    }
}
// endregion: --- Event Publisher
