/// 입찰 관련 커맨드 처리
/// 1. 입찰
/// 2. 경매 종료
// region:    --- Imports
use super::model::{Bid, Listing, NewBid};
use super::policy::BidPolicy;
use super::rules::{evaluate_bid, validate_amount};
use crate::auction::events::{publish_event, AuctionEvent, EventPublisher};
use crate::error::AuctionError;
use crate::store::{AuctionStore, BidCommit, CloseOutcome};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
// endregion: --- Imports

// region:    --- Commands
/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub listing_id: i64,
    pub bidder_id: i64,
    pub bid_amount: Decimal,
}

/// 입찰 성공 결과
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PlacedBid {
    pub listing: Listing,
    pub bid: Bid,
    pub bid_count: i64,
}

/// 경매 종료 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CloseAuctionCommand {
    pub listing_id: i64,
    pub requested_by: i64,
}

// 최대 시도 횟수 (최초 시도 + 낙관적 재시도 1회)
const MAX_ATTEMPTS: u32 = 2;

/// 1. 입찰
pub async fn handle_place_bid(
    cmd: PlaceBidCommand,
    store: &dyn AuctionStore,
    publisher: &dyn EventPublisher,
    policy: &BidPolicy,
) -> Result<PlacedBid, AuctionError> {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);
    let bid_amount = validate_amount("Bid amount", cmd.bid_amount)?;

    for attempt in 1..=MAX_ATTEMPTS {
        // 상품 정보 조회 (판정에 사용한 버전으로 갱신을 조건 건다)
        let listing = store
            .get_listing(cmd.listing_id)
            .await?
            .ok_or(AuctionError::ListingNotFound(cmd.listing_id))?;

        if let Err(e) = evaluate_bid(&listing, cmd.bidder_id, bid_amount, policy) {
            info!("{:<12} --> 입찰 거절: {}", "Command", e);
            return Err(e);
        }

        let now = Utc::now();
        let new_bid = NewBid {
            listing_id: listing.id,
            bidder_id: cmd.bidder_id,
            bid_amount,
            placed_at: now,
        };

        match store.commit_bid(&new_bid, listing.version).await? {
            BidCommit::Committed {
                listing,
                bid,
                bid_count,
            } => {
                info!(
                    "{:<12} --> 입찰 성공: listing={}, 현재 최고가 {}",
                    "Command", listing.id, bid.bid_amount
                );
                publish_event(
                    publisher,
                    AuctionEvent::BidPlaced {
                        listing_id: listing.id,
                        bidder_id: bid.bidder_id,
                        bid_amount: bid.bid_amount,
                        timestamp: bid.placed_at,
                    },
                )
                .await;
                return Ok(PlacedBid {
                    listing,
                    bid,
                    bid_count,
                });
            }
            BidCommit::Conflict => {
                warn!(
                    "{:<12} --> 낙관적 업데이트로 인한 버전 충돌 (시도 {}/{})",
                    "Command", attempt, MAX_ATTEMPTS
                );
            }
        }
    }

    // 재시도까지 충돌: 현재 기준가를 다시 읽어 거절 사유로 돌려준다
    let listing = store
        .get_listing(cmd.listing_id)
        .await?
        .ok_or(AuctionError::ListingNotFound(cmd.listing_id))?;
    if !listing.is_available {
        return Err(AuctionError::AuctionClosed(listing.id));
    }
    let floor = listing.floor();
    Err(AuctionError::BidTooLow {
        amount: bid_amount,
        floor,
        contested: bid_amount > floor,
    })
}

/// 2. 경매 종료
/// 이미 종료된 경매를 다시 종료하면 아무것도 바꾸지 않고 성공한다.
pub async fn handle_close_auction(
    cmd: CloseAuctionCommand,
    store: &dyn AuctionStore,
    publisher: &dyn EventPublisher,
    policy: &BidPolicy,
) -> Result<Listing, AuctionError> {
    info!("{:<12} --> 경매 종료 요청 처리 시작: {:?}", "Command", cmd);

    let listing = store
        .get_listing(cmd.listing_id)
        .await?
        .ok_or(AuctionError::ListingNotFound(cmd.listing_id))?;

    if policy.owner_only_close && listing.listed_by != cmd.requested_by {
        return Err(AuctionError::NotListingOwner);
    }

    match store.close_listing(cmd.listing_id).await? {
        CloseOutcome::Closed(listing) => {
            info!(
                "{:<12} --> 경매 종료: listing={}, 낙찰자 {:?}",
                "Command", listing.id, listing.highest_bid_user
            );
            publish_event(
                publisher,
                AuctionEvent::AuctionClosed {
                    listing_id: listing.id,
                    closed_by: cmd.requested_by,
                    winner_id: listing.highest_bid_user,
                    winning_bid: listing.highest_bid,
                    timestamp: Utc::now(),
                },
            )
            .await;
            Ok(listing)
        }
        CloseOutcome::AlreadyClosed(listing) => Ok(listing),
        CloseOutcome::NotFound => Err(AuctionError::ListingNotFound(cmd.listing_id)),
    }
}

// endregion: --- Commands
