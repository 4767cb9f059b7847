/// 입찰 판정 규칙 (저장소와 무관한 순수 함수)
// region:    --- Imports
use super::model::Listing;
use super::policy::BidPolicy;
use crate::error::AuctionError;
use rust_decimal::Decimal;

// endregion: --- Imports

// region:    --- Rules
/// 금액에 허용되는 최대 소수 자릿수
pub const MAX_AMOUNT_SCALE: u32 = 2;

/// 저장 가능한 최대 금액 9_999_999_999.99 (NUMERIC(12,2))
// 999_999_999_999 = 232 * 2^32 + 3_567_587_327, scale 2
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// 금액 검증: 0 보다 크고, 소수 둘째 자리까지, 최대 금액 이하
pub fn validate_amount(field: &str, amount: Decimal) -> Result<Decimal, AuctionError> {
    let amount = amount.normalize();
    if amount <= Decimal::ZERO {
        return Err(AuctionError::Validation(format!(
            "{field} must be greater than zero."
        )));
    }
    if amount.scale() > MAX_AMOUNT_SCALE {
        return Err(AuctionError::Validation(format!(
            "{field} must have at most {MAX_AMOUNT_SCALE} decimal places."
        )));
    }
    if amount > MAX_AMOUNT {
        return Err(AuctionError::Validation(format!(
            "{field} must not exceed {MAX_AMOUNT}."
        )));
    }
    Ok(amount)
}

/// 입찰 가능 여부 판정
/// 종료 여부, 정책, 최저 입찰 기준 순서로 검사한다.
pub fn evaluate_bid(
    listing: &Listing,
    bidder_id: i64,
    bid_amount: Decimal,
    policy: &BidPolicy,
) -> Result<(), AuctionError> {
    if !listing.is_available {
        return Err(AuctionError::AuctionClosed(listing.id));
    }
    if !policy.allow_owner_bids && listing.listed_by == bidder_id {
        return Err(AuctionError::OwnerCannotBid);
    }
    if !policy.allow_outbidding_self && listing.is_highest_bidder(bidder_id) {
        return Err(AuctionError::AlreadyHighestBidder);
    }

    let floor = listing.floor();
    if bid_amount <= floor {
        return Err(AuctionError::BidTooLow {
            amount: bid_amount,
            floor,
            contested: false,
        });
    }
    Ok(())
}

/// 상품 화면에 보여줄 경매 상태 메시지
pub fn status_message(
    closed: bool,
    requester_is_high_bidder: bool,
    bid_count: i64,
) -> Option<String> {
    if closed && requester_is_high_bidder {
        return Some("You won this auction!".to_string());
    }
    if !closed && bid_count > 0 && requester_is_high_bidder {
        return Some("Your bid is the current bid.".to_string());
    }
    match bid_count {
        0 => None,
        1 => Some("1 bid so far.".to_string()),
        n => Some(format!("{n} bids so far.")),
    }
}
// endregion: --- Rules

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn open_listing() -> Listing {
        Listing {
            id: 7,
            title: "Bike".to_string(),
            description: "Road bike".to_string(),
            min_price: dec!(100),
            image_url: String::new(),
            category: "Sports".to_string(),
            listed_by: 1,
            created_at: Utc::now(),
            highest_bid: None,
            highest_bid_user: None,
            is_available: true,
            version: 0,
        }
    }

    #[test]
    fn amount_must_be_positive_with_two_decimals() {
        assert_eq!(validate_amount("Bid", dec!(100.10)).unwrap(), dec!(100.1));
        assert!(matches!(
            validate_amount("Bid", dec!(0)),
            Err(AuctionError::Validation(_))
        ));
        assert!(matches!(
            validate_amount("Bid", dec!(-5)),
            Err(AuctionError::Validation(_))
        ));
        assert!(matches!(
            validate_amount("Bid", dec!(1.005)),
            Err(AuctionError::Validation(_))
        ));
        // 뒤쪽 0 은 자릿수로 세지 않는다
        assert!(validate_amount("Bid", dec!(2.500)).is_ok());
    }

    #[test]
    fn amount_must_fit_storage_precision() {
        assert_eq!(MAX_AMOUNT, dec!(9999999999.99));
        assert!(validate_amount("Bid", dec!(9999999999.99)).is_ok());
        assert!(matches!(
            validate_amount("Bid", dec!(10000000000)),
            Err(AuctionError::Validation(_))
        ));
        assert!(matches!(
            validate_amount("Minimum price", dec!(100000000000)),
            Err(AuctionError::Validation(_))
        ));
    }

    #[test]
    fn bid_equal_to_min_price_is_too_low() {
        let err = evaluate_bid(&open_listing(), 2, dec!(100), &BidPolicy::default()).unwrap_err();
        assert!(matches!(err, AuctionError::BidTooLow { floor, .. } if floor == dec!(100)));
        assert!(evaluate_bid(&open_listing(), 2, dec!(100.01), &BidPolicy::default()).is_ok());
    }

    #[test]
    fn closed_listing_rejects_before_amount_check() {
        let mut listing = open_listing();
        listing.is_available = false;
        let err = evaluate_bid(&listing, 2, dec!(1), &BidPolicy::default()).unwrap_err();
        assert!(matches!(err, AuctionError::AuctionClosed(7)));
    }

    #[test]
    fn policy_restrictions_are_opt_in() {
        let mut listing = open_listing();
        listing.highest_bid = Some(dec!(150));
        listing.highest_bid_user = Some(2);

        // 기본 정책: 판매자 입찰과 연속 입찰 모두 허용
        assert!(evaluate_bid(&listing, 1, dec!(151), &BidPolicy::default()).is_ok());
        assert!(evaluate_bid(&listing, 2, dec!(151), &BidPolicy::default()).is_ok());

        let strict = BidPolicy {
            allow_owner_bids: false,
            allow_outbidding_self: false,
            owner_only_close: true,
        };
        assert!(matches!(
            evaluate_bid(&listing, 1, dec!(151), &strict),
            Err(AuctionError::OwnerCannotBid)
        ));
        assert!(matches!(
            evaluate_bid(&listing, 2, dec!(151), &strict),
            Err(AuctionError::AlreadyHighestBidder)
        ));
        assert!(evaluate_bid(&listing, 3, dec!(151), &strict).is_ok());
    }

    #[test]
    fn status_messages() {
        assert_eq!(
            status_message(true, true, 3).as_deref(),
            Some("You won this auction!")
        );
        assert_eq!(
            status_message(false, true, 3).as_deref(),
            Some("Your bid is the current bid.")
        );
        assert_eq!(status_message(false, false, 1).as_deref(), Some("1 bid so far."));
        assert_eq!(status_message(true, false, 4).as_deref(), Some("4 bids so far."));
        assert_eq!(status_message(false, false, 0), None);
        assert_eq!(status_message(true, false, 0), None);
    }
}
// endregion: --- Tests
