// region:    --- Users
/// 사용자 등록
pub const INSERT_USER: &str = "INSERT INTO users (username, email, created_at) VALUES ($1, $2, $3) RETURNING id, username, email, created_at";

/// 사용자 조회
pub const GET_USER: &str = "SELECT id, username, email, created_at FROM users WHERE id = $1";
// endregion: --- Users

// region:    --- Listings
/// 상품 등록
pub const INSERT_LISTING: &str = r#"
    INSERT INTO listings (title, description, min_price, image_url, category, listed_by, created_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
    RETURNING id, title, description, min_price, image_url, category, listed_by, created_at,
              highest_bid, highest_bid_user, is_available, version
"#;

/// 상품 조회
pub const GET_LISTING: &str = r#"
    SELECT id, title, description, min_price, image_url, category, listed_by, created_at,
           highest_bid, highest_bid_user, is_available, version
    FROM listings
    WHERE id = $1
"#;

/// 모든 상품 조회
pub const GET_ALL_LISTINGS: &str = r#"
    SELECT id, title, description, min_price, image_url, category, listed_by, created_at,
           highest_bid, highest_bid_user, is_available, version
    FROM listings
    ORDER BY created_at DESC, id DESC
"#;

/// 카테고리별 상품 조회
pub const GET_LISTINGS_IN_CATEGORY: &str = r#"
    SELECT id, title, description, min_price, image_url, category, listed_by, created_at,
           highest_bid, highest_bid_user, is_available, version
    FROM listings
    WHERE category = $1
    ORDER BY created_at DESC, id DESC
"#;

/// 카테고리 목록 조회
pub const GET_CATEGORIES: &str =
    "SELECT DISTINCT category FROM listings WHERE category <> '' ORDER BY category";

/// 최고가 갱신 (버전이 일치하고 경매가 진행 중일 때만)
pub const UPDATE_LISTING_HIGHEST_BID: &str = r#"
    UPDATE listings
    SET highest_bid = $1, highest_bid_user = $2, version = version + 1
    WHERE id = $3 AND version = $4 AND is_available
    RETURNING id, title, description, min_price, image_url, category, listed_by, created_at,
              highest_bid, highest_bid_user, is_available, version
"#;

/// 경매 종료
pub const CLOSE_LISTING: &str = r#"
    UPDATE listings
    SET is_available = FALSE, version = version + 1
    WHERE id = $1 AND is_available
    RETURNING id, title, description, min_price, image_url, category, listed_by, created_at,
              highest_bid, highest_bid_user, is_available, version
"#;
// endregion: --- Listings

// region:    --- Bids
/// 입찰 기록
pub const INSERT_BID: &str = r#"
    INSERT INTO bids (listing_id, bidder_id, bid_amount, placed_at)
    VALUES ($1, $2, $3, $4)
    RETURNING id, listing_id, bidder_id, bid_amount, placed_at
"#;

/// 입찰 이력 조회
pub const GET_BID_HISTORY: &str = r#"
    SELECT id, listing_id, bidder_id, bid_amount, placed_at
    FROM bids
    WHERE listing_id = $1
    ORDER BY placed_at DESC, id DESC
"#;

/// 입찰 수 조회
pub const COUNT_BIDS: &str = "SELECT COUNT(*) FROM bids WHERE listing_id = $1";
// endregion: --- Bids

// region:    --- Watchlist
/// 관심 목록 추가 (이미 있으면 무시)
pub const INSERT_WATCHER: &str = "INSERT INTO listing_watchers (listing_id, user_id) VALUES ($1, $2) ON CONFLICT (listing_id, user_id) DO NOTHING";

/// 관심 목록 삭제
pub const DELETE_WATCHER: &str =
    "DELETE FROM listing_watchers WHERE listing_id = $1 AND user_id = $2";

/// 관심 여부 조회
pub const IS_WATCHING: &str =
    "SELECT EXISTS (SELECT 1 FROM listing_watchers WHERE listing_id = $1 AND user_id = $2)";

/// 사용자의 관심 상품 조회
pub const GET_WATCHED_LISTINGS: &str = r#"
    SELECT l.id, l.title, l.description, l.min_price, l.image_url, l.category, l.listed_by,
           l.created_at, l.highest_bid, l.highest_bid_user, l.is_available, l.version
    FROM listings l
    JOIN listing_watchers w ON w.listing_id = l.id
    WHERE w.user_id = $1
    ORDER BY l.created_at DESC, l.id DESC
"#;
// endregion: --- Watchlist

// region:    --- Comments
/// 댓글 등록
pub const INSERT_COMMENT: &str = r#"
    INSERT INTO comments (listing_id, author_id, body, created_at)
    VALUES ($1, $2, $3, $4)
    RETURNING id, listing_id, author_id, body, created_at
"#;

/// 댓글 조회
pub const GET_COMMENTS: &str = r#"
    SELECT id, listing_id, author_id, body, created_at
    FROM comments
    WHERE listing_id = $1
    ORDER BY created_at, id
"#;
// endregion: --- Comments
