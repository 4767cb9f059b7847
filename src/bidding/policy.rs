/// 입찰/종료 정책
/// 기본값은 모든 제한을 끈 상태 (기존 사이트 동작과 동일)
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidPolicy {
    /// 판매자가 자기 상품에 입찰할 수 있는지
    pub allow_owner_bids: bool,
    /// 현재 최고 입찰자가 다시 입찰할 수 있는지
    pub allow_outbidding_self: bool,
    /// 판매자만 경매를 종료할 수 있는지
    pub owner_only_close: bool,
}

impl Default for BidPolicy {
    fn default() -> Self {
        Self {
            allow_owner_bids: true,
            allow_outbidding_self: true,
            owner_only_close: false,
        }
    }
}
