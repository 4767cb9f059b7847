/// 요청자 식별
/// 인증은 앞단의 인증 서비스가 처리하고, 확인된 사용자 id 를 헤더로 넘겨준다고 가정한다.
// region:    --- Imports
use crate::bidding::model::User;
use crate::error::AuctionError;
use crate::handlers::AppState;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::debug;

// endregion: --- Imports

/// 인증 서비스가 채워주는 사용자 id 헤더
pub const USER_ID_HEADER: &str = "x-user-id";

/// 요청자 (저장소에 존재하는 사용자)
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn id(&self) -> i64 {
        self.0.id
    }
}

/// 헤더의 사용자 id (헤더가 없으면 None, 형식이 잘못되면 오류)
fn header_user_id(parts: &Parts) -> Result<Option<i64>, AuctionError> {
    let Some(value) = parts.headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|value| value.trim().parse::<i64>().ok())
        .map(Some)
        .ok_or(AuctionError::Unauthenticated)
}

/// 저장소에서 사용자 조회 (없으면 인증 실패)
async fn load_user(state: &AppState, user_id: i64) -> Result<User, AuctionError> {
    match state.store.get_user(user_id).await? {
        Some(user) => Ok(user),
        None => {
            debug!("{:<12} --> 알 수 없는 사용자 id: {}", "Auth", user_id);
            Err(AuctionError::Unauthenticated)
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuctionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = header_user_id(parts)?.ok_or(AuctionError::Unauthenticated)?;
        Ok(CurrentUser(load_user(state, user_id).await?))
    }
}

/// 익명 조회를 허용하는 요청자
/// 헤더가 없을 때만 익명이고, 잘못된 id 와 저장소 오류는 그대로 거절한다.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

impl MaybeUser {
    pub fn id(&self) -> Option<i64> {
        self.0.as_ref().map(|user| user.id)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AuctionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match header_user_id(parts)? {
            Some(user_id) => Ok(MaybeUser(Some(load_user(state, user_id).await?))),
            None => Ok(MaybeUser(None)),
        }
    }
}
