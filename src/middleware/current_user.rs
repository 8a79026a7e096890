use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::{error::AppError, models::UserId};

/// Header carrying the authenticated user's ID, set by the auth gateway
pub const USER_ID_HEADER: &str = "x-user-id";

/// The caller's identity as asserted by the upstream authentication layer
///
/// Rejects with 401 when the header is missing or not an integer. Use
/// `Option<CurrentUser>` on routes that also serve anonymous callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        raw.to_str()
            .ok()
            .and_then(|s| s.trim().parse::<UserId>().ok())
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthorized(format!("Malformed {} header", USER_ID_HEADER)))
    }
}
