use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use crate::state::AppState;

use super::CurrentUser;

/// Extractor handing `CurrentUser` to handlers.
///
/// Assumes the auth middleware already inserted it into request extensions;
/// if it is missing the route was wired without authentication, and the
/// safe answer is 401.
pub struct CurrentUserExtractor(pub CurrentUser);

impl FromRequestParts<AppState> for CurrentUserExtractor
where
    AppState: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .map(CurrentUserExtractor)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
