//! GET /api/v1/me (echo the authenticated identity).

use axum::Json;

use crate::api::v1::dto::me::MeResponse;
use crate::api::v1::extractors::CurrentUserExtractor;

pub async fn me(CurrentUserExtractor(user): CurrentUserExtractor) -> Json<MeResponse> {
    Json(MeResponse::from(user))
}
