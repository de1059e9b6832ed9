//! GET /api/v1/items (sample protected resource).
//!
//! Exists to exercise the middleware chain end to end; a real deployment
//! would back this with storage.

use axum::Json;

use crate::api::v1::dto::items::{ItemListResponse, ItemResponse};
use crate::api::v1::extractors::CurrentUserExtractor;

pub async fn list_items(
    CurrentUserExtractor(user): CurrentUserExtractor,
) -> Json<ItemListResponse> {
    let items = vec![ItemResponse {
        id: "item-1".to_string(),
        name: format!("starter item for {}", user.id),
    }];

    Json(ItemListResponse { items })
}
