//! URL structure of the protected v1 surface.
//!
//! Everything in here sits behind the auth middleware; public endpoints
//! (`/health`, `/docs`) are wired directly in `app::build_router`.

use axum::{Router, routing::get};

use crate::api::v1::handlers::{items::list_items, me::me};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/items", get(list_items))
}
