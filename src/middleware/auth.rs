//! Bearer-token authentication against the identity provider.
//!
//! Flow: extract `Authorization: Bearer <token>` → verify with the provider
//! → resolve the user record → insert `CurrentUser` into request extensions.
//! Any failure short-circuits before the downstream handler runs; handlers
//! never see a request with partial identity state.
//!
//! No caching: every request pays the provider round-trips. Retry policy,
//! if any, belongs to the provider client, not here.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Apply authentication to a subtree of routes.
///
/// Example:
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum's from_fn cannot take a State extractor; from_fn_with_state passes it explicitly
    router.layer(middleware::from_fn_with_state(state, identity_middleware))
}

async fn identity_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&req).ok_or(AppError::MissingCredential)?;

    // The provider decides whether the token is valid; a malformed header
    // never reaches it (bearer_token already returned None above).
    let claims = match state.identity.verify_token(token).await {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(error = %err, "token verification failed");
            return Err(err.into());
        }
    };

    // Verified-but-deleted subjects are rejected, never treated as anonymous.
    let user = match state.identity.fetch_user(&claims.sub).await {
        Ok(user) => user,
        Err(err) => {
            tracing::warn!(error = %err, subject = %claims.sub, "user resolution failed");
            return Err(err.into());
        }
    };

    // middleware → extractor handoff
    req.extensions_mut().insert(CurrentUser::from(user));

    Ok(next.run(req).await)
}

/// Extract the bearer token, requiring the exact `Bearer <token>` shape.
fn bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        routing::get,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::api::v1::extractors::CurrentUserExtractor;
    use crate::state::AppState;
    use crate::test_support::{
        MockIdentityProvider, ORPHAN_TOKEN, OUTAGE_TOKEN, VALID_TOKEN,
    };

    /// Protected router with a hit counter on the downstream handler.
    fn app(provider: Arc<MockIdentityProvider>) -> (Router, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let handler_hits = hits.clone();

        let routes = Router::new().route(
            "/me",
            get(move |CurrentUserExtractor(user): CurrentUserExtractor| {
                let hits = handler_hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    user.id
                }
            }),
        );

        let state = AppState::new(provider);
        let router = super::apply(routes, state.clone()).with_state(state);
        (router, hits)
    }

    async fn send(router: Router, auth: Option<&str>) -> axum::response::Response {
        let mut builder = Request::builder().uri("/me");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        router
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn missing_header_is_401_without_provider_call() {
        let provider = Arc::new(MockIdentityProvider::default());
        let (router, hits) = app(provider.clone());

        let resp = send(router, None).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(provider.verify_calls.load(Ordering::SeqCst), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn malformed_header_is_401_without_provider_call() {
        let provider = Arc::new(MockIdentityProvider::default());

        for value in ["Basic abc123", "Bearer", "Bearer ", "bearer lowercase"] {
            let (router, hits) = app(provider.clone());
            let resp = send(router, Some(value)).await;

            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "value: {value:?}");
            assert_eq!(hits.load(Ordering::SeqCst), 0);
        }

        assert_eq!(provider.verify_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rejected_token_is_401_and_handler_never_runs() {
        let provider = Arc::new(MockIdentityProvider::default());
        let (router, hits) = app(provider.clone());

        let resp = send(router, Some("Bearer tok-forged")).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(provider.verify_calls.load(Ordering::SeqCst), 1);
        assert_eq!(provider.fetch_calls.load(Ordering::SeqCst), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn deleted_subject_is_401() {
        let provider = Arc::new(MockIdentityProvider::default());
        let (router, hits) = app(provider.clone());

        let resp = send(router, Some(&format!("Bearer {ORPHAN_TOKEN}"))).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(provider.fetch_calls.load(Ordering::SeqCst), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn provider_outage_is_503() {
        let provider = Arc::new(MockIdentityProvider::default());
        let (router, _hits) = app(provider.clone());

        let resp = send(router, Some(&format!("Bearer {OUTAGE_TOKEN}"))).await;

        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_with_identity() {
        let provider = Arc::new(MockIdentityProvider::default());
        let (router, hits) = app(provider.clone());

        let resp = send(router, Some(&format!("Bearer {VALID_TOKEN}"))).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(provider.verify_calls.load(Ordering::SeqCst), 1);
        assert_eq!(provider.fetch_calls.load(Ordering::SeqCst), 1);

        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"user-1");
    }

    #[tokio::test]
    async fn one_provider_instance_serves_all_requests() {
        let provider = Arc::new(MockIdentityProvider::default());
        let (router, hits) = app(provider.clone());

        for _ in 0..3 {
            let resp = send(router.clone(), Some(&format!("Bearer {VALID_TOKEN}"))).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }

        // Same shared instance observed every request; nothing was rebuilt.
        assert_eq!(provider.verify_calls.load(Ordering::SeqCst), 3);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }
}
