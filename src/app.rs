//! Service bootstrap.
//!
//! Responsibility:
//! - Config load → dependency construction → Router assembly → serve.
//! - Middleware composition happens here and nowhere else, so the request
//!   path is readable top to bottom in `build_router`.

use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware::security_headers::{DOCS_PATH, HeaderPolicy};
use crate::middleware::{auth, cors, http, security_headers};
use crate::services::identity::{HttpIdentityProvider, VerifyOptions};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise a sensible default.
    // Ex: RUST_LOG=info,identity_gateway=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Surface panics via tracing so they are not lost when stderr is
        // swallowed by the process supervisor.
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();

    // A missing or empty secret key fails here, before we bind the listener.
    // Refusing to start beats serving unauthenticated traffic.
    let config = Config::from_env().context("failed to load configuration")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting identity-gateway in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build process-level services and inject them into the shared state.
///
/// The identity-provider client is constructed exactly once here; every
/// request reuses it through `AppState`.
fn build_state(config: &Config) -> Result<AppState> {
    let provider = HttpIdentityProvider::new(
        &config.identity_api_url,
        &config.identity_secret_key,
        VerifyOptions {
            issuer: config.identity_issuer.clone(),
            audience: config.identity_audience.clone(),
        },
    )
    .context("failed to construct identity provider client")?;

    Ok(AppState::new(Arc::new(provider)))
}

fn build_router(state: AppState, config: &Config) -> Router {
    // Protected surface: everything under /api/v1 goes through auth.
    let v1 = auth::apply(api::v1::routes(), state.clone());

    let router = Router::new()
        .route("/health", get(api::v1::handlers::health::health))
        .route(DOCS_PATH, get(api::v1::handlers::docs::docs))
        .nest("/api/v1", v1)
        .with_state(state);

    // Outermost last: security headers stamp every response, including
    // auth rejections, timeouts and 404s.
    let router = cors::apply(router, config);
    let router = http::apply(router);
    security_headers::apply(router, HeaderPolicy::from_config(config))
}
