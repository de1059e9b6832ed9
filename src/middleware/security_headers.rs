//! Security-related response headers for browser clients.
//!
//! This middleware wraps the whole Router: it always runs the downstream
//! chain first, then stamps the response. It is response-shaping only and
//! never rejects a request.
//!
//! Responsibility:
//! - Content-Security-Policy, selected per request path
//! - Clickjacking / MIME-sniffing / referrer-leakage protection
//! - Strict-Transport-Security in production only (HSTS on plain-HTTP
//!   development setups breaks local work)
//! - Strip `Server` / `X-Powered-By` regardless of who set them

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderValue, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::config::{AppEnv, Config};

/// The interactive API-documentation page. The only path whose CSP allows
/// inline scripts and the Swagger UI CDN.
pub const DOCS_PATH: &str = "/docs";

const CDN_ORIGIN: &str = "https://cdn.jsdelivr.net";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CspVariant {
    /// `script-src 'self'` only; inline styles allowed.
    Strict,
    /// Inline scripts/styles plus the documentation CDN.
    Relaxed,
}

/// Header policy derived from configuration at router build time.
///
/// CSP exceptions are an ordered path table so additional relaxed paths can
/// be added without growing conditionals; first exact match wins.
#[derive(Debug, Clone)]
pub struct HeaderPolicy {
    exceptions: Vec<(String, CspVariant)>,
    hsts: bool,
}

impl HeaderPolicy {
    pub fn new(app_env: AppEnv) -> Self {
        Self {
            exceptions: vec![(DOCS_PATH.to_string(), CspVariant::Relaxed)],
            hsts: app_env.is_production(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.app_env)
    }

    fn variant_for(&self, path: &str) -> CspVariant {
        self.exceptions
            .iter()
            .find(|(exception, _)| exception == path)
            .map(|(_, variant)| *variant)
            .unwrap_or(CspVariant::Strict)
    }
}

/// Apply the security-header policy to all responses of the given Router.
pub fn apply(router: Router, policy: HeaderPolicy) -> Router {
    router.layer(middleware::from_fn_with_state(policy, enforce_headers))
}

async fn enforce_headers(
    State(policy): State<HeaderPolicy>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let variant = policy.variant_for(req.uri().path());

    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    // Our CSP strings are fixed and always valid header values; skip the
    // header rather than fail the response if that ever stops holding.
    if let Ok(csp) = HeaderValue::from_str(&content_security_policy(variant)) {
        headers.insert(header::CONTENT_SECURITY_POLICY, csp);
    }

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::X_XSS_PROTECTION,
        HeaderValue::from_static("1; mode=block"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        header::HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static("geolocation=(), microphone=(), camera=()"),
    );

    if policy.hsts {
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains; preload"),
        );
    }

    // Remove, not blank: these identify the stack to scanners.
    headers.remove(header::SERVER);
    headers.remove(header::HeaderName::from_static("x-powered-by"));

    response
}

fn content_security_policy(variant: CspVariant) -> String {
    let (script_src, style_src) = match variant {
        CspVariant::Relaxed => (
            format!("script-src 'self' 'unsafe-inline' {}", CDN_ORIGIN),
            format!("style-src 'self' 'unsafe-inline' {}", CDN_ORIGIN),
        ),
        CspVariant::Strict => (
            "script-src 'self'".to_string(),
            "style-src 'self' 'unsafe-inline'".to_string(),
        ),
    };

    [
        "default-src 'self'".to_string(),
        script_src,
        style_src,
        "img-src 'self' data: https:".to_string(),
        "font-src 'self'".to_string(),
        "connect-src 'self'".to_string(),
        "media-src 'self'".to_string(),
        "object-src 'none'".to_string(),
        "base-uri 'self'".to_string(),
        "form-action 'self'".to_string(),
        "frame-ancestors 'none'".to_string(),
        "upgrade-insecure-requests".to_string(),
    ]
    .join("; ")
}
