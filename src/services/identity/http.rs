use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use thiserror::Error;
use url::Url;

use super::provider::{IdentityError, IdentityProvider, ResolvedUser, VerifiedClaims};

/// Upper bound for a single provider round-trip. Kept well below the
/// gateway's own request timeout so a slow provider surfaces as 503 here
/// instead of a generic timeout upstream.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Provider-specific verification options, forwarded with every
/// token-verification call. Configuration, not logic.
#[derive(Debug, Clone, Default)]
pub struct VerifyOptions {
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

#[derive(Debug, Error)]
pub enum IdentityClientError {
    #[error("invalid identity provider url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("identity secret key must not be empty")]
    EmptySecret,

    #[error("identity secret key contains invalid characters")]
    InvalidSecret,

    #[error("failed to build http client: {0}")]
    Http(#[from] reqwest::Error),
}

/// HTTP client for the identity provider.
///
/// Construct exactly once per process (see `app::build_state`) and share via
/// `AppState`; the inner `reqwest::Client` pools connections internally.
#[derive(Clone)]
pub struct HttpIdentityProvider {
    http: reqwest::Client,
    base_url: String,
    options: VerifyOptions,
}

impl std::fmt::Debug for HttpIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The secret key lives in the client's default headers; keep it out of Debug.
        f.debug_struct("HttpIdentityProvider")
            .field("base_url", &self.base_url)
            .field("options", &self.options)
            .finish()
    }
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,

    #[serde(skip_serializing_if = "Option::is_none")]
    issuer: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    audience: Option<&'a str>,
}

impl HttpIdentityProvider {
    pub fn new(
        base_url: &str,
        secret_key: &str,
        options: VerifyOptions,
    ) -> Result<Self, IdentityClientError> {
        let secret = secret_key.trim();
        if secret.is_empty() {
            return Err(IdentityClientError::EmptySecret);
        }

        // Validate the base URL up front; every later failure is then a
        // provider failure, not a configuration one.
        let parsed = Url::parse(base_url)?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", secret))
            .map_err(|_| IdentityClientError::InvalidSecret)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            options,
        })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<VerifiedClaims, IdentityError> {
        let body = VerifyRequest {
            token,
            issuer: self.options.issuer.as_deref(),
            audience: self.options.audience.as_deref(),
        };

        let resp = self
            .http
            .post(format!("{}/v1/tokens/verify", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            let claims: VerifiedClaims = resp.json().await?;
            if claims.sub.trim().is_empty() {
                return Err(IdentityError::Rejected("empty subject claim".into()));
            }
            Ok(claims)
        } else if status.is_client_error() {
            Err(IdentityError::Rejected(format!(
                "verification endpoint returned {}",
                status
            )))
        } else {
            Err(IdentityError::Upstream(status))
        }
    }

    async fn fetch_user(&self, subject: &str) -> Result<ResolvedUser, IdentityError> {
        let resp = self
            .http
            .get(format!("{}/v1/users/{}", self.base_url, subject))
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            Ok(resp.json().await?)
        } else if status == StatusCode::NOT_FOUND {
            Err(IdentityError::UserNotFound)
        } else if status.is_client_error() {
            Err(IdentityError::Rejected(format!(
                "user lookup returned {}",
                status
            )))
        } else {
            Err(IdentityError::Upstream(status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_secret() {
        let res = HttpIdentityProvider::new("https://identity.test", "", VerifyOptions::default());
        assert!(matches!(res, Err(IdentityClientError::EmptySecret)));

        let res =
            HttpIdentityProvider::new("https://identity.test", "   ", VerifyOptions::default());
        assert!(matches!(res, Err(IdentityClientError::EmptySecret)));
    }

    #[test]
    fn rejects_malformed_base_url() {
        let res = HttpIdentityProvider::new("not a url", "sk_test", VerifyOptions::default());
        assert!(matches!(res, Err(IdentityClientError::InvalidBaseUrl(_))));
    }

    #[test]
    fn normalizes_trailing_slash() {
        let client =
            HttpIdentityProvider::new("https://identity.test/", "sk_test", VerifyOptions::default())
                .unwrap();
        assert_eq!(client.base_url, "https://identity.test");
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let client = HttpIdentityProvider::new(
            "https://identity.test",
            "sk_live_very_secret",
            VerifyOptions::default(),
        )
        .unwrap();
        let dump = format!("{:?}", client);
        assert!(!dump.contains("sk_live_very_secret"));
    }
}
