use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Claims returned by the provider's token-verification endpoint.
///
/// Only `sub` matters to this service; everything else the provider returns
/// is ignored during deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifiedClaims {
    pub sub: String,
}

/// User record as stored by the identity provider.
///
/// Attributes other than `id` are opaque to the middleware; they are carried
/// through for downstream handlers.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolvedUser {
    pub id: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider looked at the credential and said no (bad signature,
    /// expired, unknown token, ...).
    #[error("provider rejected credential: {0}")]
    Rejected(String),

    /// Token verified, but the subject has no user record anymore.
    #[error("subject not found at provider")]
    UserNotFound,

    /// Could not reach the provider at all.
    #[error("provider transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered, but with a server-side failure status.
    #[error("provider returned {0}")]
    Upstream(reqwest::StatusCode),
}

/// Remote capability of the identity provider.
///
/// Implementations must be safe to share across requests (`Send + Sync`)
/// and read-only after construction.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Submit a bearer token for verification; returns the claims on success.
    async fn verify_token(&self, token: &str) -> Result<VerifiedClaims, IdentityError>;

    /// Fetch the user record for a verified subject.
    async fn fetch_user(&self, subject: &str) -> Result<ResolvedUser, IdentityError>;
}
