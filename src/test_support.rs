//! Shared fixtures for middleware tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::services::identity::{IdentityError, IdentityProvider, ResolvedUser, VerifiedClaims};

/// Verifies and resolves to `user-1`.
pub const VALID_TOKEN: &str = "tok-valid";
/// Verifies, but the subject's user record is gone.
pub const ORPHAN_TOKEN: &str = "tok-orphan";
/// Simulates the provider being unreachable.
pub const OUTAGE_TOKEN: &str = "tok-outage";

/// In-memory stand-in for the identity provider, with call counters so tests
/// can assert which remote operations a request triggered.
#[derive(Debug, Default)]
pub struct MockIdentityProvider {
    pub verify_calls: AtomicUsize,
    pub fetch_calls: AtomicUsize,
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<VerifiedClaims, IdentityError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);

        match token {
            VALID_TOKEN => Ok(VerifiedClaims {
                sub: "user-1".to_string(),
            }),
            ORPHAN_TOKEN => Ok(VerifiedClaims {
                sub: "user-gone".to_string(),
            }),
            OUTAGE_TOKEN => Err(IdentityError::Upstream(reqwest::StatusCode::BAD_GATEWAY)),
            _ => Err(IdentityError::Rejected("unknown token".to_string())),
        }
    }

    async fn fetch_user(&self, subject: &str) -> Result<ResolvedUser, IdentityError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        match subject {
            "user-1" => Ok(ResolvedUser {
                id: "user-1".to_string(),
                email: Some("user1@example.com".to_string()),
                display_name: Some("User One".to_string()),
            }),
            _ => Err(IdentityError::UserNotFound),
        }
    }
}
