//! Identity-provider integration.
//!
//! Responsibility:
//! - `IdentityProvider`: the two remote operations this service relies on
//!   (token verification, user resolution), behind a trait so middleware can
//!   be exercised against a mock.
//! - `HttpIdentityProvider`: the reqwest-backed implementation, built once
//!   at startup from the configured secret key.

mod http;
mod provider;

pub use http::{HttpIdentityProvider, IdentityClientError, VerifyOptions};
pub use provider::{IdentityError, IdentityProvider, ResolvedUser, VerifiedClaims};
