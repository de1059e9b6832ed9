//! Authenticated-user extractor.
//!
//! Responsibility:
//! - Give handlers typed access to the identity the auth middleware resolved.
//! - Keep the axum plumbing in `core`; the plain type lives in `types`.
//!
//! Public API:
//! - `CurrentUser`
//! - `CurrentUserExtractor`

mod core;
mod types;

pub use core::CurrentUserExtractor;
pub use types::CurrentUser;
