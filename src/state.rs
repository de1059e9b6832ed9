//! Shared application state bound to the Router.
//!
//! Cheap to clone; the identity-provider client behind the `Arc` is built
//! once at startup and never reconstructed or mutated per request.

use std::sync::Arc;

use crate::services::identity::IdentityProvider;

#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self { identity }
    }
}
