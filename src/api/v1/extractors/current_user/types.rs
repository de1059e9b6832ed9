use crate::services::identity::ResolvedUser;

/// Identity resolved by the auth middleware, immutable for the rest of the
/// request. Inserted into request extensions exactly once per request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl From<ResolvedUser> for CurrentUser {
    fn from(user: ResolvedUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
        }
    }
}
