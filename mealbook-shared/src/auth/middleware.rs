/// Request authentication context
///
/// The API layer validates the bearer token and inserts an [`AuthContext`]
/// into the request extensions; handlers read it back with axum's
/// `Extension` extractor. Public read endpoints use an optional variant of
/// the same layer, so handlers there receive `Option<AuthContext>`.

use uuid::Uuid;

/// Error type for authentication failures at the request boundary
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No credentials provided
    #[error("Missing credentials")]
    MissingCredentials,

    /// Authorization header is present but malformed
    #[error("Invalid authorization header: {0}")]
    InvalidFormat(String),

    /// Token failed validation
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Identity of the authenticated caller, injected per request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,
}

impl AuthContext {
    /// Creates auth context from validated JWT claims
    pub fn from_jwt(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_context_from_jwt() {
        let user_id = Uuid::new_v4();
        let ctx = AuthContext::from_jwt(user_id);
        assert_eq!(ctx.user_id, user_id);
    }
}
