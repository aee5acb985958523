//! Bearer-token helpers for integration tests.
//!
//! Protected routes validate an HS256 access token. `MockAuth` mints one with the
//! same secret the test app is configured with, so no OAuth round-trip is needed.

use chrono::Utc;
use formerr_auth_types::token::{JwtClaims, issue_access_token};
use formerr_domain::role::UserRole;

/// Configurable identity encoded into test tokens.
pub struct MockAuth {
    pub user_id: String,
    pub email: String,
    pub role: UserRole,
}

impl MockAuth {
    pub fn new(user_id: &str, role: UserRole) -> Self {
        Self {
            user_id: user_id.to_owned(),
            email: format!("{user_id}@example.com"),
            role,
        }
    }

    /// Token valid for one hour.
    pub fn token(&self, secret: &str) -> String {
        self.token_expiring_at(secret, Utc::now().timestamp() + 3600)
    }

    /// Token already past its expiry (beyond the validator's leeway).
    pub fn expired_token(&self, secret: &str) -> String {
        self.token_expiring_at(secret, Utc::now().timestamp() - 3600)
    }

    fn token_expiring_at(&self, secret: &str, exp: i64) -> String {
        let claims = JwtClaims {
            sub: self.user_id.clone(),
            email: self.email.clone(),
            role: self.role,
            exp: u64::try_from(exp).unwrap_or(0),
        };
        issue_access_token(&claims, secret).expect("failed to sign test token")
    }
}
