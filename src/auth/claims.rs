/// JWT Claims structure
///
/// The payload embedded in every token: who authenticated, which service
/// issued the assertion, and until when it holds.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Issuer stamped into every token minted by this service
pub const TOKEN_ISSUER: &str = "blog-api";

/// Lifetime of a token. Fixed, not configurable.
pub fn token_ttl() -> Duration {
    Duration::hours(24)
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Authenticated administrator
    pub username: String,
    /// Issuer
    pub iss: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Claims for `username` issued at `now`, expiring one TTL later
    pub fn new(username: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            username: username.into(),
            iss: TOKEN_ISSUER.to_string(),
            exp: (now + token_ttl()).timestamp(),
            iat: now.timestamp(),
        }
    }

    /// A token is expired from its `exp` second onwards.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_claims_creation() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let claims = Claims::new("admin", now);

        assert_eq!(claims.username, "admin");
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let claims = Claims::new("admin", now);
        let exp = Utc.timestamp_opt(claims.exp, 0).unwrap();

        assert!(!claims.is_expired_at(exp - Duration::seconds(1)));
        assert!(claims.is_expired_at(exp));
        assert!(claims.is_expired_at(exp + Duration::seconds(1)));
    }
}
