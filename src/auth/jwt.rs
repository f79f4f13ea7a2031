/// JWT Token Issuance and Verification
///
/// Tokens are HS256-signed JWTs carrying `Claims`. Nothing is stored server
/// side: a token is valid exactly while its signature checks out and its
/// `exp` lies in the future.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::{Claims, TOKEN_ISSUER};
use crate::error::{AppError, AuthError};

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Why a presented token was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token is malformed: {0}")]
    Malformed(String),

    #[error("token signature does not match")]
    BadSignature,

    #[error("token has expired")]
    Expired,
}

impl TokenError {
    /// Outcome reported to the caller
    pub fn to_auth_error(&self) -> AuthError {
        match self {
            TokenError::Malformed(_) | TokenError::BadSignature => AuthError::TokenInvalid,
            TokenError::Expired => AuthError::TokenExpired,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::BadSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidIssuer => TokenError::Malformed("unexpected issuer".to_string()),
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::Auth(err.to_auth_error())
    }
}

/// Mints tokens for authenticated administrators
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
}

impl TokenIssuer {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
        }
    }

    /// Issue a token for `username`, valid for 24 hours from now
    pub fn issue(&self, username: &str) -> Result<String, AppError> {
        self.issue_at(username, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    ///
    /// # Errors
    /// Signing failures come back as `AppError::Internal`; the cause is
    /// only kept for the logs.
    pub fn issue_at(&self, username: &str, now: DateTime<Utc>) -> Result<String, AppError> {
        let claims = Claims::new(username, now);

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }
}

/// Checks signature, issuer and expiry of presented tokens
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        // Expiry is checked in `verify_at` against an explicit clock, with no leeway.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify `token` as if the current time were `now`.
    ///
    /// Expiry is only looked at once the signature is accepted, so a forged
    /// token never reports `Expired`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::from)?;

        if claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const SECRET: &str = "test-secret-key-at-least-32-characters-long";

    fn pair() -> (TokenIssuer, TokenVerifier) {
        (TokenIssuer::new(SECRET), TokenVerifier::new(SECRET))
    }

    #[test]
    fn test_issue_and_verify_token() {
        let (issuer, verifier) = pair();

        let token = issuer.issue("admin").expect("Failed to issue token");
        let claims = verifier.verify(&token).expect("Failed to verify token");

        assert_eq!(claims.username, "admin");
        assert_eq!(claims.iss, TOKEN_ISSUER);
    }

    #[test]
    fn test_token_is_compact_jwt() {
        let (issuer, _) = pair();
        let token = issuer.issue("admin").unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let (_, verifier) = pair();

        for token in ["", "invalid.token.here", "not-a-jwt", "a.b"] {
            let result = verifier.verify(token);
            assert!(
                matches!(result, Err(TokenError::Malformed(_))),
                "expected malformed for {:?}, got {:?}",
                token,
                result
            );
        }
    }

    #[test]
    fn test_wrong_secret_is_bad_signature() {
        let issuer = TokenIssuer::new(SECRET);
        let verifier = TokenVerifier::new("another-secret-key-at-least-32-characters");

        let token = issuer.issue("admin").unwrap();
        assert_eq!(verifier.verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_tampering_any_byte_is_rejected() {
        let (issuer, verifier) = pair();
        let token = issuer.issue("admin").unwrap();

        for (i, c) in token.char_indices() {
            let replacement = if c == 'A' { 'B' } else { 'A' };
            let mut tampered = token.clone();
            tampered.replace_range(i..i + 1, &replacement.to_string());

            let err = verifier
                .verify(&tampered)
                .expect_err(&format!("tampered byte {} was accepted", i));
            assert_eq!(err.to_auth_error(), AuthError::TokenInvalid, "byte {}", i);
        }
    }

    #[test]
    fn test_appended_byte_is_rejected() {
        let (issuer, verifier) = pair();
        let token = issuer.issue("admin").unwrap();

        let tampered = format!("{}X", token);
        assert!(verifier.verify(&tampered).is_err());
    }

    #[test]
    fn test_expired_one_second_ago() {
        let (issuer, verifier) = pair();
        let issued_at = Utc::now() - Duration::hours(24) - Duration::seconds(1);

        let token = issuer.issue_at("admin", issued_at).unwrap();
        assert_eq!(verifier.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_expiry_boundary_is_expired() {
        let (issuer, verifier) = pair();
        let issued_at = Utc::now();
        let token = issuer.issue_at("admin", issued_at).unwrap();
        let exp = issued_at + Duration::hours(24);

        assert!(verifier.verify_at(&token, exp - Duration::seconds(1)).is_ok());
        assert_eq!(verifier.verify_at(&token, exp), Err(TokenError::Expired));
        assert_eq!(
            verifier.verify_at(&token, exp + Duration::seconds(1)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_forged_expired_token_reports_signature() {
        let issuer = TokenIssuer::new("another-secret-key-at-least-32-characters");
        let verifier = TokenVerifier::new(SECRET);
        let token = issuer
            .issue_at("admin", Utc::now() - Duration::days(3))
            .unwrap();

        assert_eq!(verifier.verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_foreign_issuer_is_malformed() {
        let claims = serde_json::json!({
            "username": "admin",
            "iss": "someone-else",
            "exp": (Utc::now() + Duration::hours(1)).timestamp(),
            "iat": Utc::now().timestamp(),
        });
        let token = encode(
            &Header::new(ALGORITHM),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let (_, verifier) = pair();
        assert!(matches!(verifier.verify(&token), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_error_mapping() {
        assert_eq!(TokenError::BadSignature.to_auth_error(), AuthError::TokenInvalid);
        assert_eq!(
            TokenError::Malformed("x".to_string()).to_auth_error(),
            AuthError::TokenInvalid
        );
        assert_eq!(TokenError::Expired.to_auth_error(), AuthError::TokenExpired);
    }
}
