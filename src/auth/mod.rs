/// Authentication module
///
/// Password digests, token issuance/verification, the credential store port
/// and the login orchestration built on them.

mod authenticator;
mod claims;
mod credentials;
mod jwt;
mod password;

pub use authenticator::Authenticator;
pub use claims::{token_ttl, Claims, TOKEN_ISSUER};
pub use credentials::{CredentialStore, Identity};
pub use jwt::{TokenError, TokenIssuer, TokenVerifier};
pub use password::{PasswordHasher, DIGEST_LENGTH};
