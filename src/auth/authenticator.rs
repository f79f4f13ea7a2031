/// Login orchestration
///
/// Ties the credential store, the password hasher and the token issuer
/// together: login, password re-check and credential update.

use std::sync::Arc;

use crate::auth::credentials::{CredentialStore, Identity};
use crate::auth::jwt::TokenIssuer;
use crate::auth::password::PasswordHasher;
use crate::error::{AppError, AuthError};
use crate::validators::{validate_new_password, validate_username};

pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    issuer: TokenIssuer,
}

impl Authenticator {
    pub fn new(store: Arc<dyn CredentialStore>, hasher: PasswordHasher, issuer: TokenIssuer) -> Self {
        Self {
            store,
            hasher,
            issuer,
        }
    }

    /// Verify credentials and mint a token.
    ///
    /// # Errors
    /// * `UserNotFound` - no identity with this username
    /// * `BadCredentials` - password digest mismatch
    /// * `Internal` - token signing failed
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        let identity = self.authenticate(username, password).await?;
        self.issuer.issue(&identity.username)
    }

    /// Same checks as `login`, without issuing a token
    pub async fn check_password(&self, username: &str, password: &str) -> Result<(), AppError> {
        self.authenticate(username, password).await.map(|_| ())
    }

    /// Replace the administrator's username and password.
    ///
    /// The current password is not asked for; holding a valid token is
    /// enough to call this.
    pub async fn update_credentials(&self, username: &str, password: &str) -> Result<(), AppError> {
        let username = validate_username(username)?;
        validate_new_password(password)?;

        let password_hash = self.hasher.hash(password);
        self.store.update_admin(&username, &password_hash).await?;

        tracing::info!(username = %username, "Administrator credentials updated");
        Ok(())
    }

    /// Create the administrator on an empty store
    pub async fn provision_admin(&self, username: &str, password: &str) -> Result<bool, AppError> {
        let username = validate_username(username)?;
        validate_new_password(password)?;

        let created = self
            .store
            .create_admin_if_absent(&username, &self.hasher.hash(password))
            .await?;
        if created {
            tracing::info!(username = %username, "Administrator provisioned");
        }
        Ok(created)
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<Identity, AppError> {
        let identity = self
            .store
            .find_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !self.hasher.verify(password, &identity.password_hash) {
            return Err(AuthError::BadCredentials.into());
        }

        Ok(identity)
    }
}
