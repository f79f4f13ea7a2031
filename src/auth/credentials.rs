/// Credential store port
///
/// The auth core only needs to look an identity up by username and, for
/// credential updates, overwrite the single administrative identity.
/// `crate::store::users::PgCredentialStore` is the production implementation.

use async_trait::async_trait;

use crate::error::AppError;

/// Persisted username + password digest of the administrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub password_hash: String,
}

#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Identity with this exact username, if any
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, AppError>;

    /// Overwrite the administrative identity's username and digest.
    ///
    /// # Errors
    /// `AppError::Internal` when no identity exists to update.
    async fn update_admin(&self, username: &str, password_hash: &str) -> Result<(), AppError>;

    /// Create the administrative identity unless one already exists.
    ///
    /// Returns `true` when a row was inserted.
    async fn create_admin_if_absent(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<bool, AppError>;
}
