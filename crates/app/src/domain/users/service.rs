//! Users service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::PgPool;

use crate::domain::users::{
    data::{NewUser, PasswordReset},
    errors::UsersServiceError,
    records::{UserId, UserRecord},
    repository::PgUsersRepository,
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    repository: PgUsersRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgUsersRepository::new(pool),
        }
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError> {
        self.repository.create_user(user).await.map_err(Into::into)
    }

    async fn find_by_username(&self, username: &str) -> Result<UserRecord, UsersServiceError> {
        self.repository
            .find_user_by_username(username)
            .await
            .map_err(Into::into)
    }

    async fn update_token_invalid_before(
        &self,
        user: UserId,
        at: Timestamp,
    ) -> Result<UserRecord, UsersServiceError> {
        self.repository
            .update_token_invalid_before(user, at)
            .await
            .map_err(Into::into)
    }

    async fn reset_password(&self, reset: PasswordReset) -> Result<UserRecord, UsersServiceError> {
        self.repository
            .reset_password(reset)
            .await?
            .ok_or(UsersServiceError::InvalidCode)
    }
}

#[automock]
#[async_trait]
/// User persistence operations.
pub trait UsersService: Send + Sync {
    /// Creates an active user with a hashed password.
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError>;

    /// Looks up a user by login name.
    async fn find_by_username(&self, username: &str) -> Result<UserRecord, UsersServiceError>;

    /// Moves the user's session invalidation watermark to `at`.
    async fn update_token_invalid_before(
        &self,
        user: UserId,
        at: Timestamp,
    ) -> Result<UserRecord, UsersServiceError>;

    /// Replaces the password of the user holding a live reset code, consuming the code.
    async fn reset_password(&self, reset: PasswordReset) -> Result<UserRecord, UsersServiceError>;
}
