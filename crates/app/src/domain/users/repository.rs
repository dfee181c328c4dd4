//! Users Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as};

use crate::domain::users::{
    data::{NewUser, PasswordReset},
    records::{UserId, UserRecord},
};

const CREATE_USER_SQL: &str = include_str!("sql/create_user.sql");
const FIND_USER_BY_USERNAME_SQL: &str = include_str!("sql/find_user_by_username.sql");
const UPDATE_TOKEN_INVALID_BEFORE_SQL: &str = include_str!("sql/update_token_invalid_before.sql");
const RESET_PASSWORD_SQL: &str = include_str!("sql/reset_password.sql");

#[derive(Debug, Clone)]
/// PostgreSQL-backed users repository.
pub(crate) struct PgUsersRepository {
    pool: PgPool,
}

impl PgUsersRepository {
    /// Creates a new repository instance.
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn create_user(&self, user: NewUser) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(CREATE_USER_SQL)
            .bind(user.username)
            .bind(user.email)
            .bind(user.password)
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(FIND_USER_BY_USERNAME_SQL)
            .bind(username)
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn update_token_invalid_before(
        &self,
        user: UserId,
        at: Timestamp,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(UPDATE_TOKEN_INVALID_BEFORE_SQL)
            .bind(user)
            .bind(SqlxTimestamp::from(at))
            .fetch_one(&self.pool)
            .await
    }

    /// Returns `None` when no active user holds a live matching code.
    pub(crate) async fn reset_password(
        &self,
        reset: PasswordReset,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        query_as::<Postgres, UserRecord>(RESET_PASSWORD_SQL)
            .bind(reset.email)
            .bind(reset.code)
            .bind(reset.new_password)
            .fetch_optional(&self.pool)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for UserRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            is_active: row.try_get("is_active")?,
            failed_login_count: row.try_get("failed_login_count")?,
            locked_until: row
                .try_get::<Option<SqlxTimestamp>, _>("locked_until")?
                .map(SqlxTimestamp::to_jiff),
            token_invalid_before: row
                .try_get::<Option<SqlxTimestamp>, _>("token_invalid_before")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
