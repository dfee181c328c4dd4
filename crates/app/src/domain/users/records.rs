//! User Records

use jiff::Timestamp;

/// User identifier as stored in the `users` table.
pub type UserId = i64;

/// User Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Unique user identifier.
    pub id: UserId,

    /// Login name, also carried in session claims.
    pub username: String,

    /// Contact email address.
    pub email: String,

    /// bcrypt hash of the current password.
    pub password_hash: String,

    /// Whether the account has been activated.
    pub is_active: bool,

    /// Consecutive failed login attempts.
    pub failed_login_count: i32,

    /// Login lockout end, when locked.
    pub locked_until: Option<Timestamp>,

    /// Sessions issued before this instant are no longer honoured.
    pub token_invalid_before: Option<Timestamp>,

    /// Account creation timestamp.
    pub created_at: Timestamp,
}
