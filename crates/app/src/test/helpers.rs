//! Test Helpers

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;

use crate::test::TestContext;

/// Issue a password reset code directly, bypassing the email flow.
pub(crate) async fn set_reset_code(
    ctx: &TestContext,
    email: &str,
    code: &str,
    expires_at: Timestamp,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET code = $2, code_expire_at = $3 WHERE email = $1")
        .bind(email)
        .bind(code)
        .bind(SqlxTimestamp::from(expires_at))
        .execute(ctx.db.pool())
        .await?;

    Ok(())
}
