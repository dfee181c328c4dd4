//! Session claims carried by bearer credentials.

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

use crate::domain::users::records::{UserId, UserRecord};

/// Lifetime of a freshly issued session credential.
pub const SESSION_TTL: SignedDuration = SignedDuration::from_hours(31 * 24);

/// Identity and validity window decoded from a session credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject user identifier.
    pub user_id: UserId,

    /// Subject login name, used for the watermark lookup.
    pub username: String,

    /// Subject email, absent on some older credentials.
    #[serde(default)]
    pub email: String,

    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,

    /// Natural expiry, seconds since the Unix epoch.
    pub exp: i64,
}

impl SessionClaims {
    /// Claims for a session of `user` starting at `issued_at`.
    #[must_use]
    pub fn for_user(user: &UserRecord, issued_at: Timestamp, ttl: SignedDuration) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            iat: issued_at.as_second(),
            exp: issued_at.as_second() + ttl.as_secs(),
        }
    }

    /// Natural expiry as a timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error when `exp` lies outside the supported timestamp range.
    pub fn expires_at(&self) -> Result<Timestamp, jiff::Error> {
        Timestamp::from_second(self.exp)
    }

    /// Whether the credential has reached its natural expiry at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now.as_second() >= self.exp
    }

    /// Whether the credential was issued before `watermark`, at whole-second granularity.
    #[must_use]
    pub fn predates(&self, watermark: Timestamp) -> bool {
        self.iat < watermark.as_second()
    }
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use testresult::TestResult;

    use super::*;

    fn claims(iat: i64, exp: i64) -> SessionClaims {
        SessionClaims {
            user_id: 7,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            iat,
            exp,
        }
    }

    #[test]
    fn for_user_spans_thirty_one_days() -> TestResult {
        let user = UserRecord {
            id: 7,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: String::new(),
            is_active: true,
            failed_login_count: 0,
            locked_until: None,
            token_invalid_before: None,
            created_at: Timestamp::UNIX_EPOCH,
        };

        let issued_at = Timestamp::from_second(1_700_000_000)?;
        let claims = SessionClaims::for_user(&user, issued_at, SESSION_TTL);

        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.expires_at()?, issued_at + 744.hours());

        Ok(())
    }

    #[test]
    fn expiry_boundary_is_inclusive() -> TestResult {
        let claims = claims(100, 200);

        assert!(!claims.is_expired_at(Timestamp::from_second(199)?));
        assert!(claims.is_expired_at(Timestamp::from_second(200)?));
        assert!(claims.is_expired_at(Timestamp::from_second(201)?));

        Ok(())
    }

    #[test]
    fn predates_compares_whole_seconds() -> TestResult {
        let claims = claims(100, 200);

        assert!(claims.predates(Timestamp::from_second(101)?));
        assert!(!claims.predates(Timestamp::from_second(100)?));
        assert!(!claims.predates(Timestamp::new(100, 999_000_000)?));
        assert!(!claims.predates(Timestamp::from_second(99)?));

        Ok(())
    }

    #[test]
    fn email_defaults_when_absent() -> TestResult {
        let claims: SessionClaims =
            serde_json::from_str(r#"{"user_id":1,"username":"bob","iat":5,"exp":10}"#)?;

        assert_eq!(claims.email, "");
        assert_eq!(claims.iat, 5);

        Ok(())
    }

    #[test]
    fn issued_at_is_required() {
        let result = serde_json::from_str::<SessionClaims>(
            r#"{"user_id":1,"username":"bob","email":"bob@example.com","exp":10}"#,
        );

        assert!(result.is_err(), "claims without iat should not parse");
    }
}
