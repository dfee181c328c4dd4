//! Session revocation triggered by logout and password reset.

use std::sync::Arc;

use jiff::Timestamp;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    auth::{
        claims::SessionClaims, fingerprint::TokenFingerprint, registry::RevocationRegistry,
        tokens::SessionTokens,
    },
    domain::users::{UsersService, UsersServiceError, records::UserId},
};

#[derive(Debug, Error)]
pub enum SessionRevocationError {
    #[error("failed to advance session invalidation watermark")]
    Watermark(#[source] UsersServiceError),
}

/// Result of revoking a single presented credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// The credential is now rejected until its natural expiry.
    Revoked {
        fingerprint: TokenFingerprint,
        expires_at: Timestamp,
    },

    /// The credential could not be decoded, so there was nothing to revoke.
    NothingToRevoke,
}

/// Result of invalidating a user's sessions after a password reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordResetRevocation {
    /// Outcome for the credential presented with the reset, if any.
    pub presented: Option<LogoutOutcome>,

    /// New watermark; sessions issued before it are rejected.
    pub invalid_before: Timestamp,
}

#[derive(Clone)]
pub struct SessionRevoker {
    registry: Arc<RevocationRegistry>,
    tokens: SessionTokens,
    users: Arc<dyn UsersService>,
}

impl SessionRevoker {
    #[must_use]
    pub fn new(
        registry: Arc<RevocationRegistry>,
        tokens: SessionTokens,
        users: Arc<dyn UsersService>,
    ) -> Self {
        Self {
            registry,
            tokens,
            users,
        }
    }

    /// Revoke `raw` until its own expiry. Undecodable credentials are ignored.
    pub fn logout(&self, raw: &str) -> LogoutOutcome {
        match self.tokens.decode(raw) {
            Ok(claims) => self.revoke_until_expiry(raw, &claims),
            Err(source) => {
                warn!("logout with undecodable credential: {source}");

                LogoutOutcome::NothingToRevoke
            }
        }
    }

    /// Revoke the credential presented with a password reset, if any, and reject every
    /// session of `user` issued before now.
    ///
    /// The presented credential is only revoked when it belongs to `user`.
    ///
    /// # Errors
    ///
    /// Returns an error when the watermark cannot be persisted.
    pub async fn password_reset_revoke(
        &self,
        user: UserId,
        raw: Option<&str>,
    ) -> Result<PasswordResetRevocation, SessionRevocationError> {
        let presented = raw.map(|raw| self.logout_owned_by(user, raw));

        let invalid_before = self.invalidate_sessions(user, Timestamp::now()).await?;

        Ok(PasswordResetRevocation {
            presented,
            invalid_before,
        })
    }

    /// Reject every session of `user` issued before `at`, returning the watermark as stored.
    ///
    /// # Errors
    ///
    /// Returns an error when the watermark cannot be persisted.
    pub async fn invalidate_sessions(
        &self,
        user: UserId,
        at: Timestamp,
    ) -> Result<Timestamp, SessionRevocationError> {
        let record = self
            .users
            .update_token_invalid_before(user, at)
            .await
            .map_err(SessionRevocationError::Watermark)?;

        let invalid_before = record.token_invalid_before.unwrap_or(at);

        info!(user_id = user, %invalid_before, "user sessions invalidated");

        Ok(invalid_before)
    }

    /// Number of credentials currently held in the revocation registry.
    #[must_use]
    pub fn blacklist_size(&self) -> usize {
        self.registry.len()
    }

    fn logout_owned_by(&self, user: UserId, raw: &str) -> LogoutOutcome {
        match self.tokens.decode(raw) {
            Ok(claims) if claims.user_id == user => self.revoke_until_expiry(raw, &claims),
            Ok(claims) => {
                warn!(
                    user_id = user,
                    presented_user_id = claims.user_id,
                    "credential presented with password reset belongs to another user"
                );

                LogoutOutcome::NothingToRevoke
            }
            Err(source) => {
                warn!("password reset with undecodable credential: {source}");

                LogoutOutcome::NothingToRevoke
            }
        }
    }

    fn revoke_until_expiry(&self, raw: &str, claims: &SessionClaims) -> LogoutOutcome {
        let expires_at = match claims.expires_at() {
            Ok(expires_at) => expires_at,
            Err(source) => {
                warn!("logout with out-of-range expiry: {source}");

                return LogoutOutcome::NothingToRevoke;
            }
        };

        let fingerprint = self.registry.revoke(raw, expires_at);

        info!(fingerprint = %fingerprint.short(), %expires_at, "session logged out");

        LogoutOutcome::Revoked {
            fingerprint,
            expires_at,
        }
    }
}

impl std::fmt::Debug for SessionRevoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRevoker")
            .field("revoked", &self.registry.len())
            .finish_non_exhaustive()
    }
}
