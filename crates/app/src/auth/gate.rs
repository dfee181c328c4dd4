//! Per-request authentication decision.

use std::sync::Arc;

use jiff::Timestamp;
use tracing::{error, info};

use crate::{
    auth::{
        bypass::BypassRules, claims::SessionClaims, errors::AuthRejection,
        fingerprint::TokenFingerprint, registry::RevocationRegistry, tokens::SessionTokens,
    },
    domain::users::{UsersService, UsersServiceError},
};

/// Outcome of a request that passed the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Path is public; no identity attached.
    Bypassed,

    /// Credential verified; decoded identity attached.
    Authenticated(SessionClaims),
}

/// Decides whether each request carries a currently valid session credential.
///
/// Checks run in a fixed order and stop at the first failure: bypass, presence,
/// revocation, signature, natural expiry, then the subject's invalidation watermark.
#[derive(Clone)]
pub struct AuthGate {
    bypass: BypassRules,
    registry: Arc<RevocationRegistry>,
    tokens: SessionTokens,
    users: Arc<dyn UsersService>,
}

impl AuthGate {
    #[must_use]
    pub fn new(
        bypass: BypassRules,
        registry: Arc<RevocationRegistry>,
        tokens: SessionTokens,
        users: Arc<dyn UsersService>,
    ) -> Self {
        Self {
            bypass,
            registry,
            tokens,
            users,
        }
    }

    /// Judge a request for `path` carrying the given `Authorization` header value.
    ///
    /// # Errors
    ///
    /// Returns the first check that refused the request.
    pub async fn authorize(
        &self,
        path: &str,
        authorization: Option<&str>,
    ) -> Result<Admission, AuthRejection> {
        self.authorize_at(path, authorization, Timestamp::now()).await
    }

    /// [`authorize`](Self::authorize) with an explicit clock.
    ///
    /// # Errors
    ///
    /// Returns the first check that refused the request.
    pub async fn authorize_at(
        &self,
        path: &str,
        authorization: Option<&str>,
        now: Timestamp,
    ) -> Result<Admission, AuthRejection> {
        if self.bypass.matches(path) {
            return Ok(Admission::Bypassed);
        }

        let result = self.authenticate(authorization, now).await;

        if let Err(rejection) = &result {
            info!(path, reason = %rejection, "request rejected");
        }

        result.map(Admission::Authenticated)
    }

    async fn authenticate(
        &self,
        authorization: Option<&str>,
        now: Timestamp,
    ) -> Result<SessionClaims, AuthRejection> {
        let raw = authorization
            .and_then(bearer_token)
            .ok_or(AuthRejection::MissingCredential)?;

        if self.registry.is_revoked_at(raw, now) {
            info!(
                fingerprint = %TokenFingerprint::of(raw).short(),
                "revoked credential presented"
            );

            return Err(AuthRejection::Revoked);
        }

        let claims = self
            .tokens
            .decode(raw)
            .map_err(|_invalid| AuthRejection::InvalidCredential)?;

        if claims.is_expired_at(now) {
            return Err(AuthRejection::Expired);
        }

        let user = match self.users.find_by_username(&claims.username).await {
            Ok(user) => user,
            Err(UsersServiceError::NotFound) => return Err(AuthRejection::UnknownUser),
            Err(source) => {
                error!(username = %claims.username, "failed to look up credential subject: {source}");

                return Err(AuthRejection::UpstreamLookupFailure(source));
            }
        };

        if let Some(watermark) = user.token_invalid_before
            && claims.predates(watermark)
        {
            return Err(AuthRejection::Superseded);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("bypass", &self.bypass)
            .field("revoked", &self.registry.len())
            .finish_non_exhaustive()
    }
}

/// Extract the credential from a `Bearer <token>` header value. The scheme is
/// case-insensitive; an empty token counts as absent.
#[must_use]
pub fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}
