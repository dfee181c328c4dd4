//! HS256 session credential signing and verification.

use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use zeroize::Zeroize;

use crate::auth::claims::SessionClaims;

/// Secret used when none is configured.
pub const DEFAULT_SIGNING_SECRET: &str = "secret";

/// HMAC key shared by credential issuance and verification.
#[derive(Clone)]
pub struct SigningSecret {
    bytes: Vec<u8>,
}

impl SigningSecret {
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Resolve the configured secret, falling back to [`DEFAULT_SIGNING_SECRET`] when it is
    /// unset or empty.
    #[must_use]
    pub fn from_config(configured: Option<&str>) -> Self {
        match configured {
            Some(secret) if !secret.is_empty() => Self::new(secret),
            _ => Self::new(DEFAULT_SIGNING_SECRET),
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(**redacted**)")
    }
}

impl Drop for SigningSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("credential is malformed or its signature does not verify")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error("credential could not be signed")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Issues and verifies session credentials with a single [`SigningSecret`].
///
/// Decoding checks the signature and claim shape only. Natural expiry is judged by the
/// caller against its own clock so every check in a request sees the same instant.
#[derive(Clone)]
pub struct SessionTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl SessionTokens {
    #[must_use]
    pub fn new(secret: &SigningSecret) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign `claims` into a compact credential.
    ///
    /// # Errors
    ///
    /// Returns an error when the claims cannot be serialised or signed.
    pub fn issue(&self, claims: &SessionClaims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding).map_err(TokenError::Signing)
    }

    /// Verify the signature of `raw` and decode its claims, expired or not.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Invalid`] when the credential is malformed, signed with another
    /// key or algorithm, or lacks any of `user_id`, `username`, `iat` or `exp`.
    pub fn decode(&self, raw: &str) -> Result<SessionClaims, TokenError> {
        decode::<SessionClaims>(raw, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }
}

impl fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokens")
            .field("algorithm", &Algorithm::HS256)
            .finish_non_exhaustive()
    }
}
