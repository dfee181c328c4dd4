//! Authentication gate errors.

use thiserror::Error;

use crate::domain::users::UsersServiceError;

/// Why a request was refused by the authentication gate.
#[derive(Debug, Error)]
pub enum AuthRejection {
    #[error("bearer credential is missing")]
    MissingCredential,

    #[error("bearer credential is invalid")]
    InvalidCredential,

    #[error("bearer credential has expired")]
    Expired,

    #[error("bearer credential has been revoked")]
    Revoked,

    #[error("bearer credential was issued before the user's sessions were invalidated")]
    Superseded,

    #[error("credential subject does not exist")]
    UnknownUser,

    #[error("user lookup failed")]
    UpstreamLookupFailure(#[source] UsersServiceError),
}

/// Externally visible rejection category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    Missing,
    Invalid,
    Expired,
}

impl RejectionKind {
    /// Stable response code reported to clients.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Missing => 40100,
            Self::Expired => 40101,
            Self::Invalid => 40102,
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Missing => "not logged in or token missing",
            Self::Expired => "token expired, please log in again",
            Self::Invalid => "token invalid, please log in again",
        }
    }
}

impl AuthRejection {
    #[must_use]
    pub const fn kind(&self) -> RejectionKind {
        match self {
            Self::MissingCredential => RejectionKind::Missing,
            Self::Expired | Self::Revoked | Self::Superseded => RejectionKind::Expired,
            Self::InvalidCredential | Self::UnknownUser | Self::UpstreamLookupFailure(_) => {
                RejectionKind::Invalid
            }
        }
    }
}
