//! User Errors

use salvo::http::StatusError;
use tracing::error;

use strm_app::{auth::SessionRevocationError, domain::users::UsersServiceError};

pub(crate) fn reset_into_status_error(error: UsersServiceError) -> StatusError {
    match error {
        UsersServiceError::InvalidCode | UsersServiceError::NotFound => {
            StatusError::bad_request().brief("Verification code is invalid or expired")
        }
        UsersServiceError::AlreadyExists => {
            error!("unexpected conflict while resetting password");

            StatusError::internal_server_error()
        }
        UsersServiceError::Sql(source) => {
            error!("failed to reset password: {source}");

            StatusError::internal_server_error()
        }
    }
}

pub(crate) fn revocation_into_status_error(error: SessionRevocationError) -> StatusError {
    match error {
        SessionRevocationError::Watermark(source) => {
            error!("password changed but sessions could not be invalidated: {source}");

            StatusError::internal_server_error()
        }
    }
}
