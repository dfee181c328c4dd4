//! Reset Password Handler

use std::sync::Arc;

use salvo::{
    http::header::AUTHORIZATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use strm_app::{auth::bearer_token, domain::users::data::PasswordReset};

use crate::{
    extensions::*,
    response::ApiMessage,
    state::State,
    users::{
        errors::{reset_into_status_error, revocation_into_status_error},
        validation::{is_strong_password, is_valid_email},
    },
};

const CODE_LENGTH: usize = 6;

/// Reset Password Request
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl std::fmt::Debug for ResetPasswordRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetPasswordRequest")
            .field("email", &self.email)
            .field("code", &self.code)
            .finish_non_exhaustive()
    }
}

impl ResetPasswordRequest {
    fn validate(&self) -> Result<(), StatusError> {
        if !is_valid_email(&self.email) {
            return Err(StatusError::bad_request().brief("Invalid email address"));
        }

        if !is_strong_password(&self.new_password) {
            return Err(StatusError::bad_request().brief(
                "Password must be at least 8 characters with upper case, lower case and a digit",
            ));
        }

        if self.new_password != self.confirm_password {
            return Err(StatusError::bad_request().brief("Passwords do not match"));
        }

        if self.code.chars().count() != CODE_LENGTH {
            return Err(StatusError::bad_request().brief("Verification code must be 6 characters"));
        }

        Ok(())
    }
}

impl From<ResetPasswordRequest> for PasswordReset {
    fn from(request: ResetPasswordRequest) -> Self {
        PasswordReset {
            email: request.email,
            code: request.code,
            new_password: request.new_password,
        }
    }
}

/// Reset Password Handler
///
/// Replaces the password of the account owning a live emailed code and invalidates every
/// session the account issued before the reset.
#[endpoint(
    tags("user"),
    summary = "Reset forgotten password",
    responses(
        (status_code = StatusCode::OK, description = "Password reset"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid request or verification code"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ResetPasswordRequest>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<ApiMessage>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    request.validate()?;

    let user = state
        .app
        .users
        .reset_password(request.into())
        .await
        .map_err(reset_into_status_error)?;

    let presented = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token);

    let revocation = state
        .app
        .sessions
        .password_reset_revoke(user.id, presented)
        .await
        .map_err(revocation_into_status_error)?;

    info!(
        user_id = user.id,
        invalid_before = %revocation.invalid_before,
        "password reset"
    );

    Ok(Json(ApiMessage::success("password reset, please log in again")))
}
