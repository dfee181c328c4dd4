//! Logout Handler

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::info;

use strm_app::auth::{LogoutOutcome, bearer_token};

use crate::{extensions::*, response::ApiMessage, state::State};

/// Logout Handler
///
/// Revokes the presented credential until its natural expiry.
#[endpoint(
    tags("user"),
    summary = "Log out",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Credential revoked"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing, invalid or expired credential"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<ApiMessage>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let claims = depot.session_claims_or_401()?;

    let raw = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(StatusError::unauthorized)?;

    if let LogoutOutcome::Revoked { expires_at, .. } = state.app.sessions.logout(raw) {
        info!(user_id = claims.user_id, %expires_at, "user logged out");
    }

    Ok(Json(ApiMessage::success("logged out")))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use strm_app::auth::{SESSION_TTL, SessionClaims};

    use crate::test_helpers::{gated_service, issue_token, test_user, users_returning};

    use super::*;

    fn routes() -> Router {
        Router::with_path("user/logout").post(handler)
    }

    #[tokio::test]
    async fn test_logout_revokes_token_and_second_use_is_expired() -> TestResult {
        let (service, state) = gated_service(users_returning(test_user(None)), routes());

        let token = issue_token(
            &state,
            &SessionClaims::for_user(&test_user(None), Timestamp::now(), SESSION_TTL),
        )?;

        let mut res = TestClient::post("http://example.com/user/logout")
            .add_header(AUTHORIZATION, format!("Bearer {token}"), true)
            .send(&service)
            .await;

        let body: ApiMessage = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body, ApiMessage::success("logged out"));
        assert_eq!(state.app.sessions.blacklist_size(), 1);

        let mut again = TestClient::post("http://example.com/user/logout")
            .add_header(AUTHORIZATION, format!("Bearer {token}"), true)
            .send(&service)
            .await;

        let body: ApiMessage = again.take_json().await?;

        assert_eq!(again.status_code, Some(StatusCode::UNAUTHORIZED));
        assert_eq!(body.code, 40101);
        assert_eq!(state.app.sessions.blacklist_size(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_logout_without_token_is_rejected_by_gate() -> TestResult {
        let (service, state) = gated_service(users_returning(test_user(None)), routes());

        let res = TestClient::post("http://example.com/user/logout")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
        assert_eq!(state.app.sessions.blacklist_size(), 0);

        Ok(())
    }
}
