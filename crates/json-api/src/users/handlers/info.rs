//! Current User Handler

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use strm_app::domain::users::records::UserId;

use crate::{extensions::*, response::ApiResponse};

/// Identity attached to the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserInfo {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
}

/// Current User Handler
#[endpoint(
    tags("user"),
    summary = "Current session identity",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Session identity"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing, invalid or expired credential"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ApiResponse<UserInfo>>, StatusError> {
    let claims = depot.session_claims_or_401()?;

    Ok(Json(ApiResponse::success(UserInfo {
        user_id: claims.user_id,
        username: claims.username.clone(),
        email: claims.email.clone(),
    })))
}

#[cfg(test)]
mod tests {
    use jiff::{Timestamp, ToSpan};
    use salvo::{
        http::header::AUTHORIZATION,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use strm_app::auth::{SESSION_TTL, SessionClaims};

    use crate::{
        response::ApiMessage,
        test_helpers::{gated_service, issue_token, test_user, users_returning},
    };

    use super::*;

    fn routes() -> Router {
        Router::with_path("user/info").get(handler)
    }

    #[tokio::test]
    async fn test_info_returns_session_identity() -> TestResult {
        let (service, state) = gated_service(users_returning(test_user(None)), routes());

        let token = issue_token(
            &state,
            &SessionClaims::for_user(&test_user(None), Timestamp::now(), SESSION_TTL),
        )?;

        let body: ApiResponse<UserInfo> = TestClient::get("http://example.com/user/info")
            .add_header(AUTHORIZATION, format!("Bearer {token}"), true)
            .send(&service)
            .await
            .take_json()
            .await?;

        assert_eq!(body.code, 200);
        assert_eq!(
            body.data,
            UserInfo {
                user_id: 7,
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_info_rejects_session_older_than_watermark() -> TestResult {
        let watermark = Timestamp::now();
        let (service, state) = gated_service(users_returning(test_user(Some(watermark))), routes());

        let token = issue_token(
            &state,
            &SessionClaims::for_user(&test_user(None), watermark - 1.hour(), SESSION_TTL),
        )?;

        let mut res = TestClient::get("http://example.com/user/info")
            .add_header(AUTHORIZATION, format!("Bearer {token}"), true)
            .send(&service)
            .await;

        let body: ApiMessage = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
        assert_eq!(body.code, 40101);

        Ok(())
    }
}
