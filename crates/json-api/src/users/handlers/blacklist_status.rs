//! Revocation Registry Status Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, response::ApiResponse, state::State};

/// Revocation registry snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BlacklistStatus {
    /// Revoked credentials currently tracked.
    pub blacklist_size: usize,

    /// Snapshot time, seconds since the Unix epoch.
    pub timestamp: i64,
}

/// Revocation Registry Status Handler
#[endpoint(
    tags("user"),
    summary = "Revoked credential count",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Registry snapshot"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing, invalid or expired credential"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<ApiResponse<BlacklistStatus>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    Ok(Json(ApiResponse::success(BlacklistStatus {
        blacklist_size: state.app.sessions.blacklist_size(),
        timestamp: Timestamp::now().as_second(),
    })))
}
