//! Authentication failure responses.

use salvo::{http::StatusCode, prelude::*};

use strm_app::auth::AuthRejection;

use crate::response::ApiMessage;

/// Render a gate rejection as `401` with the rejection's envelope code.
pub(super) fn render_rejection(res: &mut Response, rejection: &AuthRejection) {
    let kind = rejection.kind();

    res.status_code(StatusCode::UNAUTHORIZED);
    res.render(Json(ApiMessage::new(kind.code(), kind.message())));
}
