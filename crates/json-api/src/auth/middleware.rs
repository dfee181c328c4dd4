//! Auth middleware.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::error;

use strm_app::auth::Admission;

use crate::{auth::errors::render_rejection, extensions::*, state::State};

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let state = match depot.obtain::<Arc<State>>() {
        Ok(state) => Arc::clone(state),
        Err(_error) => {
            error!("application state missing from depot");

            res.render(StatusError::internal_server_error());
            ctrl.skip_rest();

            return;
        }
    };

    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match state.app.gate.authorize(req.uri().path(), authorization).await {
        Ok(Admission::Bypassed) => {}
        Ok(Admission::Authenticated(claims)) => depot.insert_session_claims(claims),
        Err(rejection) => {
            render_rejection(res, &rejection);
            ctrl.skip_rest();

            return;
        }
    }

    ctrl.call_next(req, depot, res).await;
}
