//! strm JSON API Server

use std::process;

use salvo::{
    affix_state::inject,
    oapi::{
        OpenApi,
        security::{Http, HttpAuthScheme, SecurityScheme},
        swagger_ui::SwaggerUi,
    },
    prelude::*,
    trailing_slash::remove_slash,
};
use tracing::{error, info};

use strm_app::context::AppContext;

use crate::{config::ServerConfig, state::State};

mod auth;
mod config;
mod extensions;
mod healthcheck;
mod observability;
mod response;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;
mod users;

/// strm JSON API Server entry point
#[tokio::main]
pub async fn main() {
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    if let Err(init_error) = observability::init(&config) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialize, must use eprintln"
        )]
        {
            eprintln!("Observability error: {init_error}");
        }

        process::exit(1);
    }

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    let listener = TcpListener::new(addr).bind().await;

    let app = match AppContext::from_database_url(
        &config.database.database_url,
        config.auth.settings(),
    )
    .await
    {
        Ok(app) => app,
        Err(init_error) => {
            error!("failed to initialize app context: {init_error}");

            process::exit(1);
        }
    };

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(observability::request_logging)
        .hoop(remove_slash())
        .hoop(inject(State::from_app_context(app.clone())))
        .hoop(auth::middleware::handler)
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(observability::metrics_handler))
        .push(
            Router::with_path("user")
                .push(Router::with_path("logout").post(users::logout::handler))
                .push(Router::with_path("info").get(users::info::handler))
                .push(
                    Router::with_path("token-blacklist-status")
                        .get(users::blacklist_status::handler),
                )
                .push(
                    Router::with_path("forgot-password/reset")
                        .post(users::reset_password::handler),
                ),
        );

    let doc = OpenApi::new("strm API", env!("CARGO_PKG_VERSION"))
        .add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
        .merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("swagger"));

    let server = Server::new(listener);

    let handle = server.handle();

    let shutdown_app = app.clone();

    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle, shutdown_app).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    server.serve(router).await;

    app.shutdown();

    info!("server stopped");
}
