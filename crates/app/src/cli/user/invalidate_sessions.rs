use std::sync::Arc;

use clap::Args;
use jiff::Timestamp;
use strm_app::{
    context::{AppContext, AuthSettings},
    database,
    domain::users::{PgUsersService, UsersService},
};

#[derive(Debug, Args)]
pub(crate) struct InvalidateSessionsArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Login name whose sessions should be invalidated
    #[arg(long)]
    username: String,
}

pub(crate) async fn run(args: InvalidateSessionsArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let app = AppContext::new(Arc::new(PgUsersService::new(pool)), AuthSettings::default());

    let result = invalidate(&app, &args.username, Timestamp::now()).await;

    app.shutdown();

    let invalid_before = result?;

    println!(
        "sessions of {} issued before {invalid_before} are no longer valid",
        args.username
    );

    Ok(())
}

/// Advance the watermark of `username` to `at` through the session revoker.
async fn invalidate(app: &AppContext, username: &str, at: Timestamp) -> Result<Timestamp, String> {
    let user = app
        .users
        .find_by_username(username)
        .await
        .map_err(|error| format!("failed to look up user {username}: {error}"))?;

    app.sessions
        .invalidate_sessions(user.id, at)
        .await
        .map_err(|error| format!("failed to invalidate sessions: {error}"))
}
