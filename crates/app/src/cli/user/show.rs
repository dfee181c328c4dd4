use clap::Args;
use strm_app::{
    database,
    domain::users::{PgUsersService, UsersService},
};

#[derive(Debug, Args)]
pub(crate) struct ShowUserArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Login name
    #[arg(long)]
    username: String,
}

pub(crate) async fn run(args: ShowUserArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let user = PgUsersService::new(pool)
        .find_by_username(&args.username)
        .await
        .map_err(|error| format!("failed to look up user {}: {error}", args.username))?;

    let or_never = |at: Option<jiff::Timestamp>| at.map_or_else(|| "never".to_string(), |at| at.to_string());

    println!("user_id: {}", user.id);
    println!("username: {}", user.username);
    println!("email: {}", user.email);
    println!("active: {}", user.is_active);
    println!("failed_logins: {}", user.failed_login_count);
    println!("locked_until: {}", or_never(user.locked_until));
    println!("sessions_invalid_before: {}", or_never(user.token_invalid_before));
    println!("created_at: {}", user.created_at);

    Ok(())
}
