use clap::Args;
use strm_app::{
    database,
    domain::users::{PgUsersService, UsersService, data::NewUser},
};

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Login name
    #[arg(long)]
    username: String,

    /// Contact email address
    #[arg(long)]
    email: String,

    /// Initial password
    #[arg(long, env = "STRM_USER_PASSWORD", hide_env_values = true)]
    password: String,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    if args.password.is_empty() {
        return Err("password cannot be empty".to_string());
    }

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let user = PgUsersService::new(pool)
        .create_user(NewUser {
            username: args.username,
            email: args.email,
            password: args.password,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_id: {}", user.id);
    println!("username: {}", user.username);

    Ok(())
}
