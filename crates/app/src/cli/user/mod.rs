use clap::{Args, Subcommand};

mod create;
mod invalidate_sessions;
mod show;

#[derive(Debug, Args)]
pub(crate) struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Debug, Subcommand)]
enum UserSubcommand {
    Create(create::CreateUserArgs),
    Show(show::ShowUserArgs),
    InvalidateSessions(invalidate_sessions::InvalidateSessionsArgs),
}

pub(crate) async fn run(command: UserCommand) -> Result<(), String> {
    match command.command {
        UserSubcommand::Create(args) => create::run(args).await,
        UserSubcommand::Show(args) => show::run(args).await,
        UserSubcommand::InvalidateSessions(args) => invalidate_sessions::run(args).await,
    }
}
