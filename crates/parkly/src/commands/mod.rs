//! Command dispatch: bridges CLI args -> `Parkly` operations -> output formatting.

pub mod auth;
pub mod cars;
pub mod config_cmd;
pub mod parking;
pub mod util;

use parkly_core::Parkly;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a service-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &Parkly,
    profile: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(client, args, global).await,
        Command::Logout => auth::logout(client, global).await,
        Command::Register(args) => auth::register(client, args, global).await,
        Command::Whoami(args) => auth::whoami(client, args, profile, global).await,
        Command::Cars(args) => cars::handle(client, args, profile, global).await,
        Command::Parking(args) => parking::handle(client, args, global).await,
        // Handled before a client is built
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
