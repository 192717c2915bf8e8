mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tokio::sync::broadcast::{Receiver, error::TryRecvError};
use tracing_subscriber::EnvFilter;

use parkly_core::{Navigation, Parkly};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a service connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "parkly", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let client_config = config::build_client_config(&cli.global)?;
            let profile = config::active_profile(&cli.global).0;
            let client = Parkly::new(client_config)?;
            let mut navigation = client.subscribe_navigation();

            tracing::debug!(command = ?cmd, profile = %profile, "dispatching command");
            let result = commands::dispatch(cmd, &client, &profile, &cli.global).await;
            report_navigation(&mut navigation, &cli.global);
            result
        }
    }
}

/// Tell the user when the command ended their session.
fn report_navigation(rx: &mut Receiver<Navigation>, global: &GlobalOpts) {
    loop {
        match rx.try_recv() {
            Ok(Navigation::EntryPoint { reason }) => {
                let color = output::should_color(&global.color);
                output::print_status(
                    &output::notice(
                        &format!("Session ended ({reason}); run `parkly login` to sign in again"),
                        color,
                    ),
                    global.quiet,
                );
            }
            Err(TryRecvError::Lagged(_)) => {}
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
}
