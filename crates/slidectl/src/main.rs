mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use slide_core::{Controller, DEFAULT_SCAN_INTERVAL, IntegrationConfig};

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let mut cli = Cli::parse();

    init_tracing(cli.global.verbose);
    config::apply_defaults(&mut cli.global);

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
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a controller
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "slidectl", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let integration = build_integration_config(&cmd, &cli.global)?;
            let controller = Controller::new(integration);
            controller.connect().await?;

            tracing::debug!(command = ?cmd, "dispatching command");
            let result = commands::dispatch(cmd, &controller, &cli.global).await;
            controller.disconnect().await;
            result
        }
    }
}

/// Runtime config for `cmd`: one-off commands skip background polling,
/// `watch` always polls.
fn build_integration_config(
    cmd: &Command,
    global: &cli::GlobalOpts,
) -> Result<IntegrationConfig, CliError> {
    let mut integration = config::integration_config(global)?;

    integration.scan_interval = match cmd {
        Command::Watch(args) => match args.interval {
            Some(ref raw) => config::parse_interval("interval", raw)?,
            None if integration.scan_interval.is_zero() => {
                tracing::warn!(
                    "scan_interval is 0, watching every {}s",
                    DEFAULT_SCAN_INTERVAL.as_secs()
                );
                DEFAULT_SCAN_INTERVAL
            }
            None => integration.scan_interval,
        },
        _ => Duration::ZERO,
    };
    Ok(integration)
}
