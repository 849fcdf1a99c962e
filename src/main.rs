use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use teamcal::storage::config::{Config, LoggingConfig};

mod cli;
use cli::{parse_cli_command, run_agenda_mode, CliCommand, USAGE};
mod sample_data;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let command = match parse_cli_command(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("Error: {}", err);
            println!("{}", USAGE);
            return Ok(());
        }
    };

    let options = match command {
        CliCommand::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        CliCommand::Agenda(options) => options,
    };

    let config = Config::load_or_create().context("failed to load configuration")?;
    let _guard = setup_logging(&config.logging);

    if let Err(e) = run_agenda_mode(config, options).await {
        tracing::error!("Agenda failed: {:#}", e);
        return Err(e);
    }
    Ok(())
}

fn setup_logging(logging: &LoggingConfig) -> WorkerGuard {
    std::fs::create_dir_all(&logging.directory).ok();

    let file_appender = tracing_appender::rolling::daily(&logging.directory, "teamcal.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .init();

    tracing::info!("teamcal started");
    guard
}
