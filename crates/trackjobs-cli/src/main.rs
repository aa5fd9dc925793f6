use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod render;

use cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // --debug wins over RUST_LOG; otherwise RUST_LOG, otherwise warnings only.
    let filter = if cli.debug {
        EnvFilter::new("trackjobs=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "trackjobs=warn".into())
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // load config: --config > TRACKJOBS_CONFIG env > ~/.trackjobs/trackjobs.toml
    let config_path = cli
        .config
        .clone()
        .or_else(|| std::env::var("TRACKJOBS_CONFIG").ok());
    let config = trackjobs_core::TrackJobsConfig::load(config_path.as_deref())
        .context("loading configuration")?;
    tracing::debug!(db = %config.database.path, "configuration loaded");

    let app = commands::App::new(config, cli.db, cli.json);
    let command = cli.command.unwrap_or(Command::ShowUnchecked);
    app.execute(command, &mut std::io::stdout().lock())
}
