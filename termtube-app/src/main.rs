use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use termtube_common::observability::{LogFormat, init_logging};
use termtube_config::{DEFAULT_CONFIG_FILE, TermtubeConfig, TermtubeConfigLoader};
mod cli;
mod commands;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Env wins over the file.
    let loader = match &cli.config {
        Some(path) => TermtubeConfigLoader::new().with_file(path),
        None => TermtubeConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    };
    let cfg: TermtubeConfig = loader.load().context("loading configuration")?;
    cfg.validate()?;

    // The UI owns the terminal, so only the one-shot commands echo to stderr.
    let interactive = *cli.command() == Command::Tui;
    let mut log_cfg = cfg.log.to_log_config(!interactive);
    if cli.json_logs {
        log_cfg.format = LogFormat::Json;
    }
    let log_file = init_logging(log_cfg)?;
    tracing::debug!(log_file = %log_file.display(), "termtube.start");

    let opts = commands::extractor_options(&cfg);
    match cli.command() {
        Command::Tui => commands::tui(&cfg, &opts).await,
        Command::Search { query, limit, json } => {
            commands::search(&opts, query, *limit, *json).await
        }
        Command::Playback { url } => commands::playback(&opts, url).await,
        Command::Play { target } => commands::play(&cfg, &opts, target),
    }
}
