// Entrypoint for the CLI application.
// - Keeps `main` small: parse arguments, load config, run one command.
// - The automatic update check runs afterwards so its notice follows the
//   command's own output.

use anyhow::Context;
use clap::{CommandFactory, Parser};
use gisph_cli::api::{ApiClient, ApiSettings};
use gisph_cli::auto_update::{run_auto_check, AUTO_CHECK_TIMEOUT};
use gisph_cli::cli::{Cli, Commands};
use gisph_cli::commands;
use gisph_cli::config::ConfigStore;
use gisph_cli::ui;
use gisph_cli::update::{GithubReleases, CURRENT_VERSION};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        ui::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "gisph=debug,gisph_cli=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let path = config_path(cli.config_file)?;
    let mut config = ConfigStore::open(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    debug!(path = %path.display(), "configuration loaded");

    let wants_notice = !matches!(command, Commands::Update(_));
    match command {
        Commands::Regions(cmd) => {
            let api = ApiClient::new(ApiSettings::resolve(&config))?;
            commands::regions::run(&api, cmd)?;
        }
        Commands::Config(cmd) => commands::config::run(&mut config, cmd)?,
        Commands::Update(args) => commands::update::run(&args)?,
    }

    if wants_notice && std::io::stdout().is_terminal() {
        auto_check(&mut config);
    }
    Ok(())
}

fn config_path(flag: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match flag {
        Some(path) => Ok(path),
        None => ConfigStore::default_path()
            .context("Could not determine the user config directory"),
    }
}

fn auto_check(config: &mut ConfigStore) {
    let source = match GithubReleases::from_env(AUTO_CHECK_TIMEOUT) {
        Ok(source) => source,
        Err(e) => {
            debug!(error = %e, "skipping automatic update check");
            return;
        }
    };
    if let Some(notice) = run_auto_check(config, &source, CURRENT_VERSION, chrono::Utc::now()) {
        ui::print_notice(&notice);
    }
}
