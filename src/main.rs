use std::{fs::File, path::PathBuf, sync::Mutex};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use tracing_subscriber::EnvFilter;

use crate::{
	commands::{Context, FieldArgs, ItemsArgs, MoveArgs, SplitArgs, SubArgs, TriageArgs},
	config::AppConfig,
	github::BoxedGitHubClient,
};

mod bulk_move;
mod commands;
mod config;
mod field_setter;
mod github;
mod hierarchy;
mod items;
mod membership;
#[cfg(any(test, feature = "is_integration_test"))]
mod mock_github;
mod prompt;
mod split;
mod triage;

#[derive(Parser)]
#[command(author, version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"), about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
	/// Config file. Defaults to ./.ghpm.yml, then $XDG_CONFIG_HOME/ghpm/config.yml
	#[arg(long, global = true, env = "GHPM_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Label and place matching issues on the board
	Triage(TriageArgs),
	/// Set board fields on an issue, optionally on its sub-issue tree
	Move(MoveArgs),
	/// List, add or remove sub-issues
	Sub(SubArgs),
	/// Create sub-issues from titles or the issue's checklist
	Split(SplitArgs),
	/// List the issues on the board
	Items(ItemsArgs),
	/// Inspect board fields and configured aliases
	Field(FieldArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	init_tracing()?;

	let cli = Cli::parse();
	let config = AppConfig::load(cli.config.as_deref())?;
	let ctx = Context::new(config, connect);

	match cli.command {
		Commands::Triage(args) => commands::triage_command(&ctx, args).await,
		Commands::Move(args) => commands::move_command(&ctx, args).await,
		Commands::Sub(args) => commands::sub_command(&ctx, args).await,
		Commands::Split(args) => commands::split_command(&ctx, args).await,
		Commands::Items(args) => commands::items_command(&ctx, args).await,
		Commands::Field(args) => commands::field_command(&ctx, args).await,
	}
}

/// `GHPM_TRACE_FILE` gets every event as JSON lines, otherwise stderr filtered by `RUST_LOG`.
fn init_tracing() -> Result<()> {
	if let Ok(path) = std::env::var("GHPM_TRACE_FILE") {
		let file = File::create(&path).wrap_err_with(|| format!("Failed to create trace file {path}"))?;
		let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
		tracing_subscriber::fmt().json().with_env_filter(filter).with_writer(Mutex::new(file)).with_ansi(false).init();
		return Ok(());
	}

	let filter = EnvFilter::try_from_default_env()
		.or_else(|_| EnvFilter::try_new(option_env!("LOG_DIRECTIVES").unwrap_or("warn")))
		.unwrap_or_else(|_| EnvFilter::new("warn"));
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).init();
	Ok(())
}

#[cfg(not(feature = "is_integration_test"))]
fn connect() -> Result<BoxedGitHubClient> {
	github::create_client(&config::github_token()?)
}

#[cfg(feature = "is_integration_test")]
fn connect() -> Result<BoxedGitHubClient> {
	Ok(std::sync::Arc::new(mock_github::MockGitHubClient::from_env()?))
}
