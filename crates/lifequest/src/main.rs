// SPDX-FileCopyrightText: 2026 Lifequest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifequest - turn daily habits into an RPG.
//!
//! This is the binary entry point for the Lifequest CLI.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use lifequest_core::LifequestError;
use lifequest_engine::{Engine, SystemClock};
use lifequest_storage::Database;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{BossCommands, MissionCommands, QuestCommands, UserCommands};

/// Lifequest - turn daily habits into an RPG.
#[derive(Parser, Debug)]
#[command(name = "lifequest", version, about, long_about = None)]
struct Cli {
    /// Act as this user instead of the configured default.
    #[arg(long, global = true)]
    user: Option<String>,

    /// Render results as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    /// Load configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage users and view progression.
    #[command(subcommand)]
    User(UserCommands),
    /// Manage daily quests.
    #[command(subcommand)]
    Quest(QuestCommands),
    /// Manage one-time missions.
    #[command(subcommand)]
    Mission(MissionCommands),
    /// Manage boss challenges.
    #[command(subcommand)]
    Boss(BossCommands),
    /// Show today's headline numbers.
    Dashboard,
    /// Show the top users by XP.
    Leaderboard {
        #[arg(long, default_value = "10")]
        limit: u32,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cli.config.as_deref().map_or_else(
        config::load_config,
        config::load_config_from_path,
    ) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("lifequest: invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli, config).await {
        eprintln!("lifequest: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: config::LifequestConfig) -> Result<(), LifequestError> {
    if let Some(parent) = config.storage.path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| LifequestError::Config(format!("cannot create data directory: {e}")))?;
    }
    let db = Database::open(&config.storage.path).await?;
    let engine = Engine::new(db, Arc::new(SystemClock));

    let user = cli.user.as_deref().or(config.user.name.as_deref());
    let json = cli.json;

    let result = match cli.command {
        Commands::User(cmd) => commands::run_user(&engine, user, json, cmd).await,
        Commands::Quest(cmd) => commands::run_quest(&engine, user, json, cmd).await,
        Commands::Mission(cmd) => commands::run_mission(&engine, user, json, cmd).await,
        Commands::Boss(cmd) => commands::run_boss(&engine, user, json, cmd).await,
        Commands::Dashboard => commands::run_dashboard(&engine, user, json).await,
        Commands::Leaderboard { limit } => commands::run_leaderboard(&engine, json, limit).await,
    };

    engine.database().close().await?;
    result
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        super::Cli::command().debug_assert();
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = super::config::LifequestConfig::default();
        assert_eq!(config.log.level, "info");
    }
}
