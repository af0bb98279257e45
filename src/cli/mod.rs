pub mod commands;
pub mod utils;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::database::Database;

#[derive(Parser)]
#[command(name = "gamecafe")]
#[command(about = "Game café administration: accounts, roles and catalog entries")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "User accounts and roles")]
    User {
        #[command(subcommand)]
        cmd: commands::users::UserCommands,
    },

    #[command(about = "Catalog entries")]
    Game {
        #[command(subcommand)]
        cmd: commands::games::GameCommands,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// The CLI only makes sense against a persistent database
async fn connect(config: &AppConfig) -> anyhow::Result<Database> {
    if config.database.url.is_none() {
        anyhow::bail!("DATABASE_URL must be set to use the admin CLI");
    }
    Database::from_config(&config.database)
        .await
        .context("connecting to the database")
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = AppConfig::from_env();
    let db = connect(&config).await?;

    match cli.command {
        Commands::User { cmd } => commands::users::handle(cmd, &db, output_format).await,
        Commands::Game { cmd } => commands::games::handle(cmd, &db, output_format).await,
    }
}
