use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::server;

#[derive(Parser)]
#[command(name = "recipes-api")]
#[command(about = "Recipes API - cooks, recipes, user accounts and favorites")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, env = "PORT", help = "Port to listen on")]
        port: Option<u16>,
    },

    #[command(about = "Create database tables and exit")]
    Migrate,
}

pub async fn run(cli: Cli, mut config: AppConfig) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;
            server::serve(config).await
        }
        Commands::Migrate => server::migrate(config).await,
    }
}
