//! ShopScope CLI — the main entry point.
//!
//! Commands:
//! - `serve`  — Start the HTTP gateway
//! - `ask`    — Query the agent from the terminal (one-shot or interactive)
//! - `setup`  — Create the database schema
//! - `seed`   — Populate the database with sample data
//! - `sync`   — Sync the search indexes from the database
//! - `doctor` — Check connectivity to the collaborators

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "shopscope",
    about = "ShopScope — hybrid analytics agent for e-commerce data",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the config file
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask the agent a question
    Ask {
        /// Send a single query instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Create the database schema
    Setup,

    /// Populate the database with sample data
    Seed,

    /// Sync the search indexes from the database
    Sync,

    /// Check connectivity to PostgreSQL, Meilisearch, and the model endpoint
    Doctor,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config = shopscope_config::AppConfig::load(&cli.config)?;

    match cli.command {
        Commands::Serve { port } => commands::serve::run(config, port).await?,
        Commands::Ask { message } => commands::ask::run(config, message).await?,
        Commands::Setup => commands::setup::run(config).await?,
        Commands::Seed => commands::seed::run(config).await?,
        Commands::Sync => commands::sync::run(config).await?,
        Commands::Doctor => commands::doctor::run(config).await?,
    }

    Ok(())
}
