//! Maison CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! maison-cli migrate
//!
//! # Create a brand
//! maison-cli brand create --name "Atelier Nord"
//!
//! # Seed a fresh database with demo data
//! maison-cli seed
//! ```
//!
//! All commands read `DATABASE_URL` from the environment (or a `.env` file).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "maison-cli")]
#[command(author, version, about = "Maison CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage brands
    Brand {
        #[command(subcommand)]
        action: BrandAction,
    },
    /// Seed a fresh database with demo data
    Seed,
}

#[derive(Subcommand)]
enum BrandAction {
    /// Create a new brand
    Create {
        /// Brand display name
        #[arg(short, long)]
        name: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Brand { action } => match action {
            BrandAction::Create { name } => commands::brand::create(&name).await?,
        },
        Commands::Seed => commands::seed::run().await?,
    }
    Ok(())
}
