//! Sushi CLI - Database migrations and menu seeding.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! sushi migrate
//!
//! # Seed categories and products from a YAML file
//! sushi seed menu --file crates/cli/seed/menu.yaml
//!
//! # Replace the existing menu
//! sushi seed menu --file crates/cli/seed/menu.yaml --clear
//! ```
//!
//! Both commands read `SUSHI_DATABASE_URL` (or `DATABASE_URL`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sushi")]
#[command(author, version, about = "Sushi API CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Load menu categories and products from a YAML file
    Menu {
        /// Path to the menu file
        #[arg(short, long, default_value = "crates/cli/seed/menu.yaml")]
        file: String,

        /// Delete the current menu before seeding
        #[arg(long)]
        clear: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Menu { file, clear } => commands::seed::menu(&file, clear).await?,
        },
    }
    Ok(())
}
