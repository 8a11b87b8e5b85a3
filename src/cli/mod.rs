//! CLI module for crosspub
//!
//! - `publish`: resolve, validate and publish one article everywhere
//! - `doctor`: check credentials, the driver sidecar, and the results dir

use clap::{Parser, Subcommand};

pub mod doctor;
pub mod publish;

/// Crosspub CLI
#[derive(Parser, Debug)]
#[command(name = "crosspub")]
#[command(about = "Publish one article to many content platforms")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Publish an article
    Publish(publish::PublishArgs),
    /// Run environment diagnostics
    Doctor,
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Publish(args) => publish::run(args).await,
        Commands::Doctor => doctor::run().await,
    }
}
