//! Gallery CLI: set up credentials and talk to a running gallery server.
//!
//! Server commands use GALLERY_URL (default http://localhost:3000).

use anyhow::Context;
use clap::{Parser, Subcommand};
use gallery_cli::{init_tracing, print_json, run_setup, GalleryClient};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gallery-cli", about = "Personal media gallery CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a .env file with hosting credentials
    Setup {
        /// Where to write the file
        #[arg(long, default_value = ".env")]
        path: PathBuf,
    },
    /// Check that the server is up
    Health,
    /// Delete a media item by its hosting identifier
    Delete {
        /// External identifier (public_id)
        external_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Setup { path } => {
            let stdin = std::io::stdin();
            let mut input = stdin.lock();
            let mut output = std::io::stdout();
            run_setup(&mut input, &mut output, &path).context("Setup failed")?;
        }
        Commands::Health => {
            let client = GalleryClient::from_env()?;
            let reply = client.health().await?;
            print_json(&reply.body)?;
            if !reply.is_success() {
                anyhow::bail!("Server at {} is unhealthy ({})", client.base_url(), reply.status);
            }
        }
        Commands::Delete { external_id } => {
            let client = GalleryClient::from_env()?;
            let reply = client.delete(&external_id).await?;
            print_json(&reply.body)?;
            if !reply.is_success() {
                anyhow::bail!("Delete failed ({})", reply.status);
            }
        }
    }

    Ok(())
}
