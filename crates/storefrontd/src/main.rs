//! Storefront daemon
//!
//! Serves the catalog and intake API over HTTP.
//!
//! ## Commands
//!
//! - `serve` (default): seed the demo catalog, then listen for requests
//! - `seed`: run the startup bootstrap once and print its report
//! - `diagnose`: print the connectivity report

mod error;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};

use storefront_core::{
    bootstrap, diagnose, init_tracing, storefront_registry, CatalogService, EnvPresence,
};
use storefront_state::{DocumentStore, ModelRegistry, SurrealDocumentStore};

use crate::routes::AppState;

#[derive(Parser)]
#[command(name = "storefrontd")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Design & Commerce storefront API", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0", global = true)]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 8000, global = true)]
    port: u16,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the demo catalog and serve the API (default)
    Serve,

    /// Seed the demo catalog and exit
    Seed,

    /// Print the connectivity report and exit
    Diagnose,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    let registry = Arc::new(storefront_registry().context("Invalid model catalogue")?);
    let store: Arc<dyn DocumentStore> = Arc::new(SurrealDocumentStore::from_env().await);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
                .parse()
                .context("Invalid listen address")?;
            cmd_serve(registry, store, addr).await
        }
        Commands::Seed => cmd_seed(&registry, store.as_ref()).await,
        Commands::Diagnose => cmd_diagnose(store.as_ref()).await,
    }
}

async fn cmd_serve(
    registry: Arc<ModelRegistry>,
    store: Arc<dyn DocumentStore>,
    addr: SocketAddr,
) -> Result<()> {
    // Seeding completes before the listener accepts connections
    let report = bootstrap(&registry, store.as_ref()).await;
    info!(inserted = report.inserted(), "Startup bootstrap done");

    let state = AppState {
        catalog: CatalogService::new(registry, store),
    };

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("storefrontd listening on {}", addr);

    axum::serve(listener, routes::app(state))
        .await
        .context("HTTP server failed")?;
    Ok(())
}

async fn cmd_seed(registry: &ModelRegistry, store: &dyn DocumentStore) -> Result<()> {
    let report = bootstrap(registry, store).await;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn cmd_diagnose(store: &dyn DocumentStore) -> Result<()> {
    let report = diagnose(store, EnvPresence::from_env()).await;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
