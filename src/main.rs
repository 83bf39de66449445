//! guestlist entry point.
//!
//! Parses CLI flags, initializes tracing, loads configuration from the
//! environment, constructs the PostgREST store once, and serves until a
//! shutdown signal arrives. Missing required configuration is fatal here,
//! before the listener binds.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use guestlist::config::Config;
use guestlist::http_server::HttpServer;
use guestlist::submissions::PostgrestStore;

#[derive(Parser)]
#[command(name = "guestlist")]
#[command(about = "Event-registration intake and moderation API")]
#[command(version)]
struct Cli {
    /// Server bind address
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    info!("starting guestlist v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    let store = Arc::new(PostgrestStore::new(&config)?);

    HttpServer::new(&config, cli.bind, store).start().await?;
    Ok(())
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("guestlist={log_level},tower_http=info").into());
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
