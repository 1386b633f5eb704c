use clap::Parser;
use issue_tracker::config::ServerConfig;
use issue_tracker::logging::init_logging;
use issue_tracker::store::SqliteStore;
use issue_tracker::{Result, api};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Per-project issue tracker REST API server.
#[derive(Parser, Debug)]
#[command(name = "issue-tracker", version, about)]
struct Cli {
    /// Listen address (falls back to ISSUE_TRACKER_BIND, then 127.0.0.1:3000)
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// SQLite database path (falls back to ISSUE_TRACKER_DB, then issues.db)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    if let Err(e) = init_logging(cli.verbose, cli.quiet) {
        eprintln!("Failed to initialize logging: {e}");
        // Continue without logging rather than refusing to serve
    }

    if let Err(e) = run(cli).await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = ServerConfig::resolve(cli.bind, cli.db)?;

    let store = SqliteStore::open(&config.db_path)?;
    let app = api::router(Arc::new(store));

    let listener = TcpListener::bind(config.bind).await?;
    info!(db = %config.db_path.display(), "listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
