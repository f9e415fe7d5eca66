use anyhow::Result;
use clap::Parser;
use osprey_browser::ChromeBrowser;
use osprey_engine::LighthouseCli;
use osprey_scanner::TlsScanner;
use osprey_server::audit::Auditor;
use osprey_server::routes;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "osprey")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Website audit service combining a Lighthouse pass with TLS security checks",
    long_about = "Osprey exposes a single POST /api/audit endpoint. Each request launches an \
                  isolated headless Chrome, runs Lighthouse (performance, SEO, accessibility) \
                  and an independent TLS security scan concurrently, and returns one merged report."
)]
struct Cli {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    listen: SocketAddr,

    /// Path to the Chrome or Chromium binary
    #[arg(long)]
    chrome_path: Option<PathBuf>,

    /// Path to the Lighthouse CLI binary
    #[arg(long)]
    lighthouse_path: Option<PathBuf>,

    /// Seconds allowed for the scan phase of one audit
    #[arg(long, default_value_t = 120)]
    scan_timeout: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Resolving the engine up front makes a missing Lighthouse install
    // a startup failure instead of a 500 on the first request.
    let engine = LighthouseCli::discover(cli.lighthouse_path.as_deref())?;

    let auditor = Arc::new(Auditor::new(
        Arc::new(ChromeBrowser::new(cli.chrome_path)),
        Arc::new(engine),
        Arc::new(TlsScanner),
        Duration::from_secs(cli.scan_timeout),
    ));

    let app = routes::router(auditor);
    let listener = tokio::net::TcpListener::bind(cli.listen).await?;
    tracing::info!(addr = %cli.listen, "Audit server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Received Ctrl+C, shutting down");
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new(
            "osprey_server=debug,osprey_browser=debug,osprey_engine=debug,osprey_scanner=debug",
        )
    } else {
        EnvFilter::new(
            "osprey_server=info,osprey_browser=info,osprey_engine=info,osprey_scanner=info",
        )
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
