use clap::Parser;
use dotenv::dotenv;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::time::Duration;
use tracing::{error, info};
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use stockdesk::alerting::monitor::StockMonitor;
use stockdesk::bot;
use stockdesk::config::ServerConfig;
use stockdesk::notifications::credentials::CredentialResolver;
use stockdesk::notifications::dispatcher::AlertDispatcher;
use stockdesk::services::crypto_service::SettingSealer;
use stockdesk::version::VERSION;
use stockdesk::web::create_axum_router;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to an env file loaded before configuration is resolved
    #[arg(short, long)]
    env_file: Option<String>,
}

fn init_logging() {
    // Log to a file: JSON format, daily rotation
    let file_appender = rolling::daily("logs", "server.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .json();

    // Log to stdout: human-readable format
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    // Default to `info,sea_orm=warn` if RUST_LOG is not set.
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sea_orm=warn,sqlx::query=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Manually check for --version before full parsing to keep the output simple.
    if std::env::args().any(|arg| arg == "--version") {
        println!("stockdesk server version: {VERSION}");
        return Ok(());
    }

    let args = Args::parse();

    init_logging();
    info!("Starting stockdesk server, version: {}", VERSION);

    match &args.env_file {
        Some(path) => {
            dotenv::from_path(path)?;
        }
        None => {
            dotenv().ok();
        }
    }

    // --- Server Config Setup ---
    let config = match ServerConfig::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("Failed to load server configuration: {}", e);
            return Err(e.into());
        }
    };

    // --- Database Pool Setup ---
    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(10);
    let db_pool: DatabaseConnection = Database::connect(opt).await?;

    // --- Notification Stack Setup ---
    let sealer = Arc::new(SettingSealer::from_hex_key(&config.settings_seal_key)?);
    let credentials = CredentialResolver::new(db_pool.clone(), sealer);
    let dispatcher = Arc::new(AlertDispatcher::new(credentials.clone()));

    // --- Low-Stock Monitor Task ---
    let (monitor, stock_check_tx) =
        StockMonitor::new(db_pool.clone(), dispatcher.clone(), credentials.clone());
    let monitor_period = Duration::from_secs(config.stock_monitor_period_secs);
    tokio::spawn(monitor.run(monitor_period));

    // --- Telegram Bot Task ---
    tokio::spawn(bot::start_bot(
        db_pool.clone(),
        credentials.clone(),
        stock_check_tx.clone(),
    ));

    // --- HTTP Server ---
    let http_addr: SocketAddr = config.http_listen_addr.parse()?;
    let app_router = create_axum_router(
        db_pool,
        config.clone(),
        credentials,
        dispatcher,
        stock_check_tx,
    );

    info!("HTTP server listening on {}", http_addr);
    let listener = tokio::net::TcpListener::bind(http_addr).await?;
    axum::serve(listener, app_router).await?;

    Ok(())
}
