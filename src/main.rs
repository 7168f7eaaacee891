// src/main.rs
// S7 Bridge - MCP server connecting AI agents to Siemens S7 PLCs

use anyhow::Result;
use clap::{Parser, Subcommand};
use s7_bridge::{
    config,
    credentials::CredentialStore,
    mcp::BridgeServer,
    rpc::{DeviceClient, RequestIds},
    web,
};
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "s7-bridge")]
#[command(about = "MCP server connecting AI agents to Siemens S7 PLCs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run as MCP server on stdio (default, for desktop agents)
    Serve,

    /// Run the MCP server over streamable HTTP with the status page
    Http {
        /// Port to listen on
        #[arg(short, long, env = "MCP_SERVER_PORT", default_value = "5000")]
        port: u16,
    },
}

fn build_services() -> (Arc<CredentialStore>, Arc<DeviceClient>) {
    let ids = Arc::new(RequestIds::new());
    let store = Arc::new(CredentialStore::new());
    let client = Arc::new(DeviceClient::new(ids));
    (store, client)
}

async fn run_stdio() -> Result<()> {
    let (store, client) = build_services();
    let server = BridgeServer::new(store, client);

    let transport = rmcp::transport::io::stdio();
    let service = rmcp::serve_server(server, transport).await?;
    service.waiting().await?;

    Ok(())
}

async fn run_http(port: u16) -> Result<()> {
    let (store, client) = build_services();
    info!("{} PLCs configured", config::available_plcs().len());

    let state = web::AppState {
        store,
        client,
        started: std::time::Instant::now(),
    };
    let app = web::create_router(state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("MCP server listening on http://{addr}/mcp (status page at /status)");
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Quiet on stdio so the protocol stream stays clean
    let log_level = match &cli.command {
        Some(Commands::Serve) | None => Level::WARN,
        Some(Commands::Http { .. }) => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        None | Some(Commands::Serve) => run_stdio().await?,
        Some(Commands::Http { port }) => run_http(port).await?,
    }

    Ok(())
}
