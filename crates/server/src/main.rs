//! `fred-mcp`: MCP stdio server for FRED economic data queries.

mod handler;

use clap::Parser;
use fred_tools::{FredClient, RateLimiter};
use handler::FredServer;
use rmcp::{ServiceExt, transport::stdio};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "fred-mcp",
    version,
    about = "MCP stdio server exposing FRED economic data query tools"
)]
struct Args {
    /// FRED API key (get a free key at
    /// https://fred.stlouisfed.org/docs/api/api_key.html).
    #[arg(long, env = "FRED_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Base URL of the FRED API.
    #[arg(long, env = "FRED_BASE_URL", default_value = fred_tools::client::DEFAULT_BASE_URL)]
    base_url: String,

    /// Outbound HTTP timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing FRED_API_KEY is a startup-time fatal: clap exits non-zero
    // before anything else runs.
    let args = Args::parse();

    // stdout carries the MCP transport; all diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let client = FredClient::with_base_url(
        &args.api_key,
        &args.base_url,
        RateLimiter::default(),
        Duration::from_secs(args.timeout_secs),
    )?;

    tracing::info!(base_url = %args.base_url, "starting fred-mcp stdio server");

    let service = FredServer::new(client).serve(stdio()).await?;
    service.waiting().await?;

    Ok(())
}
