mod browser;
mod page;
mod server;
mod sessions;

use anyhow::{Context, Result};
use clap::Parser;
use strava_core::api::StravaApiClient;
use strava_core::auth::{OAuthClient, OAuthConfig};
use strava_core::config::{redirect_uri_from_env, ClientCredentials, DEFAULT_PORT};
use strava_core::flow::FlowController;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse your Strava activities in a local web page")]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,
    /// Port to listen on; must match the redirect URI registered with Strava
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,
    /// Do not open the page in the system browser
    #[arg(long)]
    no_browser: bool,
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
    /// Output logs as JSON instead of human-readable text
    #[arg(long)]
    json_logs: bool,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    let credentials = ClientCredentials::from_env();
    let redirect_uri =
        redirect_uri_from_env(cli.port).context("failed to resolve redirect URI")?;
    let oauth = OAuthClient::new(OAuthConfig::new(credentials, redirect_uri.clone()))
        .context("failed to build OAuth client")?;
    let api = StravaApiClient::new().context("failed to build Strava API client")?;
    let state = server::AppState::new(FlowController::new(oauth, api));

    let listener = TcpListener::bind((cli.bind.as_str(), cli.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", cli.bind, cli.port))?;
    let addr = listener.local_addr()?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        %addr,
        %redirect_uri,
        "strava viewer listening"
    );

    if !cli.no_browser && browser::browser_available() {
        browser::launch(&redirect_uri);
    }

    axum::serve(listener, server::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
