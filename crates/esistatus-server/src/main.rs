use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use esistatus_core::{EsiStatusConfig, UpdateSchedule};
use esistatus_server::esi::{EsiClient, ReqwestTransport};
use esistatus_server::web::{create_router, server_addr, AppState};
use esistatus_server::{StatusStore, StatusUpdater};

#[derive(Parser, Debug)]
#[command(name = "esistatus-server", about = "ESI status monitor and web UI")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EsiStatusConfig::from_file(path)
            .with_context(|| format!("Loading config from {:?}", path))?,
        None => EsiStatusConfig::default(),
    };
    let config = Arc::new(config);

    let store = StatusStore::new();

    let transport = ReqwestTransport::new(&config.esi)?;
    let client = EsiClient::new(transport, config.esi.clone());
    let schedule = UpdateSchedule::new(&config.updater.schedule)?;
    let updater = Arc::new(StatusUpdater::new(
        client,
        store.clone(),
        schedule,
        config.updater.timezone.clone(),
    ));

    tokio::spawn({
        let updater = Arc::clone(&updater);
        async move {
            if let Err(e) = updater.run().await {
                tracing::error!(error = %e, "Status updater exited");
            }
        }
    });

    let state = AppState {
        store,
        config: Arc::clone(&config),
    };

    let addr = server_addr(&config);
    let router = create_router(state);

    tracing::info!(%addr, "ESI status server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
