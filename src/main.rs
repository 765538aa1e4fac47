use aliascrab::{Config, DynUpstream, HttpUpstream, SharedConfig};
use anyhow::Result;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_init();

    let config = config_init(std::env::args().nth(1))?;
    let upstream: DynUpstream = Arc::new(HttpUpstream::new(&config)?);

    tracing::info!("API listening on {}", &config.api_bind_addr);
    tracing::info!("forwarding aliases @{} via {}", config.domain, config.upstream_url);
    aliascrab::new_http(config, upstream, shutdown_signal()).await?;
    tracing::info!("goodbye");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c, shutdown signal disabled: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("quitting from signal, draining in-flight requests");
}

fn tracing_init() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aliascrab=info,tower_http=info".into()),
        )
        .init();
}

fn config_init(config_file: Option<String>) -> Result<SharedConfig> {
    let config = match config_file {
        None => {
            tracing::debug!("loading config from the environment");
            Config::from_env()?
        }
        Some(config_file) => {
            tracing::debug!("loading config from {config_file}");
            Config::try_from_file(&config_file)?
        }
    };
    Ok(Arc::new(config))
}
