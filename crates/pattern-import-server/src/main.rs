use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pattern_import_server::config::ServerConfig;
use pattern_import_server::pdf::PdftoppmConverter;
use pattern_import_server::scrape::{HttpFetcher, PageFetcher, DESKTOP_USER_AGENT};
use pattern_import_server::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::parse();
    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| format!("creating {}", config.output_dir.display()))?;

    let fallback: Option<Arc<dyn PageFetcher>> = if config.no_fallback {
        None
    } else {
        Some(Arc::new(HttpFetcher::with_user_agent(
            DESKTOP_USER_AGENT,
            config.fetch_timeout(),
        )?))
    };

    let state = AppState {
        fetcher: Arc::new(HttpFetcher::new(config.fetch_timeout())?),
        fallback,
        converter: Arc::new(PdftoppmConverter::new(config.pdftoppm.clone())),
        output_dir: config.output_dir.clone(),
    };

    let addr = config.addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!(%addr, output_dir = %config.output_dir.display(), "pattern import server listening");

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
