//! Print-shop pricing service

use anyhow::Result;
use printshop_pricing::{api::{router, AppState}, config::load_app_config, Catalog};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_app_config()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(path)?,
        None => {
            tracing::warn!("PRICING_CATALOG_PATH not set, serving an empty catalog");
            Catalog::new()
        }
    };
    let app = router(AppState { catalog: Arc::new(catalog) });

    tracing::info!("printshop-pricing listening on 0.0.0.0:{}", config.port);
    axum::serve(tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?, app).await?;
    Ok(())
}
