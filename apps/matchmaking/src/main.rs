mod config;
mod db;
mod errors;
mod models;
mod providers;
mod routes;
mod scoring;
mod state;
mod weights;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::providers::standard_providers;
use crate::routes::build_router;
use crate::scoring::engine::ScoringEngine;
use crate::scoring::factor::FactorRegistry;
use crate::state::AppState;
use crate::weights::{reload, FileWeightSource, PgWeightSource, WeightSource};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Matchmaking v{}", env!("CARGO_PKG_VERSION"));

    let engine = Arc::new(ScoringEngine::new(FactorRegistry::standard()));
    info!(
        "Factor registry initialized with {} factors",
        engine.snapshot().registry.list().len()
    );

    let weight_source = build_weight_source(&config).await?;
    match &weight_source {
        Some(source) => {
            let summary = reload(&engine, source.as_ref()).await?;
            info!(
                "Loaded {} business units from {}",
                summary.business_units, summary.source
            );
        }
        None => warn!("No WEIGHTS_FILE or DATABASE_URL set; every business unit uses registry defaults"),
    }

    let providers = Arc::new(standard_providers());
    info!(
        "Sub-score providers: {} (fallback: {:?})",
        providers.len(),
        config.provider_fallback
    );

    let state = AppState {
        engine,
        providers,
        weight_source,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the ATS frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// WEIGHTS_FILE wins over DATABASE_URL; neither means registry defaults only.
async fn build_weight_source(config: &Config) -> Result<Option<Arc<dyn WeightSource>>> {
    if let Some(path) = &config.weights_file {
        return Ok(Some(Arc::new(FileWeightSource::new(path))));
    }
    if let Some(url) = &config.database_url {
        let pool = create_pool(url).await?;
        return Ok(Some(Arc::new(PgWeightSource::new(pool))));
    }
    Ok(None)
}
