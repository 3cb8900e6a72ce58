mod config;
mod db;
mod document;
mod errors;
mod export;
mod models;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::export::pdf::build_converter;
use crate::render::catalog::TemplateCatalog;
use crate::render::engine::TemplateEngine;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vitae API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs pending migrations)
    let db = create_pool(&config.database_url).await?;

    let catalog = Arc::new(TemplateCatalog::builtin());
    info!(
        "Template catalog loaded: {} templates, default '{}'",
        catalog.all().len(),
        catalog.default_template().id
    );

    // Compile every layout up front so a broken template fails startup
    let engine = Arc::new(TemplateEngine::new()?);

    let pdf = build_converter(&config.pdf_backend)?;
    info!("PDF exports resolve assets against {}", config.public_base_url);

    let state = AppState {
        db,
        config: config.clone(),
        catalog,
        engine,
        pdf,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
