use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::export::pdf::PdfConverter;
use crate::render::catalog::TemplateCatalog;
use crate::render::engine::TemplateEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Template allowlist, built once at startup.
    pub catalog: Arc<TemplateCatalog>,
    pub engine: Arc<TemplateEngine>,
    /// Pluggable HTML → PDF backend. Selected via PDF_CONVERTER.
    pub pdf: Arc<dyn PdfConverter>,
}
