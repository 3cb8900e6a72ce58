use axum::extract::{Path, Query, State};
use serde::Deserialize;
use uuid::Uuid;

use crate::document::store::load_document;
use crate::errors::AppError;
use crate::export::{export_document, ExportContext, ExportFormat, ExportedFile};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ExportQuery {
    pub owner_id: Uuid,
    pub format: Option<String>,
}

/// GET /api/v1/documents/:id/export?format=txt|doc|pdf
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ExportQuery>,
) -> Result<ExportedFile, AppError> {
    let format = ExportFormat::parse(params.format.as_deref().unwrap_or("txt"))?;
    let document = load_document(&state.db, id, params.owner_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))?;

    let ctx = ExportContext {
        catalog: &state.catalog,
        engine: &state.engine,
        converter: state.pdf.as_ref(),
        public_base_url: &state.config.public_base_url,
    };
    export_document(&document, format, &ctx).await
}
