use axum::{
    extract::{Path, Query, State},
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::store::load_document;
use crate::document::view::DocumentView;
use crate::errors::AppError;
use crate::render::catalog::{TemplateDescriptor, DEFAULT_TEMPLATE};
use crate::render::demo::DemoDocument;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ViewQuery {
    pub owner_id: Uuid,
    pub template: Option<String>,
}

#[derive(Serialize)]
pub struct GalleryResponse {
    pub default_template: &'static str,
    pub templates: Vec<TemplateDescriptor>,
}

/// GET /api/v1/documents/:id/view
pub async fn handle_view(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ViewQuery>,
) -> Result<Html<String>, AppError> {
    let document = load_document(&state.db, id, params.owner_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))?;

    let template = state
        .catalog
        .resolve_override(params.template.as_deref(), document.template_name());
    let html = state.engine.render_view(template, &document, None)?;
    Ok(Html(html))
}

/// GET /api/v1/templates
pub async fn handle_gallery(State(state): State<AppState>) -> Json<GalleryResponse> {
    Json(GalleryResponse {
        default_template: DEFAULT_TEMPLATE,
        templates: state.catalog.all().to_vec(),
    })
}

/// GET /api/v1/templates/demo/:name
pub async fn handle_demo(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Html<String>, AppError> {
    let template = state.catalog.resolve(&name);
    let html = state
        .engine
        .render_view(template, &DemoDocument::sample(), None)?;
    Ok(Html(html))
}
