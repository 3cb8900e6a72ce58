use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::registry::{form_skeleton, FormSkeleton};
use crate::document::store::{
    create_document, delete_document, find_document, list_documents, load_document,
    update_document,
};
use crate::document::validation::{edit_form, validate_submission, DocumentSubmission};
use crate::errors::AppError;
use crate::models::document::{DocType, DocumentRow};
use crate::render::catalog::TemplateDescriptor;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct OwnerQuery {
    pub owner_id: Uuid,
}

#[derive(Deserialize)]
pub struct NewDocumentQuery {
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
}

#[derive(Serialize)]
pub struct NewDocumentResponse {
    pub form: FormSkeleton,
    pub default_template: &'static str,
    pub templates: Vec<TemplateDescriptor>,
}

#[derive(Serialize)]
pub struct DocumentIdResponse {
    pub id: Uuid,
}

#[derive(Serialize)]
pub struct EditFormResponse {
    pub document: DocumentRow,
    pub form: DocumentSubmission,
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Document {id} not found"))
}

/// GET /api/v1/documents
pub async fn handle_list(
    State(state): State<AppState>,
    Query(params): Query<OwnerQuery>,
) -> Result<Json<Vec<DocumentRow>>, AppError> {
    let documents = list_documents(&state.db, params.owner_id).await?;
    Ok(Json(documents))
}

impl NewDocumentQuery {
    /// Unknown or missing values read as a resume.
    fn doc_type(&self) -> DocType {
        self.doc_type
            .as_deref()
            .and_then(DocType::parse)
            .unwrap_or_default()
    }
}

/// GET /api/v1/documents/new?type=resume|cv
pub async fn handle_new(
    State(state): State<AppState>,
    Query(params): Query<NewDocumentQuery>,
) -> Json<NewDocumentResponse> {
    let doc_type = params.doc_type();
    Json(NewDocumentResponse {
        form: form_skeleton(doc_type),
        default_template: state.catalog.default_template().id,
        templates: state.catalog.all().to_vec(),
    })
}

/// POST /api/v1/documents?type=resume|cv
///
/// A `doc_type` in the body wins over the query.
pub async fn handle_create(
    State(state): State<AppState>,
    Query(params): Query<NewDocumentQuery>,
    Json(submission): Json<DocumentSubmission>,
) -> Result<(StatusCode, Json<DocumentIdResponse>), AppError> {
    let validated = validate_submission(&submission, params.doc_type(), &state.catalog)?;
    let id = create_document(&state.db, submission.owner_id, &validated).await?;
    Ok((StatusCode::CREATED, Json(DocumentIdResponse { id })))
}

/// GET /api/v1/documents/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<OwnerQuery>,
) -> Result<Json<EditFormResponse>, AppError> {
    let aggregate = load_document(&state.db, id, params.owner_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let form = edit_form(&aggregate);
    Ok(Json(EditFormResponse {
        document: aggregate.document,
        form,
    }))
}

/// PUT /api/v1/documents/:id
pub async fn handle_update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(submission): Json<DocumentSubmission>,
) -> Result<Json<DocumentIdResponse>, AppError> {
    let stored = find_document(&state.db, id, submission.owner_id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let validated = validate_submission(&submission, stored.doc_type(), &state.catalog)?;
    // a concurrent delete between the lookup and the write lands here
    if !update_document(&state.db, id, submission.owner_id, &validated).await? {
        return Err(not_found(id));
    }
    Ok(Json(DocumentIdResponse { id }))
}

/// DELETE /api/v1/documents/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<OwnerQuery>,
) -> Result<StatusCode, AppError> {
    if delete_document(&state.db, id, params.owner_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
