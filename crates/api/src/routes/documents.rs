//! Documents: the JSON API used by the editor and the list/detail pages.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::get,
};
use kakeibo_core::documents::{DocumentUpdate, NewDocument};
use kakeibo_db::{DocumentOrder, DocumentRepository, DocumentSummary, entities::documents};
use serde::{Deserialize, Serialize};

use crate::{
    ApiError, ApiResult, AppState,
    form::{Success, success},
    middleware::AuthUser,
};

/// Creates the `/api/documents` routes. Each handler checks identity itself.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/documents", get(list_documents).post(create_document))
        .route(
            "/api/documents/{id}",
            get(get_document).put(update_document).delete(delete_document),
        )
}

/// Creates the `/user/documents` page routes.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/user/documents", get(documents_page))
        .route("/user/documents/{id}", get(document_page))
}

/// A list of documents without bodies.
#[derive(Debug, Serialize)]
pub struct DocumentList {
    /// Documents in display order.
    pub documents: Vec<DocumentSummary>,
}

/// A single document with its body.
#[derive(Debug, Serialize)]
pub struct DocumentBody {
    /// The document.
    pub document: documents::Model,
}

/// A created document, body omitted.
#[derive(Debug, Serialize)]
pub struct CreatedDocument {
    /// The new document.
    pub document: DocumentSummary,
}

/// Create request.
#[derive(Debug, Deserialize)]
pub struct CreateDocumentRequest {
    title: Option<String>,
    emoji: Option<String>,
    parent_id: Option<i32>,
    is_folder: Option<bool>,
}

/// Update request. The three fields replace the stored ones; an absent
/// field is written as empty.
#[derive(Debug, Deserialize)]
pub struct UpdateDocumentRequest {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    emoji: String,
}

async fn list(state: &AppState, user_id: i32, order: DocumentOrder) -> ApiResult<DocumentList> {
    let Some(db) = state.db.clone() else {
        return Ok(DocumentList { documents: Vec::new() });
    };
    let documents = DocumentRepository::new(db).list(user_id, order).await?;
    Ok(DocumentList { documents })
}

async fn find(state: &AppState, user_id: i32, id: i32) -> ApiResult<DocumentBody> {
    let Some(db) = state.db.clone() else {
        return Err(ApiError::not_found("Not found"));
    };
    DocumentRepository::new(db)
        .find(user_id, id)
        .await?
        .map(|document| DocumentBody { document })
        .ok_or_else(|| ApiError::not_found("Not found"))
}

/// GET /api/documents
async fn list_documents(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<DocumentList>> {
    list(&state, auth.id(), DocumentOrder::CreatedDesc).await.map(Json)
}

/// POST /api/documents
async fn create_document(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<CreateDocumentRequest>, JsonRejection>,
) -> ApiResult<Json<CreatedDocument>> {
    let Json(req) = payload?;
    let doc = NewDocument::new(
        req.title,
        req.emoji,
        req.parent_id,
        req.is_folder.unwrap_or(false),
    );
    let db = state.store()?;

    let created = DocumentRepository::new(db.clone())
        .create(auth.id(), doc)
        .await?;
    Ok(Json(CreatedDocument {
        document: created.into(),
    }))
}

/// GET /api/documents/{id}
async fn get_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<DocumentBody>> {
    find(&state, auth.id(), id).await.map(Json)
}

/// PUT /api/documents/{id}
async fn update_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    payload: Result<Json<UpdateDocumentRequest>, JsonRejection>,
) -> ApiResult<Json<DocumentBody>> {
    let Json(req) = payload?;
    let update = DocumentUpdate {
        title: req.title,
        content: req.content,
        emoji: req.emoji,
    };
    let db = state.store()?;

    let document = DocumentRepository::new(db.clone())
        .update(auth.id(), id, update)
        .await?;
    Ok(Json(DocumentBody { document }))
}

/// DELETE /api/documents/{id}
async fn delete_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<Success>> {
    let db = state.store()?;

    DocumentRepository::new(db.clone()).delete(auth.id(), id).await?;
    Ok(success())
}

/// GET /user/documents - Most recently edited first.
async fn documents_page(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<DocumentList>> {
    list(&state, auth.id(), DocumentOrder::UpdatedDesc).await.map(Json)
}

/// GET /user/documents/{id}
async fn document_page(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<DocumentBody>> {
    find(&state, auth.id(), id).await.map(Json)
}
