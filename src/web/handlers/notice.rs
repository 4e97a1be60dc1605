//! Notice board handlers for Web API.
//!
//! Path segments and body fields are handed to the database as sent; a
//! value the schema cannot take fails there and answers 500.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::db::SqlValue;
use crate::notice::{NewNoticeEntry, NoticeBoardEntry, NoticeRepository};
use crate::web::dto::{ApiJson, CreateNoticeRequest, MessageResponse, UpdateNoticeRequest};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// GET /api/data - List every notice.
pub async fn list_notices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<NoticeBoardEntry>>, ApiError> {
    let repo = NoticeRepository::new(state.db.pool());
    let entries = repo.list().await?;

    Ok(Json(entries))
}

/// POST /api/data - Insert a notice.
pub async fn create_notice(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateNoticeRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let entry: NewNoticeEntry = req.into();
    let repo = NoticeRepository::new(state.db.pool());
    repo.create(&entry).await?;

    tracing::info!(post_no = %entry.post_no, "Notice inserted");
    Ok(Json(MessageResponse::new("Data inserted successfully")))
}

/// PUT /api/data/:post_no - Overwrite a notice.
///
/// A `post_no` that matches nothing still answers 200.
pub async fn update_notice(
    State(state): State<Arc<AppState>>,
    Path(post_no): Path<String>,
    ApiJson(req): ApiJson<UpdateNoticeRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let post_no = SqlValue::Text(post_no);
    let repo = NoticeRepository::new(state.db.pool());
    let affected = repo.update(&post_no, &req.into()).await?;

    tracing::debug!(post_no = %post_no, rows_affected = affected, "Notice updated");
    Ok(Json(MessageResponse::new("Data updated successfully")))
}

/// DELETE /api/data/:post_no - Delete a notice.
///
/// A `post_no` that matches nothing still answers 200.
pub async fn delete_notice(
    State(state): State<Arc<AppState>>,
    Path(post_no): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let post_no = SqlValue::Text(post_no);
    let repo = NoticeRepository::new(state.db.pool());
    let affected = repo.delete(&post_no).await?;

    tracing::debug!(post_no = %post_no, rows_affected = affected, "Notice deleted");
    Ok(Json(MessageResponse::new("Data deleted successfully")))
}
