//! Login handlers.
//!
//! Mounted only when login is enabled. The session itself is managed by
//! the session middleware; these handlers attach or clear `post_no`.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::auth::StudentRepository;
use crate::web::dto::{ApiJson, CheckLoginResponse, LoginRequest, MessageResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::CurrentSession;

/// POST /api/login - Log in with a student number.
pub async fn login(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let repo = StudentRepository::new(state.db.pool());
    if !repo.exists(&req.post_no).await? {
        tracing::info!(post_no = %req.post_no, "Login rejected: unknown student number");
        return Err(ApiError::unauthorized("Invalid Student Number"));
    }

    if !session.login(req.post_no.clone()) {
        tracing::warn!(session_id = %session.id(), "Session expired during login");
        return Err(ApiError::internal());
    }

    tracing::info!(post_no = %req.post_no, "Login successful");
    Ok(Json(MessageResponse::new("Login successful")))
}

/// POST /api/logout - Clear the logged-in student number.
pub async fn logout(CurrentSession(session): CurrentSession) -> Json<MessageResponse> {
    if session.logout() {
        tracing::info!(session_id = %session.id(), "Logout successful");
        Json(MessageResponse::new("Logout successful"))
    } else {
        Json(MessageResponse::new("Already logged out"))
    }
}

/// GET /api/check-login - Report whether the session is logged in.
pub async fn check_login(CurrentSession(session): CurrentSession) -> Json<CheckLoginResponse> {
    Json(CheckLoginResponse {
        is_logged_in: session.is_logged_in(),
    })
}
