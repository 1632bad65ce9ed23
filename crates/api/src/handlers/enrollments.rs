//! Handlers for the `/enrollments` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use stride_core::types::DbId;
use stride_db::models::enrollment::EnrollInput;
use validator::ValidateEmail;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for listing enrollments.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub email: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/enrollments
///
/// Start a new enrollment in a challenge.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<EnrollInput>,
) -> AppResult<impl IntoResponse> {
    if !input.email.validate_email() {
        return Err(AppError::BadRequest(format!(
            "Invalid email address: {}",
            input.email
        )));
    }

    let enrollment = state.enrollments.enroll(&input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: enrollment }),
    ))
}

/// GET /api/v1/enrollments?email=user@example.com
///
/// List all enrollments for an email address, newest first.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let email = params
        .email
        .ok_or_else(|| AppError::BadRequest("email query parameter is required".to_string()))?;

    let enrollments = state.enrollments.list_by_email(&email).await?;
    Ok(Json(DataResponse { data: enrollments }))
}

/// GET /api/v1/enrollments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let enrollment = state.enrollments.get(id).await?;
    Ok(Json(DataResponse { data: enrollment }))
}

/// POST /api/v1/enrollments/{id}/abandon
///
/// Explicit opt-out. Terminal.
pub async fn abandon(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let enrollment = state.enrollments.abandon(id).await?;
    Ok(Json(DataResponse { data: enrollment }))
}

/// POST /api/v1/enrollments/{id}/pause
pub async fn pause(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let enrollment = state.enrollments.pause(id).await?;
    Ok(Json(DataResponse { data: enrollment }))
}

/// POST /api/v1/enrollments/{id}/resume
pub async fn resume(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let enrollment = state.enrollments.resume(id).await?;
    Ok(Json(DataResponse { data: enrollment }))
}
