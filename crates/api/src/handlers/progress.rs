//! Handlers for per-day progress, the calendar view, and the alert log.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use stride_core::types::DbId;
use stride_db::models::progress::SetDayCompletion;
use stride_db::repositories::AlertRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// PUT /api/v1/enrollments/{id}/days/{day}
///
/// Mark a day complete or incomplete, with optional notes. The notes are
/// overwritten on every save.
pub async fn set_day(
    State(state): State<AppState>,
    Path((id, day)): Path<(DbId, i32)>,
    Json(input): Json<SetDayCompletion>,
) -> AppResult<impl IntoResponse> {
    let entry = state.progress.set_day_completion(id, day, &input).await?;
    Ok(Json(DataResponse { data: entry }))
}

/// GET /api/v1/enrollments/{id}/progress
///
/// All progress rows for an enrollment in day order.
pub async fn list(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let entries = state.progress.get_progress(id).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/enrollments/{id}/calendar
///
/// The resolved day grid: completed, missed, today, or locked per day.
pub async fn calendar(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let grid = state.progress.day_grid(id).await?;
    Ok(Json(DataResponse { data: grid }))
}

/// GET /api/v1/enrollments/{id}/alerts
///
/// Full escalation alert history for an enrollment, oldest first.
pub async fn alerts(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    // 404 for unknown enrollments rather than an empty list.
    state.enrollments.get(id).await?;
    let records = AlertRepo::list_for_enrollment(&state.pool, id).await?;
    Ok(Json(DataResponse { data: records }))
}
