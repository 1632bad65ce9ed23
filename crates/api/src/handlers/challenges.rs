//! Handlers for the `/challenges` resource.
//!
//! The challenge catalog is read-only over HTTP; entries are configured
//! via migrations or an operator tool.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use stride_core::error::CoreError;
use stride_db::repositories::ChallengeRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/challenges
///
/// List all challenges currently open for enrollment.
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let challenges = ChallengeRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: challenges }))
}

/// GET /api/v1/challenges/{slug}
///
/// Get a single challenge by its slug. Inactive challenges stay visible
/// here so existing participants can still read their definition.
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let challenge = ChallengeRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or(CoreError::ChallengeNotFound { slug })?;
    Ok(Json(DataResponse { data: challenge }))
}
