//! Handlers for the escalation sweep admin trigger.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/escalation/run
///
/// Run one escalation sweep immediately and return the per-enrollment
/// outcomes. The scheduled background sweep uses the same service, so a
/// manual run is always safe to trigger.
pub async fn run(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let outcomes = state.escalation.run_sweep().await?;
    Ok(Json(DataResponse { data: outcomes }))
}
