use axum::{extract::State, Json};
use sched_core::{find_conflicts, validate_lessons};
use serde::{Deserialize, Serialize};
use types::{ClassSubjectMapping, LessonConflict, LessonRecord};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize, ToSchema)]
pub struct ConflictCheckIn {
    pub lessons: Vec<LessonRecord>,
    #[serde(default)]
    pub mappings: Vec<ClassSubjectMapping>,
}

#[derive(Serialize, ToSchema)]
pub struct ConflictReport {
    pub ok: bool,
    pub count: usize,
    pub conflicts: Vec<LessonConflict>,
}

#[utoipa::path(
    post,
    path = "/v1/conflicts",
    request_body = ConflictCheckIn,
    responses(
        (status = 200, description = "Double-booked lesson pairs", body = ConflictReport),
        (status = 400, description = "Malformed lesson records")
    )
)]
pub async fn check(Json(input): Json<ConflictCheckIn>) -> Result<Json<ConflictReport>, ApiError> {
    validate_lessons(&input.lessons)?;
    let conflicts = find_conflicts(&input.lessons, &input.mappings);
    Ok(Json(ConflictReport {
        ok: conflicts.is_empty(),
        count: conflicts.len(),
        conflicts,
    }))
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionConflictsIn {
    pub session_ids: Vec<String>,
}

/// Double bookings across the grids of open editing sessions.
#[utoipa::path(
    post,
    path = "/v1/sessions/conflicts",
    request_body = SessionConflictsIn,
    responses(
        (status = 200, description = "Double-booked cells across the sessions", body = ConflictReport),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn check_sessions(
    State(state): State<AppState>,
    Json(input): Json<SessionConflictsIn>,
) -> Result<Json<ConflictReport>, ApiError> {
    let conflicts = state.sessions.conflicts(&input.session_ids)?;
    Ok(Json(ConflictReport {
        ok: conflicts.is_empty(),
        count: conflicts.len(),
        conflicts,
    }))
}
