use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sessions::{GridView, OpenSession};
use types::{Period, SubjectId, TeacherId, Weekday};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreated {
    pub session_id: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignIn {
    pub teacher_id: TeacherId,
    #[schema(value_type = u8)]
    pub day: Weekday,
    #[schema(value_type = u8)]
    pub period: Period,
    /// Overrides the subject otherwise taken from the teacher's first mapping.
    #[serde(default)]
    pub subject_id: Option<SubjectId>,
}

#[derive(Deserialize, ToSchema)]
pub struct CellIn {
    #[schema(value_type = u8)]
    pub day: Weekday,
    #[schema(value_type = u8)]
    pub period: Period,
}

#[utoipa::path(
    post,
    path = "/v1/sessions",
    request_body = OpenSession,
    responses(
        (status = 200, description = "Editing session opened", body = SessionCreated),
        (status = 400, description = "Invalid preference records")
    )
)]
pub async fn open(
    State(state): State<AppState>,
    Json(req): Json<OpenSession>,
) -> Result<Json<SessionCreated>, ApiError> {
    let id = state.sessions.open(req)?;
    Ok(Json(SessionCreated { session_id: id.0 }))
}

#[utoipa::path(
    get,
    path = "/v1/sessions/{id}",
    params(("id" = String, Path, description = "Session ID")),
    responses((status = 200, description = "Current grid", body = GridView))
)]
pub async fn view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GridView>, ApiError> {
    Ok(Json(state.sessions.view(&id)?))
}

#[utoipa::path(
    delete,
    path = "/v1/sessions/{id}",
    params(("id" = String, Path, description = "Session ID")),
    responses((status = 204, description = "Session discarded"))
)]
pub async fn close(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<http::StatusCode, ApiError> {
    state.sessions.close(&id)?;
    Ok(http::StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/v1/sessions/{id}/assign",
    params(("id" = String, Path, description = "Session ID")),
    request_body = AssignIn,
    responses((status = 200, description = "Grid after assignment", body = GridView))
)]
pub async fn assign(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AssignIn>,
) -> Result<Json<GridView>, ApiError> {
    Ok(Json(state.sessions.assign(
        &id,
        req.teacher_id,
        req.subject_id,
        req.day,
        req.period,
    )?))
}

#[utoipa::path(
    post,
    path = "/v1/sessions/{id}/clear",
    params(("id" = String, Path, description = "Session ID")),
    request_body = CellIn,
    responses((status = 200, description = "Grid after clearing the cell", body = GridView))
)]
pub async fn clear(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CellIn>,
) -> Result<Json<GridView>, ApiError> {
    Ok(Json(state.sessions.clear(&id, req.day, req.period)?))
}

#[utoipa::path(
    post,
    path = "/v1/sessions/{id}/lock",
    params(("id" = String, Path, description = "Session ID")),
    request_body = CellIn,
    responses((status = 200, description = "Grid after toggling the lock", body = GridView))
)]
pub async fn lock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CellIn>,
) -> Result<Json<GridView>, ApiError> {
    Ok(Json(state.sessions.toggle_lock(&id, req.day, req.period)?))
}

#[utoipa::path(
    post,
    path = "/v1/sessions/{id}/generate",
    params(("id" = String, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Generated grid", body = GridView),
        (status = 502, description = "Generator failed; grid unchanged")
    )
)]
pub async fn generate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GridView>, ApiError> {
    Ok(Json(state.sessions.generate(&id).await?))
}

#[utoipa::path(
    post,
    path = "/v1/sessions/{id}/save",
    params(("id" = String, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Saved grid", body = GridView),
        (status = 502, description = "Store rejected the grid")
    )
)]
pub async fn save(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GridView>, ApiError> {
    Ok(Json(state.sessions.save(&id).await?))
}
