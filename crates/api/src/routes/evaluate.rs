use axum::Json;
use sched_core::{validate_preferences, validate_slots, GridState};
use serde::{Deserialize, Serialize};
use types::{ClassId, FairnessEntry, GenerateSummary, ScheduleSlot, TeacherPreference, TermId};
use utoipa::ToSchema;

use crate::error::ApiError;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateIn {
    pub class_id: ClassId,
    /// At most one slot per cell; cells left out read as EMPTY.
    pub slots: Vec<ScheduleSlot>,
    #[serde(default)]
    pub preferences: Vec<TeacherPreference>,
}

#[derive(Serialize, ToSchema)]
pub struct EvaluateOut {
    pub slots: Vec<ScheduleSlot>,
    pub summary: GenerateSummary,
    pub fairness: Vec<FairnessEntry>,
}

/// Stateless evaluation of a grid snapshot. The reply always carries the
/// full 48-cell grid.
#[utoipa::path(
    post,
    path = "/v1/evaluate",
    request_body = EvaluateIn,
    responses(
        (status = 200, description = "Slot statuses, summary and workload per teacher", body = EvaluateOut),
        (status = 400, description = "Invalid preference records or repeated/out-of-grid cells")
    )
)]
pub async fn evaluate_grid(Json(input): Json<EvaluateIn>) -> Result<Json<EvaluateOut>, ApiError> {
    validate_preferences(&input.preferences)?;
    validate_slots(&input.class_id, &input.slots)?;
    let grid = GridState::from_slots(
        input.class_id,
        TermId(String::new()),
        input.preferences,
        Vec::new(),
        input.slots,
    );
    Ok(Json(EvaluateOut {
        summary: grid.summary(),
        fairness: grid.fairness(),
        slots: grid.slots(),
    }))
}
