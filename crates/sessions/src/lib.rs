use async_trait::async_trait;
use parking_lot::RwLock;
use sched_core::{
    find_conflicts, lessons_from_slots, validate_preferences, GridError, GridState,
    ScheduleGenerator, ScheduleStore, ValidationError,
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};
use types::{
    ClassId, ClassSubjectMapping, FairnessEntry, GenerateRequest, GenerateSummary, LessonConflict,
    Period, SaveRequest, ScheduleSlot, SubjectId, TeacherId, TeacherPreference, TermId, Weekday,
};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct SessionId(pub String);

#[derive(Clone, Debug, serde::Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenSession {
    pub class_id: ClassId,
    pub term_id: TermId,
    #[serde(default)]
    pub preferences: Vec<TeacherPreference>,
    #[serde(default)]
    pub mappings: Vec<ClassSubjectMapping>,
    /// Previously saved grid, if any.
    #[serde(default)]
    pub slots: Vec<ScheduleSlot>,
}

/// What the console renders for one editing session.
#[derive(Clone, Debug, serde::Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GridView {
    pub session_id: String,
    pub class_id: ClassId,
    pub term_id: TermId,
    pub slots: Vec<ScheduleSlot>,
    pub summary: GenerateSummary,
    pub generated: Option<GenerateSummary>,
    pub fairness: Vec<FairnessEntry>,
    /// Workload of every teacher mapped to the class, idle ones at zero.
    pub roster: Vec<FairnessEntry>,
}

impl GridView {
    pub fn of(id: &str, grid: &GridState) -> Self {
        let slots = grid.slots();
        Self {
            session_id: id.to_string(),
            class_id: grid.class_id().clone(),
            term_id: grid.term_id().clone(),
            summary: sched_core::summarize(&slots),
            fairness: sched_core::compute_fairness(&slots),
            roster: grid.roster(),
            generated: grid.generated_summary().cloned(),
            slots,
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session {0} not found")]
    NotFound(String),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("generate failed: {0}")]
    Generate(String),
    #[error("save failed: {0}")]
    Save(String),
}

/// Editing sessions keyed by id, one class grid each. Collaborator calls are
/// made without holding the map lock; a failed call leaves the grid as it was.
pub struct InMemSessions<G: ScheduleGenerator, S: ScheduleStore> {
    inner: Arc<RwLock<HashMap<String, GridState>>>,
    generator: Arc<G>,
    store: Arc<S>,
}

impl<G: ScheduleGenerator, S: ScheduleStore> InMemSessions<G, S> {
    pub fn new(generator: G, store: S) -> Self {
        Self {
            inner: Default::default(),
            generator: Arc::new(generator),
            store: Arc::new(store),
        }
    }

    pub fn open(&self, req: OpenSession) -> Result<SessionId, SessionError> {
        validate_preferences(&req.preferences)?;
        let id = Uuid::new_v4().to_string();
        let grid = GridState::from_slots(
            req.class_id,
            req.term_id,
            req.preferences,
            req.mappings,
            req.slots,
        );
        info!(session = %id, class = %grid.class_id(), term = %grid.term_id(), "session opened");
        self.inner.write().insert(id.clone(), grid);
        Ok(SessionId(id))
    }

    pub fn view(&self, id: &str) -> Result<GridView, SessionError> {
        let r = self.inner.read();
        let grid = r.get(id).ok_or_else(|| SessionError::NotFound(id.into()))?;
        Ok(GridView::of(id, grid))
    }

    pub fn close(&self, id: &str) -> Result<(), SessionError> {
        if self.inner.write().remove(id).is_none() {
            return Err(SessionError::NotFound(id.into()));
        }
        info!(session = %id, "session closed");
        Ok(())
    }

    pub fn assign(
        &self,
        id: &str,
        teacher: TeacherId,
        subject: Option<SubjectId>,
        day: Weekday,
        period: Period,
    ) -> Result<GridView, SessionError> {
        self.mutate(id, |g| match subject {
            Some(subject) => g.assign_subject(teacher, subject, day, period).map(drop),
            None => g.assign(teacher, day, period).map(drop),
        })
    }

    pub fn clear(&self, id: &str, day: Weekday, period: Period) -> Result<GridView, SessionError> {
        self.mutate(id, |g| g.clear(day, period).map(drop))
    }

    pub fn toggle_lock(
        &self,
        id: &str,
        day: Weekday,
        period: Period,
    ) -> Result<GridView, SessionError> {
        self.mutate(id, |g| g.toggle_lock(day, period).map(drop))
    }

    /// Double bookings across the grids of several sessions, each occupied
    /// cell taken at its period's clock time.
    pub fn conflicts(&self, ids: &[String]) -> Result<Vec<LessonConflict>, SessionError> {
        let r = self.inner.read();
        let mut lessons = Vec::new();
        let mut mappings = Vec::new();
        for id in ids {
            let grid = r.get(id).ok_or_else(|| SessionError::NotFound(id.clone()))?;
            let slots = grid.slots();
            lessons.extend(lessons_from_slots(grid.class_id(), &slots, grid.mappings()));
            mappings.extend_from_slice(grid.mappings());
        }
        let found = find_conflicts(&lessons, &mappings);
        info!(
            sessions = ids.len(),
            lessons = lessons.len(),
            conflicts = found.len(),
            "cross-session check"
        );
        Ok(found)
    }

    /// Asks the generator for a full grid and swaps it in.
    pub async fn generate(&self, id: &str) -> Result<GridView, SessionError> {
        let req = {
            let r = self.inner.read();
            let grid = r.get(id).ok_or_else(|| SessionError::NotFound(id.into()))?;
            GenerateRequest {
                class_id: grid.class_id().clone(),
                term_id: grid.term_id().clone(),
            }
        };

        let resp = match self.generator.generate(req).await {
            Ok(resp) => resp,
            Err(e) => {
                error!(?e, session = %id, "generate failed");
                return Err(SessionError::Generate(format!("{e:#}")));
            }
        };

        let mut w = self.inner.write();
        let grid = w
            .get_mut(id)
            .ok_or_else(|| SessionError::NotFound(id.into()))?;
        grid.replace(resp);
        info!(session = %id, confidence = ?grid.generated_summary().map(|s| s.confidence), "grid generated");
        Ok(GridView::of(id, grid))
    }

    /// Sends the current grid to the store as-is.
    pub async fn save(&self, id: &str) -> Result<GridView, SessionError> {
        let (req, view) = {
            let r = self.inner.read();
            let grid = r.get(id).ok_or_else(|| SessionError::NotFound(id.into()))?;
            (grid.save_request(), GridView::of(id, grid))
        };
        if let Err(e) = self.store.save(req).await {
            error!(?e, session = %id, "save failed");
            return Err(SessionError::Save(format!("{e:#}")));
        }
        info!(session = %id, "grid saved");
        Ok(view)
    }

    fn mutate(
        &self,
        id: &str,
        f: impl FnOnce(&mut GridState) -> Result<(), GridError>,
    ) -> Result<GridView, SessionError> {
        let mut w = self.inner.write();
        let grid = w
            .get_mut(id)
            .ok_or_else(|| SessionError::NotFound(id.into()))?;
        f(grid)?;
        Ok(GridView::of(id, grid))
    }
}

/// Keeps the last saved grid per class in memory.
#[derive(Default)]
pub struct InMemStore {
    saved: RwLock<HashMap<ClassId, Vec<ScheduleSlot>>>,
}

impl InMemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_saved(&self, class: &ClassId) -> Option<Vec<ScheduleSlot>> {
        self.saved.read().get(class).cloned()
    }
}

#[async_trait]
impl ScheduleStore for InMemStore {
    async fn save(&self, req: SaveRequest) -> anyhow::Result<()> {
        self.saved.write().insert(req.class_id, req.slots);
        Ok(())
    }
}
