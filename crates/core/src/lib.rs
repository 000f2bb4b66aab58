pub mod conflicts;
pub mod evaluate;
pub mod fairness;
pub mod grid;
pub mod time;

use async_trait::async_trait;
use thiserror::Error;

pub use conflicts::{detect_conflicts, find_conflicts, lessons_from_slots};
pub use evaluate::{evaluate, summarize, PreferenceBook};
pub use fairness::{compute_fairness, roster};
pub use grid::{GridError, GridState};
pub use types::{
    ClassId, ClassSubjectMapping, GenerateRequest, GenerateResponse, GenerateSummary, LessonConflict,
    LessonRecord, SaveRequest, ScheduleSlot, SlotStatus, TeacherPreference,
};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid input: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

impl ValidationError {
    /// Individual problems, in the order they were found.
    pub fn messages(&self) -> Vec<String> {
        match self {
            ValidationError::Invalid(errors) => errors.clone(),
        }
    }
}

fn chk_unique<I: ToString>(name: &str, ids: impl Iterator<Item = I>, errors: &mut Vec<String>) {
    use std::collections::HashSet;
    let mut seen = HashSet::new();
    for id in ids {
        let s = id.to_string();
        if !seen.insert(s.clone()) {
            errors.push(format!("duplicate {name} id: {s}"));
        }
    }
}

fn finish(errors: Vec<String>) -> Result<(), ValidationError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Invalid(errors))
    }
}

/// Call-site checks for lesson records before they reach the conflict
/// detector, whose time parser silently maps bad input to midnight.
pub fn validate_lessons(lessons: &[LessonRecord]) -> Result<(), ValidationError> {
    let mut errors: Vec<String> = Vec::new();

    chk_unique("lesson", lessons.iter().map(|l| &l.id.0), &mut errors);

    for l in lessons {
        if !types::WEEKDAYS.contains(&l.day_of_week) {
            errors.push(format!(
                "lesson {} has invalid dayOfWeek {}",
                l.id, l.day_of_week
            ));
        }
        let mut times_ok = true;
        for (field, value) in [("startTime", &l.start_time), ("endTime", &l.end_time)] {
            if !time::is_valid_hhmm(value) {
                errors.push(format!("lesson {} has malformed {field} {value:?}", l.id));
                times_ok = false;
            }
        }
        if times_ok
            && time::parse_time_to_minutes(&l.start_time) >= time::parse_time_to_minutes(&l.end_time)
        {
            errors.push(format!(
                "lesson {} does not end after it starts ({}-{})",
                l.id, l.start_time, l.end_time
            ));
        }
    }

    finish(errors)
}

/// Sanity checks on the preference feed. A day listed as both preferred and
/// blocked is accepted; blocked takes precedence during evaluation.
pub fn validate_preferences(prefs: &[TeacherPreference]) -> Result<(), ValidationError> {
    let mut errors: Vec<String> = Vec::new();

    chk_unique("teacher", prefs.iter().map(|p| &p.teacher_id.0), &mut errors);

    for p in prefs {
        if p.max_daily_sessions == 0 {
            errors.push(format!("teacher {} has maxDailySessions=0", p.teacher_id));
        }
        for d in p.preferred_days.iter().chain(&p.blocked_days) {
            if !types::WEEKDAYS.contains(d) {
                errors.push(format!("teacher {} references invalid day {d}", p.teacher_id));
            }
        }
        for period in &p.preferred_periods {
            if !types::PERIODS.contains(period) {
                errors.push(format!(
                    "teacher {} references invalid period {period}",
                    p.teacher_id
                ));
            }
        }
    }

    finish(errors)
}

/// Grid snapshot checks: one slot per cell, inside the weekly grid, all
/// belonging to `class_id`.
pub fn validate_slots(class_id: &ClassId, slots: &[ScheduleSlot]) -> Result<(), ValidationError> {
    let mut errors: Vec<String> = Vec::new();

    chk_unique(
        "cell",
        slots.iter().map(|s| format!("{}/{}", s.day_of_week, s.period)),
        &mut errors,
    );

    for s in slots {
        if !types::in_grid(s.day_of_week, s.period) {
            errors.push(format!(
                "slot {} is outside the weekly grid (day {} period {})",
                s.id, s.day_of_week, s.period
            ));
        }
        if &s.class_id != class_id {
            errors.push(format!("slot {} belongs to class {}, not {class_id}", s.id, s.class_id));
        }
    }

    finish(errors)
}

/// Remote timetable solver. Its result replaces a grid wholesale.
#[async_trait]
pub trait ScheduleGenerator: Send + Sync + 'static {
    async fn generate(&self, req: GenerateRequest) -> anyhow::Result<GenerateResponse>;
}

/// Persistence for a finished class grid.
#[async_trait]
pub trait ScheduleStore: Send + Sync + 'static {
    async fn save(&self, req: SaveRequest) -> anyhow::Result<()>;
}

#[async_trait]
impl<T: ScheduleGenerator> ScheduleGenerator for std::sync::Arc<T> {
    async fn generate(&self, req: GenerateRequest) -> anyhow::Result<GenerateResponse> {
        (**self).generate(req).await
    }
}

#[async_trait]
impl<T: ScheduleStore> ScheduleStore for std::sync::Arc<T> {
    async fn save(&self, req: SaveRequest) -> anyhow::Result<()> {
        (**self).save(req).await
    }
}
