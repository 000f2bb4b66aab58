//! Editable weekly grid of one class in one term.
//!
//! Every mutation that changes teacher or subject re-runs [`evaluate`] over
//! the whole grid before returning. Locks are advisory: they are stored and
//! reported but never refuse a write.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, warn};
use types::{
    in_grid, ClassId, ClassSubjectMapping, FairnessEntry, GenerateResponse, GenerateSummary,
    Period, SaveRequest, ScheduleSlot, SlotId, SlotStatus, SubjectId, TeacherId, TeacherPreference,
    TermId, Weekday, PERIODS, WEEKDAYS,
};

use crate::evaluate::{evaluate, summarize, PreferenceBook};
use crate::fairness::{compute_fairness, roster};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("slot day {day} period {period} is outside the weekly grid")]
    OutOfRange { day: Weekday, period: Period },
}

#[derive(Clone, Debug)]
pub struct GridState {
    class_id: ClassId,
    term_id: TermId,
    cells: BTreeMap<(Weekday, Period), ScheduleSlot>,
    book: PreferenceBook,
    mappings: Vec<ClassSubjectMapping>,
    generated: Option<GenerateSummary>,
}

fn check(day: Weekday, period: Period) -> Result<(), GridError> {
    if in_grid(day, period) {
        Ok(())
    } else {
        Err(GridError::OutOfRange { day, period })
    }
}

impl GridState {
    pub fn new(
        class_id: ClassId,
        term_id: TermId,
        preferences: Vec<TeacherPreference>,
        mappings: Vec<ClassSubjectMapping>,
    ) -> Self {
        Self {
            class_id,
            term_id,
            cells: BTreeMap::new(),
            book: PreferenceBook::new(preferences),
            mappings,
            generated: None,
        }
    }

    /// Seeds the grid with previously saved slots. Cells outside the grid
    /// are dropped; a repeated cell keeps the last copy.
    pub fn from_slots(
        class_id: ClassId,
        term_id: TermId,
        preferences: Vec<TeacherPreference>,
        mappings: Vec<ClassSubjectMapping>,
        slots: Vec<ScheduleSlot>,
    ) -> Self {
        let mut grid = Self::new(class_id, term_id, preferences, mappings);
        grid.load(slots);
        grid
    }

    pub fn class_id(&self) -> &ClassId {
        &self.class_id
    }

    pub fn term_id(&self) -> &TermId {
        &self.term_id
    }

    pub fn mappings(&self) -> &[ClassSubjectMapping] {
        &self.mappings
    }

    /// Teachers mapped to this class, in mapping order, without repeats.
    pub fn mapped_teachers(&self) -> Vec<TeacherId> {
        let mut out: Vec<TeacherId> = Vec::new();
        for t in self
            .mappings
            .iter()
            .filter(|m| m.classroom_id == self.class_id)
            .filter_map(|m| m.teacher_id.as_ref())
        {
            if !out.contains(t) {
                out.push(t.clone());
            }
        }
        out
    }

    /// Slot at `(day, period)`; an EMPTY slot is synthesized when none is stored.
    pub fn slot(&self, day: Weekday, period: Period) -> Result<ScheduleSlot, GridError> {
        check(day, period)?;
        Ok(self
            .cells
            .get(&(day, period))
            .cloned()
            .unwrap_or_else(|| ScheduleSlot::empty(&self.class_id, day, period)))
    }

    /// All 48 cells, day-major.
    pub fn slots(&self) -> Vec<ScheduleSlot> {
        let mut out = Vec::with_capacity(WEEKDAYS.len() * PERIODS.len());
        for day in WEEKDAYS {
            for period in PERIODS {
                out.push(
                    self.cells
                        .get(&(day, period))
                        .cloned()
                        .unwrap_or_else(|| ScheduleSlot::empty(&self.class_id, day, period)),
                );
            }
        }
        out
    }

    /// Puts `teacher` into the slot with the subject from the teacher's first
    /// mapping for this class. A teacher taught several subjects in the class
    /// always resolves to the first; use [`GridState::assign_subject`] to pick.
    pub fn assign(
        &mut self,
        teacher: TeacherId,
        day: Weekday,
        period: Period,
    ) -> Result<ScheduleSlot, GridError> {
        let subject = self.subject_for(&teacher);
        if subject.is_none() {
            warn!(class = %self.class_id, %teacher, "teacher has no subject mapping for class");
        }
        self.put(teacher, subject, day, period)
    }

    pub fn assign_subject(
        &mut self,
        teacher: TeacherId,
        subject: SubjectId,
        day: Weekday,
        period: Period,
    ) -> Result<ScheduleSlot, GridError> {
        self.put(teacher, Some(subject), day, period)
    }

    /// Empties the slot and drops its lock.
    pub fn clear(&mut self, day: Weekday, period: Period) -> Result<ScheduleSlot, GridError> {
        check(day, period)?;
        let cell = self.cell_mut(day, period);
        cell.teacher_id = None;
        cell.subject_id = None;
        cell.status = SlotStatus::Empty;
        cell.locked = false;
        self.reevaluate();
        self.slot(day, period)
    }

    /// Flips the lock flag only; classification is untouched.
    pub fn toggle_lock(&mut self, day: Weekday, period: Period) -> Result<bool, GridError> {
        check(day, period)?;
        let cell = self.cell_mut(day, period);
        cell.locked = !cell.locked;
        Ok(cell.locked)
    }

    /// Replaces the grid wholesale with a generator result and keeps its
    /// summary for display.
    pub fn replace(&mut self, response: GenerateResponse) {
        self.cells.clear();
        self.load(response.slots);
        self.generated = Some(response.summary);
    }

    pub fn fairness(&self) -> Vec<FairnessEntry> {
        compute_fairness(&self.slots())
    }

    /// Workload of every teacher mapped to the class, idle ones included.
    pub fn roster(&self) -> Vec<FairnessEntry> {
        roster(&self.fairness(), &self.mapped_teachers())
    }

    /// Live status counts for the current grid.
    pub fn summary(&self) -> GenerateSummary {
        summarize(&self.slots())
    }

    /// Summary returned by the last generate call, verbatim.
    pub fn generated_summary(&self) -> Option<&GenerateSummary> {
        self.generated.as_ref()
    }

    pub fn save_request(&self) -> SaveRequest {
        SaveRequest {
            class_id: self.class_id.clone(),
            slots: self.slots(),
        }
    }

    fn subject_for(&self, teacher: &TeacherId) -> Option<SubjectId> {
        self.mappings
            .iter()
            .find(|m| m.classroom_id == self.class_id && m.teacher_id.as_ref() == Some(teacher))
            .map(|m| m.subject_id.clone())
    }

    fn put(
        &mut self,
        teacher: TeacherId,
        subject: Option<SubjectId>,
        day: Weekday,
        period: Period,
    ) -> Result<ScheduleSlot, GridError> {
        check(day, period)?;
        let cell = self.cell_mut(day, period);
        cell.teacher_id = Some(teacher);
        cell.subject_id = subject;
        self.reevaluate();
        self.slot(day, period)
    }

    fn load(&mut self, slots: Vec<ScheduleSlot>) {
        for s in slots {
            if !in_grid(s.day_of_week, s.period) {
                warn!(
                    class = %self.class_id,
                    day = s.day_of_week,
                    period = s.period,
                    "dropping slot outside the weekly grid"
                );
                continue;
            }
            let key = (s.day_of_week, s.period);
            let slot = ScheduleSlot {
                id: SlotId::derive(&self.class_id, key.0, key.1),
                class_id: self.class_id.clone(),
                ..s
            };
            if self.cells.insert(key, slot).is_some() {
                warn!(
                    class = %self.class_id,
                    day = key.0,
                    period = key.1,
                    "duplicate slot replaces earlier cell"
                );
            }
        }
        self.reevaluate();
    }

    fn cell_mut(&mut self, day: Weekday, period: Period) -> &mut ScheduleSlot {
        let class_id = &self.class_id;
        self.cells
            .entry((day, period))
            .or_insert_with(|| ScheduleSlot::empty(class_id, day, period))
    }

    fn reevaluate(&mut self) {
        let current: Vec<ScheduleSlot> = self.cells.values().cloned().collect();
        for s in evaluate(&current, &self.book) {
            self.cells.insert((s.day_of_week, s.period), s);
        }
        debug!(class = %self.class_id, cells = self.cells.len(), "grid re-evaluated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridState {
        GridState::new(
            "7a".into(),
            "2026-fall".into(),
            vec![TeacherPreference {
                teacher_id: "t".into(),
                preferred_days: vec![1, 2, 3],
                blocked_days: vec![6],
                preferred_periods: vec![1, 2],
                max_daily_sessions: 2,
            }],
            vec![
                ClassSubjectMapping {
                    id: "m-other".into(),
                    classroom_id: "7b".into(),
                    subject_id: "art".into(),
                    teacher_id: Some("t".into()),
                    term_id: None,
                },
                ClassSubjectMapping {
                    id: "m1".into(),
                    classroom_id: "7a".into(),
                    subject_id: "math".into(),
                    teacher_id: Some("t".into()),
                    term_id: None,
                },
                ClassSubjectMapping {
                    id: "m2".into(),
                    classroom_id: "7a".into(),
                    subject_id: "physics".into(),
                    teacher_id: Some("t".into()),
                    term_id: None,
                },
            ],
        )
    }

    #[test]
    fn unseen_cells_read_as_empty() {
        let g = grid();
        let s = g.slot(4, 8).unwrap();
        assert_eq!(s.id.0, "7a-4-8");
        assert_eq!(s.status, SlotStatus::Empty);
        assert_eq!(g.slots().len(), 48);
        assert_eq!(g.slot(7, 1), Err(GridError::OutOfRange { day: 7, period: 1 }));
        assert_eq!(g.slot(1, 0), Err(GridError::OutOfRange { day: 1, period: 0 }));
    }

    #[test]
    fn assign_takes_first_mapping_of_this_class() {
        let mut g = grid();
        let s = g.assign("t".into(), 1, 1).unwrap();
        assert_eq!(s.subject_id, Some(SubjectId::from("math")));
        assert_eq!(s.status, SlotStatus::Preference);

        let s = g.assign_subject("t".into(), "physics".into(), 1, 2).unwrap();
        assert_eq!(s.subject_id, Some(SubjectId::from("physics")));
    }

    #[test]
    fn unmapped_teacher_leaves_slot_empty() {
        let mut g = grid();
        let s = g.assign("stranger".into(), 2, 2).unwrap();
        assert_eq!(s.teacher_id, Some(TeacherId::from("stranger")));
        assert_eq!(s.subject_id, None);
        assert_eq!(s.status, SlotStatus::Empty);
    }

    #[test]
    fn clear_unlocks_and_empties() {
        let mut g = grid();
        g.assign("t".into(), 2, 1).unwrap();
        assert!(g.toggle_lock(2, 1).unwrap());
        let s = g.slot(2, 1).unwrap();
        assert!(s.locked);
        assert_eq!(s.status, SlotStatus::Preference);

        let s = g.clear(2, 1).unwrap();
        assert!(!s.locked);
        assert_eq!(s.status, SlotStatus::Empty);
        assert_eq!(s.teacher_id, None);
    }

    #[test]
    fn locked_slot_still_accepts_assignment() {
        let mut g = grid();
        g.toggle_lock(3, 5).unwrap();
        let s = g.assign("t".into(), 3, 5).unwrap();
        assert!(s.locked);
        assert_eq!(s.status, SlotStatus::Compromise);
    }

    #[test]
    fn clearing_relieves_overload() {
        let mut g = grid();
        for p in 1..=3 {
            g.assign("t".into(), 2, p).unwrap();
        }
        assert_eq!(g.slot(2, 1).unwrap().status, SlotStatus::Conflict);
        g.clear(2, 3).unwrap();
        assert_eq!(g.slot(2, 1).unwrap().status, SlotStatus::Preference);
        assert_eq!(g.slot(2, 2).unwrap().status, SlotStatus::Preference);
    }

    #[test]
    fn replace_swaps_grid_and_keeps_summary() {
        let mut g = grid();
        g.assign("t".into(), 1, 1).unwrap();

        let mut generated = ScheduleSlot::empty(&"7a".into(), 6, 2);
        generated.teacher_id = Some("t".into());
        generated.subject_id = Some("math".into());
        generated.status = SlotStatus::Preference;
        let stray = ScheduleSlot::empty(&"7a".into(), 9, 9);
        let summary = GenerateSummary {
            preference: 1,
            confidence: 100,
            ..GenerateSummary::default()
        };
        g.replace(GenerateResponse {
            slots: vec![generated, stray],
            summary: summary.clone(),
        });

        assert_eq!(g.slot(1, 1).unwrap().status, SlotStatus::Empty);
        assert_eq!(g.slot(6, 2).unwrap().status, SlotStatus::Conflict);
        assert_eq!(g.generated_summary(), Some(&summary));
        assert_eq!(g.summary().conflict, 1);
        assert_eq!(g.slots().len(), 48);
    }

    #[test]
    fn loaded_slots_are_rekeyed_to_this_class() {
        let mut foreign = ScheduleSlot::empty(&"9z".into(), 2, 3);
        foreign.teacher_id = Some("t".into());
        foreign.subject_id = Some("math".into());
        let mut later = foreign.clone();
        later.subject_id = Some("physics".into());
        let g = GridState::from_slots(
            "7a".into(),
            "2026-fall".into(),
            vec![],
            vec![],
            vec![foreign, later],
        );

        let s = g.slot(2, 3).unwrap();
        assert_eq!(s.id.0, "7a-2-3");
        assert_eq!(s.class_id.0, "7a");
        assert_eq!(s.subject_id, Some(SubjectId::from("physics")));
        let req = g.save_request();
        assert!(req.slots.iter().all(|s| s.class_id.0 == "7a"));
        assert_eq!(req.slots.iter().filter(|s| s.is_occupied()).count(), 1);
    }

    #[test]
    fn roster_lists_idle_mapped_teachers() {
        let mut g = grid();
        g.mappings.push(ClassSubjectMapping {
            id: "m3".into(),
            classroom_id: "7a".into(),
            subject_id: "music".into(),
            teacher_id: Some("u".into()),
            term_id: None,
        });
        g.assign("t".into(), 1, 1).unwrap();
        let r = g.roster();
        assert_eq!(r.len(), 2);
        assert_eq!((r[0].teacher_id.0.as_str(), r[0].session_count), ("t", 1));
        assert_eq!((r[1].teacher_id.0.as_str(), r[1].session_count), ("u", 0));
    }

    #[test]
    fn save_request_carries_full_grid() {
        let mut g = grid();
        g.assign("t".into(), 1, 1).unwrap();
        let req = g.save_request();
        assert_eq!(req.class_id.0, "7a");
        assert_eq!(req.slots.len(), 48);
        assert_eq!(req.slots[0].teacher_id, Some(TeacherId::from("t")));
    }
}
