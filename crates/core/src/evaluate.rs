use std::collections::HashMap;

use types::{GenerateSummary, ScheduleSlot, SlotStatus, TeacherId, TeacherPreference, Weekday};

/// Teacher preferences keyed by teacher id. The first record for a teacher
/// wins; duplicates are reported by [`crate::validate_preferences`].
#[derive(Clone, Debug, Default)]
pub struct PreferenceBook {
    by_teacher: HashMap<TeacherId, TeacherPreference>,
}

impl PreferenceBook {
    pub fn new(prefs: impl IntoIterator<Item = TeacherPreference>) -> Self {
        let mut by_teacher = HashMap::new();
        for p in prefs {
            by_teacher.entry(p.teacher_id.clone()).or_insert(p);
        }
        Self { by_teacher }
    }

    pub fn get(&self, teacher: &TeacherId) -> Option<&TeacherPreference> {
        self.by_teacher.get(teacher)
    }

    pub fn len(&self) -> usize {
        self.by_teacher.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_teacher.is_empty()
    }
}

/// Status of one occupied slot given its teacher's load that day.
///
/// Blocked day or overload beats everything; PREFERENCE needs both the day
/// and the period to be preferred. A teacher without preferences is never
/// in conflict.
pub fn classify(pref: Option<&TeacherPreference>, slot: &ScheduleSlot, day_load: u32) -> SlotStatus {
    let Some(pref) = pref else {
        return SlotStatus::Compromise;
    };
    if pref.blocked_days.contains(&slot.day_of_week) || day_load > pref.max_daily_sessions {
        return SlotStatus::Conflict;
    }
    if pref.preferred_days.contains(&slot.day_of_week)
        && pref.preferred_periods.contains(&slot.period)
    {
        SlotStatus::Preference
    } else {
        SlotStatus::Compromise
    }
}

/// Occupied-slot count per teacher per day.
pub fn daily_load(slots: &[ScheduleSlot]) -> HashMap<(&TeacherId, Weekday), u32> {
    let mut load = HashMap::new();
    for s in slots.iter().filter(|s| s.is_occupied()) {
        if let Some(t) = &s.teacher_id {
            *load.entry((t, s.day_of_week)).or_insert(0) += 1;
        }
    }
    load
}

/// Recomputes every slot's status from scratch. Stored statuses are ignored,
/// so evaluating an evaluated grid is a no-op.
pub fn evaluate(slots: &[ScheduleSlot], book: &PreferenceBook) -> Vec<ScheduleSlot> {
    let load = daily_load(slots);
    slots
        .iter()
        .map(|s| {
            let mut out = s.clone();
            out.status = match (&s.teacher_id, &s.subject_id) {
                (Some(t), Some(_)) => {
                    let n = load.get(&(t, s.day_of_week)).copied().unwrap_or(0);
                    classify(book.get(t), s, n)
                }
                _ => SlotStatus::Empty,
            };
            out
        })
        .collect()
}

/// Status counts over an evaluated grid. `confidence` is the rounded share of
/// occupied slots that are PREFERENCE, 0 for an empty grid.
pub fn summarize(slots: &[ScheduleSlot]) -> GenerateSummary {
    let mut sum = GenerateSummary::default();
    for s in slots {
        match s.status {
            SlotStatus::Preference => sum.preference += 1,
            SlotStatus::Compromise => sum.compromise += 1,
            SlotStatus::Conflict => sum.conflict += 1,
            SlotStatus::Empty => sum.empty += 1,
        }
    }
    let occupied = sum.preference + sum.compromise + sum.conflict;
    if occupied > 0 {
        sum.confidence = ((f64::from(sum.preference) * 100.0) / f64::from(occupied)).round() as u8;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pref(max: u32) -> TeacherPreference {
        TeacherPreference {
            teacher_id: "t".into(),
            preferred_days: vec![1, 2, 3],
            blocked_days: vec![6],
            preferred_periods: vec![1, 2],
            max_daily_sessions: max,
        }
    }

    fn slot(teacher: Option<&str>, subject: Option<&str>, day: u8, period: u8) -> ScheduleSlot {
        let mut s = ScheduleSlot::empty(&"7a".into(), day, period);
        s.teacher_id = teacher.map(TeacherId::from);
        s.subject_id = subject.map(Into::into);
        s
    }

    #[test]
    fn missing_teacher_or_subject_is_empty_whatever_was_stored() {
        let mut a = slot(Some("t"), None, 1, 1);
        a.status = SlotStatus::Preference;
        let mut b = slot(None, Some("math"), 1, 2);
        b.status = SlotStatus::Conflict;
        let out = evaluate(&[a, b], &PreferenceBook::new([pref(2)]));
        assert!(out.iter().all(|s| s.status == SlotStatus::Empty));
    }

    #[test]
    fn preference_needs_day_and_period() {
        let book = PreferenceBook::new([pref(5)]);
        let out = evaluate(
            &[
                slot(Some("t"), Some("math"), 1, 1),
                slot(Some("t"), Some("math"), 1, 5),
                slot(Some("t"), Some("math"), 4, 1),
            ],
            &book,
        );
        let statuses: Vec<_> = out.iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            [SlotStatus::Preference, SlotStatus::Compromise, SlotStatus::Compromise]
        );
    }

    #[test]
    fn blocked_day_beats_preferred_period() {
        let book = PreferenceBook::new([pref(5)]);
        let out = evaluate(&[slot(Some("t"), Some("math"), 6, 1)], &book);
        assert_eq!(out[0].status, SlotStatus::Conflict);
    }

    #[test]
    fn blocked_wins_when_day_is_also_preferred() {
        let mut p = pref(5);
        p.blocked_days.push(1);
        let out = evaluate(&[slot(Some("t"), Some("math"), 1, 1)], &PreferenceBook::new([p]));
        assert_eq!(out[0].status, SlotStatus::Conflict);
    }

    #[test]
    fn overload_marks_every_slot_that_day() {
        let book = PreferenceBook::new([pref(2)]);
        let out = evaluate(
            &[
                slot(Some("t"), Some("math"), 2, 1),
                slot(Some("t"), Some("math"), 2, 2),
                slot(Some("t"), Some("math"), 2, 3),
                slot(Some("t"), Some("math"), 3, 1),
                slot(Some("t"), None, 2, 4),
            ],
            &book,
        );
        assert!(out[..3].iter().all(|s| s.status == SlotStatus::Conflict));
        assert_eq!(out[3].status, SlotStatus::Preference);
        assert_eq!(out[4].status, SlotStatus::Empty);
    }

    #[test]
    fn unknown_teacher_defaults_to_compromise() {
        let out = evaluate(
            &[
                slot(Some("ghost"), Some("math"), 6, 1),
                slot(Some("ghost"), Some("math"), 6, 2),
                slot(Some("ghost"), Some("math"), 6, 3),
            ],
            &PreferenceBook::default(),
        );
        assert!(out.iter().all(|s| s.status == SlotStatus::Compromise));
    }

    #[test]
    fn evaluation_is_idempotent() {
        let book = PreferenceBook::new([pref(1)]);
        let grid = vec![
            slot(Some("t"), Some("math"), 1, 1),
            slot(Some("t"), Some("math"), 1, 2),
            slot(Some("t"), Some("math"), 2, 7),
            slot(None, None, 3, 3),
        ];
        let once = evaluate(&grid, &book);
        let twice = evaluate(&once, &book);
        assert_eq!(once, twice);
    }

    #[test]
    fn first_preference_record_wins() {
        let mut second = pref(9);
        second.blocked_days = vec![];
        let book = PreferenceBook::new([pref(2), second]);
        assert_eq!(book.len(), 1);
        assert_eq!(book.get(&"t".into()).map(|p| p.max_daily_sessions), Some(2));
    }

    #[test]
    fn summary_counts_and_confidence() {
        let book = PreferenceBook::new([pref(5)]);
        let out = evaluate(
            &[
                slot(Some("t"), Some("math"), 1, 1),
                slot(Some("t"), Some("math"), 1, 2),
                slot(Some("t"), Some("math"), 1, 6),
                slot(None, None, 1, 7),
            ],
            &book,
        );
        let sum = summarize(&out);
        assert_eq!((sum.preference, sum.compromise, sum.conflict, sum.empty), (2, 1, 0, 1));
        assert_eq!(sum.confidence, 67);
        assert_eq!(summarize(&[]).confidence, 0);
    }
}
