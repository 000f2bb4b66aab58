use std::collections::{BTreeMap, BTreeSet};

use types::{FairnessEntry, ScheduleSlot, SlotStatus, TeacherId, Weekday};

/// Per-teacher distinct teaching days and session totals over an evaluated
/// grid. Teachers without a non-EMPTY slot are left out; entries are ordered
/// by teacher id.
pub fn compute_fairness(slots: &[ScheduleSlot]) -> Vec<FairnessEntry> {
    let mut acc: BTreeMap<&TeacherId, (BTreeSet<Weekday>, u32)> = BTreeMap::new();
    for s in slots.iter().filter(|s| s.status != SlotStatus::Empty) {
        let Some(t) = &s.teacher_id else { continue };
        let (days, sessions) = acc.entry(t).or_default();
        days.insert(s.day_of_week);
        *sessions += 1;
    }
    acc.into_iter()
        .map(|(t, (days, sessions))| FairnessEntry {
            teacher_id: t.clone(),
            days_count: days.len() as u32,
            session_count: sessions,
        })
        .collect()
}

/// Roster view: one entry per listed teacher, zero-filled when absent from
/// `entries`, followed by any entry whose teacher is not on the roster.
pub fn roster(entries: &[FairnessEntry], teachers: &[TeacherId]) -> Vec<FairnessEntry> {
    let mut out: Vec<FairnessEntry> = teachers
        .iter()
        .map(|t| {
            entries
                .iter()
                .find(|e| &e.teacher_id == t)
                .cloned()
                .unwrap_or_else(|| FairnessEntry {
                    teacher_id: t.clone(),
                    days_count: 0,
                    session_count: 0,
                })
        })
        .collect();
    out.extend(
        entries
            .iter()
            .filter(|e| !teachers.contains(&e.teacher_id))
            .cloned(),
    );
    out
}
