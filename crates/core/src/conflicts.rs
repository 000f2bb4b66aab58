//! Pairwise double-booking detection over free-form lesson records.
//!
//! Two lessons conflict when they fall on the same day, their half-open
//! time windows overlap, and they share at least one of class, teacher
//! or room. Class and teacher come from the lesson's class-subject mapping;
//! a lesson whose mapping cannot be resolved can only clash by room.

use std::collections::{BTreeMap, HashMap};

use types::{
    period_time, ClassId, ClassSubjectMapping, LessonConflict, LessonId, LessonRecord, MappingId,
    ScheduleSlot, TeacherId, Weekday,
};

use crate::time::{intervals_overlap, parse_time_to_minutes};

struct Resolved<'a> {
    lesson: &'a LessonRecord,
    class: Option<&'a ClassId>,
    teacher: Option<&'a TeacherId>,
    start: u32,
    end: u32,
}

/// Number of conflicting lesson pairs.
pub fn detect_conflicts(lessons: &[LessonRecord], mappings: &[ClassSubjectMapping]) -> usize {
    find_conflicts(lessons, mappings).len()
}

/// Every conflicting unordered pair, grouped by day then input order.
pub fn find_conflicts(
    lessons: &[LessonRecord],
    mappings: &[ClassSubjectMapping],
) -> Vec<LessonConflict> {
    let by_id: HashMap<&MappingId, &ClassSubjectMapping> =
        mappings.iter().map(|m| (&m.id, m)).collect();

    let mut days: BTreeMap<Weekday, Vec<Resolved>> = BTreeMap::new();
    for lesson in lessons {
        let mapping = by_id.get(&lesson.class_subject_mapping_id).copied();
        days.entry(lesson.day_of_week).or_default().push(Resolved {
            lesson,
            class: mapping.map(|m| &m.classroom_id),
            teacher: mapping
                .and_then(|m| m.teacher_id.as_ref())
                .filter(|t| !t.0.is_empty()),
            start: parse_time_to_minutes(&lesson.start_time),
            end: parse_time_to_minutes(&lesson.end_time),
        });
    }

    let mut out = Vec::new();
    for (day, bucket) in &days {
        for (i, a) in bucket.iter().enumerate() {
            for b in &bucket[i + 1..] {
                let same_class = matches!((a.class, b.class), (Some(x), Some(y)) if x == y);
                let same_teacher = matches!((a.teacher, b.teacher), (Some(x), Some(y)) if x == y);
                let same_room = !a.lesson.room.is_empty() && a.lesson.room == b.lesson.room;
                if !(same_class || same_teacher || same_room) {
                    continue;
                }
                if intervals_overlap(a.start, a.end, b.start, b.end) {
                    out.push(LessonConflict {
                        first: a.lesson.id.clone(),
                        second: b.lesson.id.clone(),
                        day_of_week: *day,
                        same_class,
                        same_teacher,
                        same_room,
                    });
                }
            }
        }
    }
    out
}

/// Projects a class grid onto lesson records so several class grids can be
/// checked together. Each occupied slot becomes one lesson at its period's
/// canonical time; the mapping is looked up by class, subject and teacher
/// and left empty when none matches.
pub fn lessons_from_slots(
    class_id: &ClassId,
    slots: &[ScheduleSlot],
    mappings: &[ClassSubjectMapping],
) -> Vec<LessonRecord> {
    slots
        .iter()
        .filter(|s| s.is_occupied())
        .filter_map(|s| {
            let (start, end) = period_time(s.period)?;
            let mapping_id = mappings
                .iter()
                .find(|m| {
                    &m.classroom_id == class_id
                        && Some(&m.subject_id) == s.subject_id.as_ref()
                        && m.teacher_id == s.teacher_id
                })
                .map(|m| m.id.clone())
                .unwrap_or_else(|| MappingId(String::new()));
            Some(LessonRecord {
                id: LessonId(s.id.0.clone()),
                class_subject_mapping_id: mapping_id,
                day_of_week: s.day_of_week,
                start_time: start.to_string(),
                end_time: end.to_string(),
                room: String::new(),
            })
        })
        .collect()
}
