use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use utoipa::ToSchema;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Clone,
            Debug,
            Serialize,
            Deserialize,
            ToSchema,
            JsonSchema,
            Eq,
            PartialEq,
            Ord,
            PartialOrd,
            Hash,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}
id_newtype!(TeacherId);
id_newtype!(ClassId);
id_newtype!(SubjectId);
id_newtype!(TermId);
id_newtype!(MappingId);
id_newtype!(LessonId);
id_newtype!(SlotId);

/// 1 = Monday .. 6 = Saturday.
pub type Weekday = u8;
/// Teaching period within a day, 1-based.
pub type Period = u8;

pub const WEEKDAYS: RangeInclusive<Weekday> = 1..=6;
pub const PERIODS: RangeInclusive<Period> = 1..=8;

/// Canonical wall-clock interval of each period, indexed by `period - 1`.
pub const PERIOD_TIMES: [(&str, &str); 8] = [
    ("07:00", "07:45"),
    ("07:50", "08:35"),
    ("08:40", "09:25"),
    ("09:30", "10:15"),
    ("10:20", "11:05"),
    ("11:10", "11:55"),
    ("12:00", "12:45"),
    ("12:50", "13:35"),
];

pub fn period_time(period: Period) -> Option<(&'static str, &'static str)> {
    if !PERIODS.contains(&period) {
        return None;
    }
    PERIOD_TIMES.get(usize::from(period) - 1).copied()
}

pub fn in_grid(day: Weekday, period: Period) -> bool {
    WEEKDAYS.contains(&day) && PERIODS.contains(&period)
}

impl SlotId {
    pub fn derive(class_id: &ClassId, day: Weekday, period: Period) -> Self {
        SlotId(format!("{}-{}-{}", class_id.0, day, period))
    }
}

#[derive(
    Clone, Copy, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    #[default]
    Empty,
    Conflict,
    Compromise,
    Preference,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeacherPreference {
    pub teacher_id: TeacherId,
    #[schema(value_type = Vec<u8>)]
    #[serde(default)]
    pub preferred_days: Vec<Weekday>,
    #[schema(value_type = Vec<u8>)]
    #[serde(default)]
    pub blocked_days: Vec<Weekday>,
    #[schema(value_type = Vec<u8>)]
    #[serde(default)]
    pub preferred_periods: Vec<Period>,
    pub max_daily_sessions: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassSubjectMapping {
    pub id: MappingId,
    pub classroom_id: ClassId,
    pub subject_id: SubjectId,
    #[serde(default)]
    pub teacher_id: Option<TeacherId>,
    #[serde(default)]
    pub term_id: Option<TermId>,
}

/// One cell of a class's weekly grid.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSlot {
    pub id: SlotId,
    pub class_id: ClassId,
    #[schema(value_type = u8)]
    pub day_of_week: Weekday,
    #[schema(value_type = u8)]
    pub period: Period,
    #[serde(default)]
    pub teacher_id: Option<TeacherId>,
    #[serde(default)]
    pub subject_id: Option<SubjectId>,
    #[serde(default)]
    pub status: SlotStatus,
    #[serde(default)]
    pub locked: bool,
}

impl ScheduleSlot {
    pub fn empty(class_id: &ClassId, day: Weekday, period: Period) -> Self {
        Self {
            id: SlotId::derive(class_id, day, period),
            class_id: class_id.clone(),
            day_of_week: day,
            period,
            teacher_id: None,
            subject_id: None,
            status: SlotStatus::Empty,
            locked: false,
        }
    }

    /// Teacher and subject both present; independent of the stored status.
    pub fn is_occupied(&self) -> bool {
        self.teacher_id.is_some() && self.subject_id.is_some()
    }
}

/// Free-form lesson entry, not bound to the period grid.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LessonRecord {
    pub id: LessonId,
    pub class_subject_mapping_id: MappingId,
    #[schema(value_type = u8)]
    pub day_of_week: Weekday,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub room: String,
}

/// A pair of lessons double-booking at least one resource.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LessonConflict {
    pub first: LessonId,
    pub second: LessonId,
    #[schema(value_type = u8)]
    pub day_of_week: Weekday,
    pub same_class: bool,
    pub same_teacher: bool,
    pub same_room: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FairnessEntry {
    pub teacher_id: TeacherId,
    pub days_count: u32,
    pub session_count: u32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSummary {
    #[serde(default)]
    pub preference: u32,
    #[serde(default)]
    pub compromise: u32,
    #[serde(default)]
    pub conflict: u32,
    #[serde(default)]
    pub empty: u32,
    /// Share of occupied slots in PREFERENCE status, 0..=100.
    #[serde(default)]
    pub confidence: u8,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub class_id: ClassId,
    pub term_id: TermId,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub slots: Vec<ScheduleSlot>,
    #[serde(default)]
    pub summary: GenerateSummary,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub class_id: ClassId,
    pub slots: Vec<ScheduleSlot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_ids_are_derived_from_class_day_and_period() {
        let class = ClassId::from("7a");
        assert_eq!(SlotId::derive(&class, 3, 5).0, "7a-3-5");
        assert_eq!(ScheduleSlot::empty(&class, 3, 5).id, SlotId::derive(&class, 3, 5));
    }

    #[test]
    fn period_times_start_at_seven() {
        assert_eq!(period_time(1), Some(("07:00", "07:45")));
        assert_eq!(period_time(8), Some(("12:50", "13:35")));
        assert_eq!(period_time(0), None);
        assert_eq!(period_time(9), None);
    }

    #[test]
    fn slot_json_uses_camel_case_and_defaults() {
        let slot: ScheduleSlot = serde_json::from_value(serde_json::json!({
            "id": "7a-1-1",
            "classId": "7a",
            "dayOfWeek": 1,
            "period": 1
        }))
        .unwrap();
        assert_eq!(slot.status, SlotStatus::Empty);
        assert!(!slot.locked);
        assert!(!slot.is_occupied());

        let v = serde_json::to_value(SlotStatus::Compromise).unwrap();
        assert_eq!(v, serde_json::json!("COMPROMISE"));
    }
}
