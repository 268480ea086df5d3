//! Auto-scheduling data types: proposed plans, unresolved entries and
//! confirmation outcomes.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::api::{FacultyId, LectureId, ModuleId};
use crate::models::lecture::DeliveryMode;
use crate::models::time::hhmm;
use crate::routes::conflicts::Conflict;

/// One proposed lecture placement in a schedule preview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedLecture {
    pub module_id: Option<ModuleId>,
    pub module_title: String,
    /// Week number within the semester (always 1-13 for accepted placements).
    pub week_number: i32,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub mode: DeliveryMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    /// Human-readable topic, `"<module title> - Week <n>"`.
    pub topic: String,
    pub faculty_id: FacultyId,
}

/// Why a module week could not be placed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// Absolute week number would fall past week 13.
    ExceedsTeachingPeriod,
    /// Both search phases found every candidate slot occupied.
    NoAvailableTimeSlots,
}

impl std::fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnresolvedReason::ExceedsTeachingPeriod => write!(f, "exceeds teaching period"),
            UnresolvedReason::NoAvailableTimeSlots => write!(f, "no available time slots"),
        }
    }
}

/// A module week the auto-scheduler could not place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnresolvedSlot {
    pub module_id: Option<ModuleId>,
    pub module_title: String,
    pub week_number: i32,
    pub reason: UnresolvedReason,
}

/// Result of a schedule proposal: best-effort placements plus everything the
/// search could not resolve. Never a partial failure - both lists are always
/// returned together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulePlan {
    pub placements: Vec<PlannedLecture>,
    pub unresolved: Vec<UnresolvedSlot>,
}

impl SchedulePlan {
    pub fn is_fully_resolved(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Per-module duration breakdown attached to capacity errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleLoad {
    pub module_id: Option<ModuleId>,
    pub title: String,
    pub sequence: i32,
    pub duration_weeks: i32,
}

/// Result of a schedule confirmation.
///
/// Either every placement was written (`lectures_created` ids) or blocking
/// conflicts were found and nothing was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmOutcome {
    pub success: bool,
    pub lectures_created: Vec<LectureId>,
    pub conflicts: Vec<Conflict>,
}

impl ConfirmOutcome {
    pub fn created(ids: Vec<LectureId>) -> Self {
        Self {
            success: true,
            lectures_created: ids,
            conflicts: Vec::new(),
        }
    }

    pub fn blocked(conflicts: Vec<Conflict>) -> Self {
        Self {
            success: false,
            lectures_created: Vec::new(),
            conflicts,
        }
    }
}

/// Auto-schedule route function name constants
pub const PROPOSE_SCHEDULE: &str = "propose_schedule";
pub const CONFIRM_SCHEDULE: &str = "confirm_schedule";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_reason_display() {
        assert_eq!(
            UnresolvedReason::ExceedsTeachingPeriod.to_string(),
            "exceeds teaching period"
        );
        assert_eq!(
            UnresolvedReason::NoAvailableTimeSlots.to_string(),
            "no available time slots"
        );
    }

    #[test]
    fn test_unresolved_reason_serde() {
        assert_eq!(
            serde_json::to_string(&UnresolvedReason::NoAvailableTimeSlots).unwrap(),
            "\"no_available_time_slots\""
        );
    }

    #[test]
    fn test_plan_resolution() {
        let mut plan = SchedulePlan::default();
        assert!(plan.is_fully_resolved());
        plan.unresolved.push(UnresolvedSlot {
            module_id: None,
            module_title: "Intro".to_string(),
            week_number: 14,
            reason: UnresolvedReason::ExceedsTeachingPeriod,
        });
        assert!(!plan.is_fully_resolved());
    }

    #[test]
    fn test_confirm_outcome_constructors() {
        let ok = ConfirmOutcome::created(vec![LectureId::new(1), LectureId::new(2)]);
        assert!(ok.success);
        assert_eq!(ok.lectures_created.len(), 2);

        let blocked = ConfirmOutcome::blocked(vec![]);
        assert!(!blocked.success);
        assert!(blocked.lectures_created.is_empty());
    }

    #[test]
    fn test_const_values() {
        assert_eq!(PROPOSE_SCHEDULE, "propose_schedule");
        assert_eq!(CONFIRM_SCHEDULE, "confirm_schedule");
    }
}
