//! Data Transfer Objects for the HTTP API.
//!
//! Most scheduling DTOs are re-exported from the routes module since they
//! already derive Serialize/Deserialize; this file adds the request/response
//! envelopes and the string-typed preference parsing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Re-export existing DTOs that are already serializable
pub use crate::api::{
    Conflict, ConflictKind, ConflictReport, ConflictSeverity, ConfirmOutcome, ModuleLoad,
    PlannedLecture, SchedulePlan, SlotSuggestion, UnresolvedReason, UnresolvedSlot,
};

use crate::models::slots::{parse_weekday, slot_starting_at};
use crate::models::time::{hhmm, parse_hhmm};
use crate::models::{DeliveryMode, Lecture};
use crate::services::SchedulePreferences;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Query parameters for the conflict-check endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ConflictCheckQuery {
    pub date: NaiveDate,
    /// Start of the proposed window, `HH:MM`
    pub start_time: String,
    /// End of the proposed window, `HH:MM`
    pub end_time: String,
    pub faculty_id: i64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub mode: Option<DeliveryMode>,
    /// Lecture to skip when re-checking an edit
    #[serde(default)]
    pub exclude_lecture_id: Option<i64>,
}

impl ConflictCheckQuery {
    pub fn start(&self) -> Result<chrono::NaiveTime, String> {
        parse_hhmm(&self.start_time).map_err(|e| format!("Invalid start_time: {}", e))
    }

    pub fn end(&self) -> Result<chrono::NaiveTime, String> {
        parse_hhmm(&self.end_time).map_err(|e| format!("Invalid end_time: {}", e))
    }
}

/// Response for the conflict-check endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictCheckResponse {
    pub has_conflicts: bool,
    pub blocking_conflicts: usize,
    pub warning_conflicts: usize,
    pub conflicts: Vec<Conflict>,
    /// Open same-day alternatives, populated when blocking conflicts exist
    pub suggestions: Vec<SlotSuggestion>,
}

/// Scheduling preferences as they arrive on the wire: weekday names and slot
/// start times as strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferencesDto {
    /// Preferred weekday names, e.g. `["monday", "tuesday"]`
    #[serde(default)]
    pub weekdays: Option<Vec<String>>,
    /// Preferred slot start times, e.g. `["10:00"]`
    #[serde(default)]
    pub time_slots: Option<Vec<String>>,
    pub mode: Option<DeliveryMode>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub meeting_link: Option<String>,
}

impl PreferencesDto {
    /// Resolve the wire strings against the weekday names and slot catalog.
    pub fn into_preferences(self) -> Result<SchedulePreferences, String> {
        let weekdays = match self.weekdays {
            Some(names) => Some(
                names
                    .iter()
                    .map(|n| parse_weekday(n))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => None,
        };
        let slots = match self.time_slots {
            Some(starts) => {
                let mut slots = Vec::with_capacity(starts.len());
                for s in &starts {
                    let start =
                        parse_hhmm(s).map_err(|e| format!("Invalid time slot {}: {}", s, e))?;
                    let slot = slot_starting_at(start)
                        .ok_or_else(|| format!("No catalog time slot starts at {}", s))?;
                    slots.push(slot);
                }
                Some(slots)
            }
            None => None,
        };
        let mode = self.mode.ok_or("Delivery mode is required")?;
        Ok(SchedulePreferences {
            weekdays,
            slots,
            mode,
            location: self.location,
            meeting_link: self.meeting_link,
        })
    }
}

/// Request body for the auto-schedule preview endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoScheduleRequest {
    pub faculty_id: i64,
    pub preferences: PreferencesDto,
}

/// Response for the auto-schedule preview endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoScheduleResponse {
    pub placements: Vec<PlannedLecture>,
    pub unresolved: Vec<UnresolvedSlot>,
    /// Human-readable hint about what to do next
    pub next_steps: String,
}

/// Request body for the auto-schedule confirm endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmRequest {
    pub faculty_id: i64,
    pub schedule: Vec<PlannedLecture>,
    /// Skip conflict re-validation and write through
    #[serde(default)]
    pub force: bool,
}

/// Request body for creating or rescheduling a lecture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LectureRequest {
    pub course_id: i64,
    #[serde(default)]
    pub module_id: Option<i64>,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: chrono::NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: chrono::NaiveTime,
    pub mode: DeliveryMode,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub meeting_link: Option<String>,
    pub topic: String,
    pub faculty_id: i64,
    /// Write through blocking conflicts
    #[serde(default)]
    pub force: bool,
}

/// Response for a gated lecture save: either the stored lecture or the
/// conflict report that withheld it (with a 409 status).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LectureSaveResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lecture: Option<Lecture>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub conflicts: Vec<Conflict>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub suggestions: Vec<SlotSuggestion>,
}

/// Lecture list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LectureListResponse {
    pub lectures: Vec<Lecture>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn test_preferences_parsing() {
        let dto = PreferencesDto {
            weekdays: Some(vec!["monday".to_string(), "Tue".to_string()]),
            time_slots: Some(vec!["10:00".to_string()]),
            mode: Some(DeliveryMode::Physical),
            location: Some("R1".to_string()),
            meeting_link: None,
        };
        let prefs = dto.into_preferences().unwrap();
        assert_eq!(prefs.weekdays, Some(vec![Weekday::Mon, Weekday::Tue]));
        let slots = prefs.slots.unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].label(), "10:00-13:00");
    }

    #[test]
    fn test_preferences_reject_unknown_slot_start() {
        let dto = PreferencesDto {
            weekdays: None,
            time_slots: Some(vec!["11:30".to_string()]),
            mode: Some(DeliveryMode::Online),
            location: None,
            meeting_link: Some("https://m".to_string()),
        };
        assert!(dto.into_preferences().is_err());
    }

    #[test]
    fn test_preferences_require_mode() {
        let dto = PreferencesDto::default();
        assert!(dto.into_preferences().is_err());
    }

    #[test]
    fn test_conflict_check_query_times() {
        let q = ConflictCheckQuery {
            date: NaiveDate::from_ymd_opt(2027, 9, 6).unwrap(),
            start_time: "10:00".to_string(),
            end_time: "13:00".to_string(),
            faculty_id: 1,
            location: None,
            mode: None,
            exclude_lecture_id: None,
        };
        assert!(q.start().is_ok());
        assert!(q.end().is_ok());

        let bad = ConflictCheckQuery {
            start_time: "25:00".to_string(),
            ..q
        };
        assert!(bad.start().is_err());
    }
}
