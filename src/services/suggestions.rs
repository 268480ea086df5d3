//! Same-day alternative slot search.
//!
//! When a proposed placement conflicts, this walks the slot catalog for the
//! same calendar day and returns every window free of error-level conflicts.
//! Date-level warnings (past date, weekend) are not re-checked here; the date
//! is already fixed by the caller.

use chrono::NaiveDate;

use crate::api::{CourseId, FacultyId, LectureId};
use crate::db::repository::FullRepository;
use crate::models::slots::time_slots;
use crate::models::LecturePlacement;
use crate::routes::conflicts::SlotSuggestion;

use super::conflicts::blocking_conflicts;
use super::SchedulingResult;

/// Maximum number of alternatives returned per request.
pub const MAX_SUGGESTIONS: usize = 5;

/// Find open catalog slots on `date` for the given instructor and course.
///
/// Returns candidates in catalog order, at most [`MAX_SUGGESTIONS`]. An empty
/// list is not an error; it just means no same-day alternative exists.
/// `exclude` skips one stored lecture from the checks, used when hunting
/// alternatives for an existing lecture being moved.
pub async fn suggest_alternatives(
    repo: &dyn FullRepository,
    date: NaiveDate,
    faculty_id: FacultyId,
    course_id: CourseId,
    location: Option<&str>,
    exclude: Option<LectureId>,
) -> SchedulingResult<Vec<SlotSuggestion>> {
    let mut suggestions = Vec::new();

    for slot in time_slots() {
        if suggestions.len() >= MAX_SUGGESTIONS {
            break;
        }
        let placement = LecturePlacement {
            course_id,
            faculty_id,
            date,
            start_time: slot.start,
            end_time: slot.end,
            mode: None,
            location: location.map(str::to_string),
        };
        if blocking_conflicts(repo, &placement, exclude).await?.is_empty() {
            suggestions.push(SlotSuggestion {
                date,
                start_time: slot.start,
                end_time: slot.end,
                label: slot.label(),
            });
        }
    }

    Ok(suggestions)
}
