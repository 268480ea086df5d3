//! Scheduling engine service layer.
//!
//! High-level operations over any [`FullRepository`](crate::db::FullRepository)
//! implementation:
//!
//! - `conflicts`: conflict detection for proposed lecture placements
//! - `autoschedule`: full-term schedule proposal and transactional confirmation
//! - `suggestions`: same-day alternative slot search
//! - `lectures`: lecture CRUD with conflict gating
//!
//! Conflict and capacity conditions are returned as data, never as panics;
//! only infrastructure failures propagate as hard errors.

use crate::api::{CourseId, LectureId};
use crate::db::repository::RepositoryError;
use crate::routes::autoschedule::ModuleLoad;

pub mod autoschedule;
pub mod conflicts;
pub mod lectures;
pub mod suggestions;

#[cfg(test)]
#[path = "autoschedule_tests.rs"]
mod autoschedule_tests;

pub use autoschedule::{confirm_schedule, propose_schedule, SchedulePreferences};
pub use conflicts::{check_availability, detect_conflicts};
pub use lectures::{
    cancel_lecture, create_lecture, get_lecture, list_lectures, update_lecture, LectureDraft,
    SaveOutcome,
};
pub use suggestions::{suggest_alternatives, MAX_SUGGESTIONS};

/// Result type for scheduling operations.
pub type SchedulingResult<T> = Result<T, SchedulingError>;

/// Errors surfaced by the scheduling services.
///
/// Conflicts are not errors; they come back as structured report data so the
/// caller can decide whether to force-save, pick a suggestion, or abort.
#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    /// The referenced course does not exist.
    #[error("Course {0} not found")]
    CourseNotFound(CourseId),

    /// The referenced lecture does not exist.
    #[error("Lecture {0} not found")]
    LectureNotFound(LectureId),

    /// Input rejected before any query ran.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Module durations exceed the teaching period. Carries the full
    /// per-module breakdown so the caller can shorten modules.
    #[error(
        "Modules total {total_weeks} weeks, exceeding the {limit}-week teaching period by {overshoot}"
    )]
    Capacity {
        total_weeks: i32,
        limit: i32,
        overshoot: i32,
        modules: Vec<ModuleLoad>,
    },

    /// Underlying store failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Map a repository miss on a course lookup to the domain not-found error.
fn course_error(err: RepositoryError, id: CourseId) -> SchedulingError {
    if err.is_not_found() {
        SchedulingError::CourseNotFound(id)
    } else {
        SchedulingError::Repository(err)
    }
}

/// Map a repository miss on a lecture lookup to the domain not-found error.
fn lecture_error(err: RepositoryError, id: LectureId) -> SchedulingError {
    if err.is_not_found() {
        SchedulingError::LectureNotFound(id)
    } else {
        SchedulingError::Repository(err)
    }
}
