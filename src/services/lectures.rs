//! Lecture CRUD with conflict gating.
//!
//! Create and update re-run the conflict detector before committing; when
//! blocking conflicts exist the save is withheld and the report returned
//! instead, unless the caller forces the write. Deletion is a status
//! transition to cancelled, never a physical row delete.

use crate::api::{CourseId, LectureId};
use crate::db::repository::FullRepository;
use crate::models::calendar::week_number;
use crate::models::{DeliveryMode, Lecture, LecturePlacement, LectureStatus, NewLecture};
use crate::routes::conflicts::ConflictReport;

use super::autoschedule::validate_mode_fields;
use super::conflicts::detect_conflicts;
use super::{course_error, lecture_error, SchedulingError, SchedulingResult};

/// Caller-supplied lecture fields; the week number is computed at save time
/// from the owning course's semester.
#[derive(Debug, Clone)]
pub struct LectureDraft {
    pub course_id: CourseId,
    pub module_id: Option<crate::api::ModuleId>,
    pub date: chrono::NaiveDate,
    pub start_time: chrono::NaiveTime,
    pub end_time: chrono::NaiveTime,
    pub mode: DeliveryMode,
    pub location: Option<String>,
    pub meeting_link: Option<String>,
    pub topic: String,
    pub faculty_id: crate::api::FacultyId,
}

impl LectureDraft {
    fn validate(&self) -> SchedulingResult<()> {
        validate_mode_fields(self.mode, &self.location, &self.meeting_link)?;
        if self.end_time <= self.start_time {
            return Err(SchedulingError::Validation(format!(
                "End time {} is not after start time {}",
                self.end_time.format("%H:%M"),
                self.start_time.format("%H:%M")
            )));
        }
        if self.topic.trim().is_empty() {
            return Err(SchedulingError::Validation(
                "Topic must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn placement(&self) -> LecturePlacement {
        LecturePlacement {
            course_id: self.course_id,
            faculty_id: self.faculty_id,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            mode: Some(self.mode),
            location: self.location.clone(),
        }
    }
}

/// Result of a gated save: either the stored lecture or the conflict report
/// that withheld it.
#[derive(Debug, Clone)]
pub enum SaveOutcome {
    Saved(Lecture),
    Blocked(ConflictReport),
}

/// Create a lecture, unless the conflict detector reports blocking conflicts.
/// `force` writes through blocking conflicts (warnings never block).
pub async fn create_lecture(
    repo: &dyn FullRepository,
    draft: &LectureDraft,
    force: bool,
) -> SchedulingResult<SaveOutcome> {
    draft.validate()?;

    let course = repo
        .get_course(draft.course_id)
        .await
        .map_err(|e| course_error(e, draft.course_id))?;

    if !force {
        let report = detect_conflicts(repo, &draft.placement(), None).await?;
        if report.blocking_count() > 0 {
            return Ok(SaveOutcome::Blocked(report));
        }
    }

    let week = week_number(draft.date, course.semester_start());
    let lecture = repo
        .create_lecture(&NewLecture {
            course_id: draft.course_id,
            module_id: draft.module_id,
            date: draft.date,
            start_time: draft.start_time,
            end_time: draft.end_time,
            mode: draft.mode,
            location: draft.location.clone(),
            meeting_link: draft.meeting_link.clone(),
            topic: draft.topic.clone(),
            faculty_id: draft.faculty_id,
            week_number: week,
        })
        .await?;
    Ok(SaveOutcome::Saved(lecture))
}

/// Reschedule an existing lecture. The conflict check excludes the lecture's
/// own stored row, and the week number is recomputed from the new date.
pub async fn update_lecture(
    repo: &dyn FullRepository,
    id: LectureId,
    draft: &LectureDraft,
    force: bool,
) -> SchedulingResult<SaveOutcome> {
    draft.validate()?;

    let existing = repo
        .get_lecture(id)
        .await
        .map_err(|e| lecture_error(e, id))?;
    let course = repo
        .get_course(draft.course_id)
        .await
        .map_err(|e| course_error(e, draft.course_id))?;

    if !force {
        let report = detect_conflicts(repo, &draft.placement(), Some(id)).await?;
        if report.blocking_count() > 0 {
            return Ok(SaveOutcome::Blocked(report));
        }
    }

    let week = week_number(draft.date, course.semester_start());
    let updated = repo
        .update_lecture(&Lecture {
            id,
            course_id: draft.course_id,
            module_id: draft.module_id,
            date: draft.date,
            start_time: draft.start_time,
            end_time: draft.end_time,
            mode: draft.mode,
            location: draft.location.clone(),
            meeting_link: draft.meeting_link.clone(),
            topic: draft.topic.clone(),
            faculty_id: draft.faculty_id,
            week_number: week,
            status: existing.status,
        })
        .await?;
    Ok(SaveOutcome::Saved(updated))
}

/// Cancel a lecture. The row is preserved so attendance already recorded
/// against it survives; the slot is simply released.
pub async fn cancel_lecture(
    repo: &dyn FullRepository,
    id: LectureId,
) -> SchedulingResult<Lecture> {
    repo.set_lecture_status(id, LectureStatus::Cancelled)
        .await
        .map_err(|e| lecture_error(e, id))
}

/// Fetch one lecture.
pub async fn get_lecture(repo: &dyn FullRepository, id: LectureId) -> SchedulingResult<Lecture> {
    repo.get_lecture(id).await.map_err(|e| lecture_error(e, id))
}

/// All lectures of a course (any status), ordered by date and start time.
pub async fn list_lectures(
    repo: &dyn FullRepository,
    course_id: CourseId,
) -> SchedulingResult<Vec<Lecture>> {
    repo.get_course(course_id)
        .await
        .map_err(|e| course_error(e, course_id))?;
    Ok(repo.lectures_for_course(course_id).await?)
}
