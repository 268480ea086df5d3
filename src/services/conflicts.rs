//! Conflict detection for proposed lecture placements.
//!
//! A single interval-overlap abstraction parameterized by the dimension being
//! checked (instructor, room, student cohort) replaces per-endpoint ad hoc
//! queries. Detection is a read-only operation; it reports every rule
//! violation in a fixed order and never mutates the store.

use std::collections::HashSet;

use chrono::{Datelike, Utc, Weekday};

use crate::api::LectureId;
use crate::db::repository::FullRepository;
use crate::models::calendar::{is_exam_week, week_number};
use crate::models::{overlaps, DeliveryMode, Lecture, LecturePlacement, NewLecture};
use crate::routes::conflicts::{Conflict, ConflictKind, ConflictReport};

use super::{course_error, SchedulingResult};

/// Which resource an overlap check protects.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum OverlapDimension {
    Instructor,
    Room,
}

impl OverlapDimension {
    fn kind(&self) -> ConflictKind {
        match self {
            OverlapDimension::Instructor => ConflictKind::Instructor,
            OverlapDimension::Room => ConflictKind::Room,
        }
    }

    /// Whether `lecture` competes with `placement` on this dimension.
    /// Time overlap is checked separately.
    fn contends(&self, placement: &LecturePlacement, lecture: &Lecture) -> bool {
        match self {
            OverlapDimension::Instructor => lecture.faculty_id == placement.faculty_id,
            OverlapDimension::Room => {
                lecture.mode == DeliveryMode::Physical
                    && lecture.location.is_some()
                    && lecture.location == placement.location
            }
        }
    }

    fn message(&self, placement: &LecturePlacement, lecture: &Lecture) -> String {
        match self {
            OverlapDimension::Instructor => format!(
                "Instructor {} already teaches {} on {} from {} to {}",
                placement.faculty_id,
                lecture.topic,
                lecture.date,
                lecture.start_time.format("%H:%M"),
                lecture.end_time.format("%H:%M"),
            ),
            OverlapDimension::Room => format!(
                "Room {} is occupied by {} on {} from {} to {}",
                placement.location.as_deref().unwrap_or("?"),
                lecture.topic,
                lecture.date,
                lecture.start_time.format("%H:%M"),
                lecture.end_time.format("%H:%M"),
            ),
        }
    }
}

/// Conflicts of one dimension between a placement and stored lectures.
fn overlap_conflicts<'a>(
    placement: &LecturePlacement,
    lectures: impl IntoIterator<Item = &'a Lecture>,
    dimension: OverlapDimension,
    exclude: Option<LectureId>,
) -> Vec<Conflict> {
    lectures
        .into_iter()
        .filter(|l| Some(l.id) != exclude)
        .filter(|l| dimension.contends(placement, l))
        .filter(|l| placement.overlaps_lecture(l))
        .map(|l| {
            Conflict::new(dimension.kind(), dimension.message(placement, l))
                .with_lecture(l.id)
                .with_course(l.course_id)
        })
        .collect()
}

/// Conflicts of one dimension between a placement and not-yet-stored rows,
/// used to make earlier placements of a schedule proposal block later ones.
fn pending_conflicts(
    placement: &LecturePlacement,
    pending: &[NewLecture],
    dimension: OverlapDimension,
) -> Vec<Conflict> {
    pending
        .iter()
        .filter(|p| p.date == placement.date)
        .filter(|p| match dimension {
            OverlapDimension::Instructor => p.faculty_id == placement.faculty_id,
            OverlapDimension::Room => {
                p.mode == DeliveryMode::Physical
                    && p.location.is_some()
                    && p.location == placement.location
            }
        })
        .filter(|p| {
            overlaps(
                placement.start_time,
                placement.end_time,
                p.start_time,
                p.end_time,
            )
        })
        .map(|p| {
            let message = match dimension {
                OverlapDimension::Instructor => format!(
                    "Instructor {} is already planned for {} on {}",
                    placement.faculty_id, p.topic, p.date
                ),
                OverlapDimension::Room => format!(
                    "Room {} is already planned for {} on {}",
                    placement.location.as_deref().unwrap_or("?"),
                    p.topic,
                    p.date
                ),
            };
            Conflict::new(dimension.kind(), message).with_course(p.course_id)
        })
        .collect()
}

/// Student-cohort conflicts: lectures of any *other* course on the same date
/// and time whose course shares at least one active enrolled student with the
/// proposed course. One conflict per offending lecture, carrying the distinct
/// count of double-booked students.
async fn student_conflicts(
    repo: &dyn FullRepository,
    placement: &LecturePlacement,
    same_day: &[Lecture],
    exclude: Option<LectureId>,
) -> SchedulingResult<Vec<Conflict>> {
    let own_students: HashSet<_> = repo
        .students_in_course(placement.course_id)
        .await?
        .into_iter()
        .collect();
    if own_students.is_empty() {
        return Ok(Vec::new());
    }

    let mut conflicts = Vec::new();
    for lecture in same_day {
        if Some(lecture.id) == exclude
            || lecture.course_id == placement.course_id
            || !placement.overlaps_lecture(lecture)
        {
            continue;
        }
        let other_students = repo.students_in_course(lecture.course_id).await?;
        let shared = other_students
            .iter()
            .filter(|s| own_students.contains(s))
            .count();
        if shared > 0 {
            conflicts.push(
                Conflict::new(
                    ConflictKind::Student,
                    format!(
                        "{} students are also enrolled in the course holding {} on {}",
                        shared, lecture.topic, lecture.date
                    ),
                )
                .with_lecture(lecture.id)
                .with_course(lecture.course_id)
                .with_affected_students(shared),
            );
        }
    }
    Ok(conflicts)
}

/// Run every conflict rule against a proposed placement.
///
/// `exclude` skips one stored lecture from comparison, used when re-checking
/// an existing lecture being edited. `pending` are earlier placements of the
/// same proposal run, checked for instructor and room contention only (they
/// belong to the proposed course, so the student rule cannot apply).
///
/// Fails with a course-not-found error when the placement's course cannot be
/// resolved to a semester start date.
pub async fn detect_conflicts_with_pending(
    repo: &dyn FullRepository,
    placement: &LecturePlacement,
    exclude: Option<LectureId>,
    pending: &[NewLecture],
) -> SchedulingResult<ConflictReport> {
    let course = repo
        .get_course(placement.course_id)
        .await
        .map_err(|e| course_error(e, placement.course_id))?;

    let mut conflicts = Vec::new();

    let instructor_lectures = repo
        .lectures_for_instructor(placement.faculty_id, placement.date)
        .await?;
    conflicts.extend(overlap_conflicts(
        placement,
        &instructor_lectures,
        OverlapDimension::Instructor,
        exclude,
    ));
    conflicts.extend(pending_conflicts(
        placement,
        pending,
        OverlapDimension::Instructor,
    ));

    let same_day = repo.lectures_on_date(placement.date).await?;
    if placement.location.is_some() && placement.mode != Some(DeliveryMode::Online) {
        conflicts.extend(overlap_conflicts(
            placement,
            &same_day,
            OverlapDimension::Room,
            exclude,
        ));
        conflicts.extend(pending_conflicts(placement, pending, OverlapDimension::Room));
    }

    conflicts.extend(student_conflicts(repo, placement, &same_day, exclude).await?);

    let week = week_number(placement.date, course.semester_start());
    if is_exam_week(week) {
        conflicts.push(Conflict::new(
            ConflictKind::ExamPeriod,
            format!(
                "Week {} falls in the examination period (weeks 14-16)",
                week
            ),
        ));
    }

    let today = Utc::now().date_naive();
    if placement.date < today {
        conflicts.push(Conflict::new(
            ConflictKind::PastDate,
            format!("{} is in the past", placement.date),
        ));
    }

    if matches!(placement.date.weekday(), Weekday::Sat | Weekday::Sun) {
        conflicts.push(Conflict::new(
            ConflictKind::Weekend,
            format!("{} falls on a weekend", placement.date),
        ));
    }

    Ok(ConflictReport::new(conflicts))
}

/// Run every conflict rule against a proposed placement. See
/// [`detect_conflicts_with_pending`] for the semantics.
pub async fn detect_conflicts(
    repo: &dyn FullRepository,
    placement: &LecturePlacement,
    exclude: Option<LectureId>,
) -> SchedulingResult<ConflictReport> {
    detect_conflicts_with_pending(repo, placement, exclude, &[]).await
}

/// Instructor/room availability check used by the auto-scheduler's candidate
/// search. Intentionally narrower than [`detect_conflicts`]: warning-level
/// rules and the student rule are not consulted when hunting for a free slot.
pub async fn check_availability(
    repo: &dyn FullRepository,
    placement: &LecturePlacement,
    pending: &[NewLecture],
) -> SchedulingResult<bool> {
    let instructor_lectures = repo
        .lectures_for_instructor(placement.faculty_id, placement.date)
        .await?;
    if !overlap_conflicts(
        placement,
        &instructor_lectures,
        OverlapDimension::Instructor,
        None,
    )
    .is_empty()
        || !pending_conflicts(placement, pending, OverlapDimension::Instructor).is_empty()
    {
        return Ok(false);
    }

    if placement.location.is_some() && placement.mode != Some(DeliveryMode::Online) {
        let same_day = repo.lectures_on_date(placement.date).await?;
        if !overlap_conflicts(placement, &same_day, OverlapDimension::Room, None).is_empty()
            || !pending_conflicts(placement, pending, OverlapDimension::Room).is_empty()
        {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Error-level conflicts only (instructor, room, student). Used by the
/// alternative-slot suggester, where the date is already fixed and the
/// date-level rules would be noise.
pub(crate) async fn blocking_conflicts(
    repo: &dyn FullRepository,
    placement: &LecturePlacement,
    exclude: Option<LectureId>,
) -> SchedulingResult<Vec<Conflict>> {
    let mut conflicts = Vec::new();

    let instructor_lectures = repo
        .lectures_for_instructor(placement.faculty_id, placement.date)
        .await?;
    conflicts.extend(overlap_conflicts(
        placement,
        &instructor_lectures,
        OverlapDimension::Instructor,
        exclude,
    ));

    let same_day = repo.lectures_on_date(placement.date).await?;
    if placement.location.is_some() && placement.mode != Some(DeliveryMode::Online) {
        conflicts.extend(overlap_conflicts(
            placement,
            &same_day,
            OverlapDimension::Room,
            exclude,
        ));
    }

    conflicts.extend(student_conflicts(repo, placement, &same_day, exclude).await?);

    Ok(conflicts)
}
