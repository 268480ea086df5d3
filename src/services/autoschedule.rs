//! Auto-scheduling: full-term schedule proposal and transactional
//! confirmation.
//!
//! Proposal is a pure preview: it reads the lecture store through the
//! conflict detector but writes nothing. Confirmation writes the accepted
//! placements in one repository batch so a failure creates zero lectures.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::api::{CourseId, FacultyId};
use crate::db::repository::FullRepository;
use crate::models::calendar::TEACHING_WEEKS;
use crate::models::slots::{time_slots, TimeSlot, TEACHING_WEEKDAYS};
use crate::models::{DeliveryMode, LecturePlacement, NewLecture};
use crate::routes::autoschedule::{
    ConfirmOutcome, ModuleLoad, PlannedLecture, SchedulePlan, UnresolvedReason, UnresolvedSlot,
};

use super::conflicts::{check_availability, detect_conflicts_with_pending};
use super::{course_error, SchedulingError, SchedulingResult};

/// Caller preferences for the candidate search.
#[derive(Debug, Clone)]
pub struct SchedulePreferences {
    /// Preferred weekdays, tried in the order given. `None` means no
    /// preference; the search starts straight at the full catalog.
    pub weekdays: Option<Vec<Weekday>>,
    /// Preferred catalog slots, tried in catalog order.
    pub slots: Option<Vec<TimeSlot>>,
    pub mode: DeliveryMode,
    pub location: Option<String>,
    pub meeting_link: Option<String>,
}

impl SchedulePreferences {
    /// Reject inconsistent preferences before any query runs.
    fn validate(&self) -> SchedulingResult<()> {
        validate_mode_fields(self.mode, &self.location, &self.meeting_link)?;
        if let Some(days) = &self.weekdays {
            for day in days {
                if !TEACHING_WEEKDAYS.contains(day) {
                    return Err(SchedulingError::Validation(format!(
                        "{} is not a schedulable weekday",
                        day
                    )));
                }
            }
        }
        if let Some(slots) = &self.slots {
            let catalog = time_slots();
            for slot in slots {
                if !catalog.contains(slot) {
                    return Err(SchedulingError::Validation(format!(
                        "{} is not a catalog time slot",
                        slot
                    )));
                }
            }
        }
        Ok(())
    }

    /// Preferred slots normalized to catalog order, or the whole catalog.
    fn ordered_slots(&self) -> Vec<TimeSlot> {
        let catalog = time_slots();
        match &self.slots {
            Some(preferred) if !preferred.is_empty() => catalog
                .into_iter()
                .filter(|s| preferred.contains(s))
                .collect(),
            _ => catalog,
        }
    }
}

/// Delivery mode and its companion fields must agree: physical lectures carry
/// a location and no meeting link, online lectures a meeting link and no
/// location.
pub(crate) fn validate_mode_fields(
    mode: DeliveryMode,
    location: &Option<String>,
    meeting_link: &Option<String>,
) -> SchedulingResult<()> {
    let has_location = location.as_deref().is_some_and(|s| !s.is_empty());
    let has_link = meeting_link.as_deref().is_some_and(|s| !s.is_empty());
    match mode {
        DeliveryMode::Physical if !has_location => Err(SchedulingError::Validation(
            "Physical delivery requires a location".to_string(),
        )),
        DeliveryMode::Physical if has_link => Err(SchedulingError::Validation(
            "Physical delivery must not carry a meeting link".to_string(),
        )),
        DeliveryMode::Online if !has_link => Err(SchedulingError::Validation(
            "Online delivery requires a meeting link".to_string(),
        )),
        DeliveryMode::Online if has_location => Err(SchedulingError::Validation(
            "Online delivery must not carry a location".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Candidate (weekday, slot) pairs for one teaching week, in priority order:
/// the preferred combinations first (Phase 1), then the remaining catalog
/// combinations in fixed catalog order (Phase 2), with no pair repeated.
///
/// The preferred weekday list is rotated by the week index so consecutive
/// weeks spread across the preferred days instead of piling onto the first
/// one: with preferences {Monday, Tuesday}, week 1 tries Monday first and
/// week 2 tries Tuesday first.
fn candidate_slots(preferences: &SchedulePreferences, week: i32) -> Vec<(Weekday, TimeSlot)> {
    let mut candidates: Vec<(Weekday, TimeSlot)> = Vec::new();

    if let Some(days) = &preferences.weekdays {
        let preferred_slots = preferences.ordered_slots();
        if !days.is_empty() {
            let rotation = (week as usize - 1) % days.len();
            for i in 0..days.len() {
                let day = days[(rotation + i) % days.len()];
                for slot in &preferred_slots {
                    candidates.push((day, *slot));
                }
            }
        }
    }

    let catalog = time_slots();
    for day in TEACHING_WEEKDAYS {
        for slot in &catalog {
            if !candidates.contains(&(day, *slot)) {
                candidates.push((day, *slot));
            }
        }
    }

    candidates
}

/// Concrete date of `weekday` within teaching week `week` of a semester.
///
/// The week starting at `semester_start + 7 * (week - 1)` days contains every
/// weekday exactly once; the result always maps back to the same week number.
fn date_for_week(semester_start: NaiveDate, week: i32, weekday: Weekday) -> NaiveDate {
    let week_start = semester_start + Days::new(7 * (week as u64 - 1));
    let offset = (weekday.num_days_from_monday() as i64
        - week_start.weekday().num_days_from_monday() as i64)
        .rem_euclid(7) as u64;
    week_start + Days::new(offset)
}

/// Propose a full-term schedule for a course.
///
/// Modules are placed in sequence order, one lecture per module week. Every
/// candidate slot is validated for instructor/room availability, including
/// against placements made earlier in the same run. The search never aborts
/// on a full week: it records an unresolved entry and keeps going, so the
/// result is always a best-effort complete preview.
///
/// Fails fast with a capacity error when the module durations exceed the
/// teaching period; no partial schedule is produced in that case.
pub async fn propose_schedule(
    repo: &dyn FullRepository,
    course_id: CourseId,
    faculty_id: FacultyId,
    preferences: &SchedulePreferences,
) -> SchedulingResult<SchedulePlan> {
    preferences.validate()?;

    let course = repo
        .get_course(course_id)
        .await
        .map_err(|e| course_error(e, course_id))?;
    let modules = repo.list_modules(course_id).await?;

    let total_weeks: i32 = modules.iter().map(|m| m.duration_weeks).sum();
    if total_weeks > TEACHING_WEEKS {
        return Err(SchedulingError::Capacity {
            total_weeks,
            limit: TEACHING_WEEKS,
            overshoot: total_weeks - TEACHING_WEEKS,
            modules: modules
                .iter()
                .map(|m| ModuleLoad {
                    module_id: m.id,
                    title: m.title.clone(),
                    sequence: m.sequence,
                    duration_weeks: m.duration_weeks,
                })
                .collect(),
        });
    }

    let semester_start = course.semester_start();

    let mut plan = SchedulePlan::default();
    // Placements made earlier in this run block later candidate slots.
    let mut in_flight: Vec<NewLecture> = Vec::new();
    let mut current_week: i32 = 1;

    for module in &modules {
        for offset in 0..module.duration_weeks {
            let week = current_week + offset;
            if week > TEACHING_WEEKS {
                plan.unresolved.push(UnresolvedSlot {
                    module_id: module.id,
                    module_title: module.title.clone(),
                    week_number: week,
                    reason: UnresolvedReason::ExceedsTeachingPeriod,
                });
                break;
            }

            let mut placed = false;
            for (weekday, slot) in &candidate_slots(preferences, week) {
                let date = date_for_week(semester_start, week, *weekday);
                let placement = LecturePlacement {
                    course_id,
                    faculty_id,
                    date,
                    start_time: slot.start,
                    end_time: slot.end,
                    mode: Some(preferences.mode),
                    location: preferences.location.clone(),
                };
                if check_availability(repo, &placement, &in_flight).await? {
                    let topic = format!("{} - Week {}", module.title, offset + 1);
                    plan.placements.push(PlannedLecture {
                        module_id: module.id,
                        module_title: module.title.clone(),
                        week_number: week,
                        date,
                        start_time: slot.start,
                        end_time: slot.end,
                        mode: preferences.mode,
                        location: preferences.location.clone(),
                        meeting_link: preferences.meeting_link.clone(),
                        topic: topic.clone(),
                        faculty_id,
                    });
                    in_flight.push(NewLecture {
                        course_id,
                        module_id: module.id,
                        date,
                        start_time: slot.start,
                        end_time: slot.end,
                        mode: preferences.mode,
                        location: preferences.location.clone(),
                        meeting_link: preferences.meeting_link.clone(),
                        topic,
                        faculty_id,
                        week_number: week,
                    });
                    placed = true;
                    break;
                }
            }

            if !placed {
                plan.unresolved.push(UnresolvedSlot {
                    module_id: module.id,
                    module_title: module.title.clone(),
                    week_number: week,
                    reason: UnresolvedReason::NoAvailableTimeSlots,
                });
            }
        }
        current_week += module.duration_weeks;
    }

    log::debug!(
        "proposed {} placements, {} unresolved for course {}",
        plan.placements.len(),
        plan.unresolved.len(),
        course_id
    );
    Ok(plan)
}

/// Write a reviewed schedule to the lecture store.
///
/// Every placement is re-validated against the current store state (and
/// against the earlier rows of the same batch) unless `force` is set, so a
/// racing confirmation surfaces conflicts instead of silently double-booking.
/// The insert itself is a single repository batch: either every lecture is
/// created or none are.
pub async fn confirm_schedule(
    repo: &dyn FullRepository,
    course_id: CourseId,
    faculty_id: FacultyId,
    placements: &[PlannedLecture],
    force: bool,
) -> SchedulingResult<ConfirmOutcome> {
    if placements.is_empty() {
        return Err(SchedulingError::Validation(
            "Schedule contains no placements".to_string(),
        ));
    }

    let mut rows: Vec<NewLecture> = Vec::with_capacity(placements.len());
    let mut conflicts = Vec::new();

    for planned in placements {
        validate_mode_fields(planned.mode, &planned.location, &planned.meeting_link)?;
        if planned.week_number > TEACHING_WEEKS || planned.week_number < 1 {
            return Err(SchedulingError::Validation(format!(
                "Week {} is outside the teaching period",
                planned.week_number
            )));
        }

        if !force {
            let placement = LecturePlacement {
                course_id,
                faculty_id,
                date: planned.date,
                start_time: planned.start_time,
                end_time: planned.end_time,
                mode: Some(planned.mode),
                location: planned.location.clone(),
            };
            let report =
                detect_conflicts_with_pending(repo, &placement, None, &rows).await?;
            conflicts.extend(
                report
                    .conflicts
                    .into_iter()
                    .filter(|c| c.is_blocking()),
            );
        }

        rows.push(NewLecture {
            course_id,
            module_id: planned.module_id,
            date: planned.date,
            start_time: planned.start_time,
            end_time: planned.end_time,
            mode: planned.mode,
            location: planned.location.clone(),
            meeting_link: planned.meeting_link.clone(),
            topic: planned.topic.clone(),
            faculty_id,
            week_number: planned.week_number,
        });
    }

    if !conflicts.is_empty() {
        return Ok(ConfirmOutcome::blocked(conflicts));
    }

    let created = repo.create_lectures(&rows).await?;
    log::info!(
        "confirmed {} lectures for course {}",
        created.len(),
        course_id
    );
    Ok(ConfirmOutcome::created(
        created.into_iter().map(|l| l.id).collect(),
    ))
}
