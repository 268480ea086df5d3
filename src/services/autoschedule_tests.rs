//! Auto-scheduler tests: proposal search, capacity gating and transactional
//! confirmation against a seeded in-memory repository.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::api::{CourseId, FacultyId};
use crate::db::repositories::LocalRepository;
use crate::db::repository::{CourseRepository, LectureRepository};
use crate::models::slots::{time_slots, TimeSlot};
use crate::models::time::parse_hhmm;
use crate::models::{Course, CourseModule, DeliveryMode, NewLecture, SemesterPeriod};
use crate::routes::autoschedule::UnresolvedReason;
use crate::routes::conflicts::ConflictKind;
use crate::services::autoschedule::{confirm_schedule, propose_schedule, SchedulePreferences};
use crate::services::SchedulingError;

fn t(s: &str) -> chrono::NaiveTime {
    parse_hhmm(s).unwrap()
}

fn mid_slot() -> TimeSlot {
    TimeSlot {
        start: t("10:00"),
        end: t("13:00"),
    }
}

fn mon_tue_prefs() -> SchedulePreferences {
    SchedulePreferences {
        weekdays: Some(vec![Weekday::Mon, Weekday::Tue]),
        slots: Some(vec![mid_slot()]),
        mode: DeliveryMode::Physical,
        location: Some("R1".to_string()),
        meeting_link: None,
    }
}

/// Autumn 2027 course (semester starts Wednesday 2027-09-01) with the given
/// module durations.
async fn course_with_modules(repo: &LocalRepository, durations: &[i32]) -> CourseId {
    let course = repo
        .store_course(&Course {
            id: None,
            code: "INF-2100".to_string(),
            title: "Algorithms".to_string(),
            credits: 10,
            year: 2027,
            semester: SemesterPeriod::Autumn,
        })
        .await
        .unwrap();
    let course_id = course.id.unwrap();
    for (i, weeks) in durations.iter().enumerate() {
        repo.store_module(&CourseModule {
            id: None,
            course_id,
            sequence: i as i32 + 1,
            title: format!("Module {}", i + 1),
            duration_weeks: *weeks,
        })
        .await
        .unwrap();
    }
    course_id
}

async fn occupy(
    repo: &LocalRepository,
    course_id: CourseId,
    faculty_id: FacultyId,
    on: NaiveDate,
    slot: TimeSlot,
    room: &str,
) {
    repo.create_lecture(&NewLecture {
        course_id,
        module_id: None,
        date: on,
        start_time: slot.start,
        end_time: slot.end,
        mode: DeliveryMode::Physical,
        location: Some(room.to_string()),
        meeting_link: None,
        topic: "Blocker".to_string(),
        faculty_id,
        week_number: 1,
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_five_week_plan_alternates_preferred_days() {
    let repo = LocalRepository::new();
    let course = course_with_modules(&repo, &[2, 3]).await;
    let faculty = FacultyId::new(7);

    let plan = propose_schedule(&repo, course, faculty, &mon_tue_prefs())
        .await
        .unwrap();

    assert!(plan.is_fully_resolved());
    assert_eq!(plan.placements.len(), 5);
    for (i, placed) in plan.placements.iter().enumerate() {
        assert_eq!(placed.week_number, i as i32 + 1);
        assert_eq!(placed.start_time, t("10:00"));
        assert_eq!(placed.end_time, t("13:00"));
        let expected_day = if i % 2 == 0 { Weekday::Mon } else { Weekday::Tue };
        assert_eq!(placed.date.weekday(), expected_day, "week {}", i + 1);
    }
    // Module boundaries: weeks 1-2 belong to module 1, weeks 3-5 to module 2.
    assert_eq!(plan.placements[1].module_title, "Module 1");
    assert_eq!(plan.placements[2].module_title, "Module 2");
    assert_eq!(plan.placements[2].topic, "Module 2 - Week 1");
}

#[tokio::test]
async fn test_occupied_monday_falls_back_to_tuesday_within_phase_one() {
    let repo = LocalRepository::new();
    let course = course_with_modules(&repo, &[2, 3]).await;
    let blocker_course = course_with_modules(&repo, &[1]).await;
    let faculty = FacultyId::new(7);
    // Monday of teaching week 1, occupied by the same instructor and room.
    let monday_w1 = NaiveDate::from_ymd_opt(2027, 9, 6).unwrap();
    occupy(&repo, blocker_course, faculty, monday_w1, mid_slot(), "R1").await;

    let plan = propose_schedule(&repo, course, faculty, &mon_tue_prefs())
        .await
        .unwrap();

    assert!(plan.is_fully_resolved());
    assert_eq!(plan.placements.len(), 5);
    // Week 1 lands on Tuesday at the preferred slot, not on a Phase 2 window.
    assert_eq!(plan.placements[0].week_number, 1);
    assert_eq!(plan.placements[0].date.weekday(), Weekday::Tue);
    assert_eq!(plan.placements[0].start_time, t("10:00"));
}

#[tokio::test]
async fn test_capacity_overflow_fails_with_breakdown() {
    let repo = LocalRepository::new();
    let course = course_with_modules(&repo, &[5, 5, 4]).await;

    let result = propose_schedule(&repo, course, FacultyId::new(7), &mon_tue_prefs()).await;
    match result {
        Err(SchedulingError::Capacity {
            total_weeks,
            limit,
            overshoot,
            modules,
        }) => {
            assert_eq!(total_weeks, 14);
            assert_eq!(limit, 13);
            assert_eq!(overshoot, 1);
            assert_eq!(modules.len(), 3);
            assert_eq!(modules[2].duration_weeks, 4);
        }
        other => panic!("expected capacity error, got {:?}", other.map(|p| p.placements.len())),
    }
}

#[tokio::test]
async fn test_all_accepted_weeks_are_teaching_weeks() {
    let repo = LocalRepository::new();
    let course = course_with_modules(&repo, &[4, 4, 5]).await;

    let plan = propose_schedule(&repo, course, FacultyId::new(7), &mon_tue_prefs())
        .await
        .unwrap();
    assert_eq!(plan.placements.len(), 13);
    for placed in &plan.placements {
        assert!((1..=13).contains(&placed.week_number));
    }
}

#[tokio::test]
async fn test_phase_two_fallback_when_preferred_slots_full() {
    let repo = LocalRepository::new();
    let course = course_with_modules(&repo, &[1]).await;
    let blocker_course = course_with_modules(&repo, &[1]).await;
    let faculty = FacultyId::new(7);
    // Occupy the preferred slot on both preferred weekdays of week 1.
    for day in [6u32, 7] {
        let on = NaiveDate::from_ymd_opt(2027, 9, day).unwrap();
        occupy(&repo, blocker_course, faculty, on, mid_slot(), "R1").await;
    }

    let plan = propose_schedule(&repo, course, faculty, &mon_tue_prefs())
        .await
        .unwrap();
    assert!(plan.is_fully_resolved());
    assert_eq!(plan.placements.len(), 1);
    // Phase 2 starts at Monday 07:00 in catalog order.
    assert_eq!(plan.placements[0].date.weekday(), Weekday::Mon);
    assert_eq!(plan.placements[0].start_time, t("07:00"));
}

#[tokio::test]
async fn test_fully_booked_week_is_unresolved_not_fatal() {
    let repo = LocalRepository::new();
    let course = course_with_modules(&repo, &[2]).await;
    let blocker_course = course_with_modules(&repo, &[1]).await;
    let faculty = FacultyId::new(7);
    // Occupy every catalog slot on every weekday of week 1 (Sep 1 is a
    // Wednesday, so week 1 spans Sep 1-7).
    for day in 1u32..=7 {
        let on = NaiveDate::from_ymd_opt(2027, 9, day).unwrap();
        for slot in time_slots() {
            occupy(&repo, blocker_course, faculty, on, slot, "R1").await;
        }
    }

    let plan = propose_schedule(&repo, course, faculty, &mon_tue_prefs())
        .await
        .unwrap();
    // Week 1 unresolved, week 2 still placed.
    assert_eq!(plan.placements.len(), 1);
    assert_eq!(plan.placements[0].week_number, 2);
    assert_eq!(plan.unresolved.len(), 1);
    assert_eq!(plan.unresolved[0].week_number, 1);
    assert_eq!(
        plan.unresolved[0].reason,
        UnresolvedReason::NoAvailableTimeSlots
    );
}

#[tokio::test]
async fn test_confirm_writes_all_placements() {
    let repo = LocalRepository::new();
    let course = course_with_modules(&repo, &[2, 3]).await;
    let faculty = FacultyId::new(7);

    let plan = propose_schedule(&repo, course, faculty, &mon_tue_prefs())
        .await
        .unwrap();
    let outcome = confirm_schedule(&repo, course, faculty, &plan.placements, false)
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.lectures_created.len(), 5);
    let stored = repo.lectures_for_course(course).await.unwrap();
    assert_eq!(stored.len(), 5);
    assert!(stored.iter().all(|l| l.location.as_deref() == Some("R1")));
}

#[tokio::test]
async fn test_double_confirm_surfaces_conflicts() {
    let repo = LocalRepository::new();
    let course = course_with_modules(&repo, &[2, 3]).await;
    let faculty = FacultyId::new(7);

    let plan = propose_schedule(&repo, course, faculty, &mon_tue_prefs())
        .await
        .unwrap();
    let first = confirm_schedule(&repo, course, faculty, &plan.placements, false)
        .await
        .unwrap();
    assert!(first.success);

    // The identical batch again: every reused date must now collide.
    let second = confirm_schedule(&repo, course, faculty, &plan.placements, false)
        .await
        .unwrap();
    assert!(!second.success);
    assert!(second.lectures_created.is_empty());
    for placed in &plan.placements {
        assert!(
            second.conflicts.iter().any(|c| {
                matches!(c.kind, ConflictKind::Instructor | ConflictKind::Room)
                    && c.lecture_id.is_some()
                    && c.message.contains(&placed.date.to_string())
            }),
            "no conflict reported for {}",
            placed.date
        );
    }
    // Nothing extra was written.
    assert_eq!(repo.lectures_for_course(course).await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_confirm_force_bypasses_revalidation() {
    let repo = LocalRepository::new();
    let course = course_with_modules(&repo, &[1]).await;
    let faculty = FacultyId::new(7);

    let plan = propose_schedule(&repo, course, faculty, &mon_tue_prefs())
        .await
        .unwrap();
    confirm_schedule(&repo, course, faculty, &plan.placements, false)
        .await
        .unwrap();
    let forced = confirm_schedule(&repo, course, faculty, &plan.placements, true)
        .await
        .unwrap();
    assert!(forced.success);
    assert_eq!(repo.lectures_for_course(course).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_confirm_cross_checks_within_batch() {
    let repo = LocalRepository::new();
    let course = course_with_modules(&repo, &[1]).await;
    let faculty = FacultyId::new(7);

    let plan = propose_schedule(&repo, course, faculty, &mon_tue_prefs())
        .await
        .unwrap();
    // Duplicate the single placement inside one batch.
    let mut placements = plan.placements.clone();
    placements.push(plan.placements[0].clone());

    let outcome = confirm_schedule(&repo, course, faculty, &placements, false)
        .await
        .unwrap();
    assert!(!outcome.success);
    assert!(repo.lectures_for_course(course).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_preferences_validated_before_search() {
    let repo = LocalRepository::new();
    let course = course_with_modules(&repo, &[1]).await;

    let mut prefs = mon_tue_prefs();
    prefs.location = None;
    let result = propose_schedule(&repo, course, FacultyId::new(7), &prefs).await;
    assert!(matches!(result, Err(SchedulingError::Validation(_))));

    let mut prefs = mon_tue_prefs();
    prefs.weekdays = Some(vec![Weekday::Sat]);
    let result = propose_schedule(&repo, course, FacultyId::new(7), &prefs).await;
    assert!(matches!(result, Err(SchedulingError::Validation(_))));
}

#[tokio::test]
async fn test_online_preferences_carry_meeting_link() {
    let repo = LocalRepository::new();
    let course = course_with_modules(&repo, &[1]).await;
    let prefs = SchedulePreferences {
        weekdays: Some(vec![Weekday::Wed]),
        slots: None,
        mode: DeliveryMode::Online,
        location: None,
        meeting_link: Some("https://meet.example/inf2100".to_string()),
    };

    let plan = propose_schedule(&repo, course, FacultyId::new(7), &prefs)
        .await
        .unwrap();
    assert_eq!(plan.placements.len(), 1);
    assert_eq!(plan.placements[0].mode, DeliveryMode::Online);
    assert_eq!(
        plan.placements[0].meeting_link.as_deref(),
        Some("https://meet.example/inf2100")
    );
    assert!(plan.placements[0].location.is_none());
}
