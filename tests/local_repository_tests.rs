//! Integration tests for the in-memory repository backend.

use chrono::NaiveDate;

use timetabler::api::{CourseId, FacultyId, StudentId};
use timetabler::db::{CourseRepository, EnrollmentRepository, LectureRepository, LocalRepository};
use timetabler::models::{
    Course, CourseModule, DeliveryMode, Enrollment, LectureStatus, NewLecture, SemesterPeriod,
};

fn t(s: &str) -> chrono::NaiveTime {
    timetabler::models::time::parse_hhmm(s).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn seeded_course(repo: &LocalRepository) -> CourseId {
    let course = repo
        .store_course(&Course {
            id: None,
            code: "INF-1000".to_string(),
            title: "Programming".to_string(),
            credits: 10,
            year: 2027,
            semester: SemesterPeriod::Autumn,
        })
        .await
        .unwrap();
    course.id.unwrap()
}

fn new_lecture(course_id: CourseId, on: NaiveDate, start: &str, end: &str) -> NewLecture {
    NewLecture {
        course_id,
        module_id: None,
        date: on,
        start_time: t(start),
        end_time: t(end),
        mode: DeliveryMode::Physical,
        location: Some("R1".to_string()),
        meeting_link: None,
        topic: "Session".to_string(),
        faculty_id: FacultyId::new(1),
        week_number: 1,
    }
}

#[tokio::test]
async fn test_course_and_module_storage() {
    let repo = LocalRepository::new();
    let course_id = seeded_course(&repo).await;

    let fetched = repo.get_course(course_id).await.unwrap();
    assert_eq!(fetched.code, "INF-1000");

    // Modules come back ordered by sequence regardless of insert order.
    for (seq, title) in [(2, "Second"), (1, "First"), (3, "Third")] {
        repo.store_module(&CourseModule {
            id: None,
            course_id,
            sequence: seq,
            title: title.to_string(),
            duration_weeks: 2,
        })
        .await
        .unwrap();
    }
    let modules = repo.list_modules(course_id).await.unwrap();
    let titles: Vec<_> = modules.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, ["First", "Second", "Third"]);
}

#[tokio::test]
async fn test_unknown_course_is_not_found() {
    let repo = LocalRepository::new();
    let err = repo.get_course(CourseId::new(404)).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_batch_create_is_atomic() {
    let repo = LocalRepository::new();
    let course_id = seeded_course(&repo).await;
    let on = date(2027, 9, 6);

    let good = new_lecture(course_id, on, "07:00", "10:00");
    // End before start makes this row invalid.
    let bad = new_lecture(course_id, on, "13:00", "10:00");

    let result = repo.create_lectures(&[good.clone(), bad]).await;
    assert!(result.is_err());
    // The valid row must not have been written either.
    assert!(repo.lectures_on_date(on).await.unwrap().is_empty());

    // The same batch without the bad row goes through.
    let created = repo.create_lectures(&[good]).await.unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(repo.lectures_on_date(on).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_batch_rejects_unknown_course() {
    let repo = LocalRepository::new();
    let course_id = seeded_course(&repo).await;
    let on = date(2027, 9, 6);

    let good = new_lecture(course_id, on, "07:00", "10:00");
    let orphan = new_lecture(CourseId::new(999), on, "10:00", "13:00");

    let err = repo.create_lectures(&[good, orphan]).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(repo.lectures_on_date(on).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cancellation_is_a_status_transition() {
    let repo = LocalRepository::new();
    let course_id = seeded_course(&repo).await;
    let on = date(2027, 9, 6);
    let lecture = repo
        .create_lecture(&new_lecture(course_id, on, "10:00", "13:00"))
        .await
        .unwrap();

    let cancelled = repo
        .set_lecture_status(lecture.id, LectureStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(cancelled.status, LectureStatus::Cancelled);

    // Date and instructor queries skip cancelled rows...
    assert!(repo.lectures_on_date(on).await.unwrap().is_empty());
    assert!(repo
        .lectures_for_instructor(FacultyId::new(1), on)
        .await
        .unwrap()
        .is_empty());
    // ...but the row itself survives and course listings keep it.
    let fetched = repo.get_lecture(lecture.id).await.unwrap();
    assert_eq!(fetched.status, LectureStatus::Cancelled);
    assert_eq!(repo.lectures_for_course(course_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_lectures_sorted_by_date_then_time() {
    let repo = LocalRepository::new();
    let course_id = seeded_course(&repo).await;
    repo.create_lecture(&new_lecture(course_id, date(2027, 9, 13), "07:00", "10:00"))
        .await
        .unwrap();
    repo.create_lecture(&new_lecture(course_id, date(2027, 9, 6), "13:00", "16:00"))
        .await
        .unwrap();
    repo.create_lecture(&new_lecture(course_id, date(2027, 9, 6), "07:00", "10:00"))
        .await
        .unwrap();

    let lectures = repo.lectures_for_course(course_id).await.unwrap();
    let order: Vec<_> = lectures
        .iter()
        .map(|l| (l.date, l.start_time))
        .collect();
    let mut sorted = order.clone();
    sorted.sort();
    assert_eq!(order, sorted);
}

#[tokio::test]
async fn test_enrollment_active_filter_and_upsert() {
    let repo = LocalRepository::new();
    let course_id = seeded_course(&repo).await;

    for (student, active) in [(1i64, true), (2, true), (3, false)] {
        repo.record_enrollment(&Enrollment {
            course_id,
            student_id: StudentId::new(student),
            active,
        })
        .await
        .unwrap();
    }
    assert_eq!(repo.students_in_course(course_id).await.unwrap().len(), 2);

    // Re-recording flips the existing row instead of duplicating it.
    repo.record_enrollment(&Enrollment {
        course_id,
        student_id: StudentId::new(2),
        active: false,
    })
    .await
    .unwrap();
    assert_eq!(repo.students_in_course(course_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_lecture_replaces_fields() {
    let repo = LocalRepository::new();
    let course_id = seeded_course(&repo).await;
    let lecture = repo
        .create_lecture(&new_lecture(course_id, date(2027, 9, 6), "10:00", "13:00"))
        .await
        .unwrap();

    let mut moved = lecture.clone();
    moved.date = date(2027, 9, 7);
    moved.location = Some("R2".to_string());
    let updated = repo.update_lecture(&moved).await.unwrap();
    assert_eq!(updated.date, date(2027, 9, 7));

    let fetched = repo.get_lecture(lecture.id).await.unwrap();
    assert_eq!(fetched.location.as_deref(), Some("R2"));
    assert!(repo.lectures_on_date(date(2027, 9, 6)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_writes_do_not_lose_rows() {
    let repo = std::sync::Arc::new(LocalRepository::new());
    let course_id = seeded_course(&repo).await;

    let mut handles = Vec::new();
    for day in 1u32..=10 {
        let repo = std::sync::Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            repo.create_lecture(&new_lecture(course_id, date(2027, 9, day), "10:00", "13:00"))
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(repo.lectures_for_course(course_id).await.unwrap().len(), 10);
}
