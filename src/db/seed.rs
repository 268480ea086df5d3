//! Demo data for local development.
//!
//! The in-memory backend starts empty, which makes the scheduling endpoints
//! hard to exercise by hand. This loads a small but realistic course so a
//! freshly started local server has something to schedule against.

use crate::api::{CourseId, StudentId};
use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::{Course, CourseModule, Enrollment, SemesterPeriod};

/// Populate a repository with a demo course, its modules and a handful of
/// enrolled students. Returns the id of the created course.
pub async fn seed_demo_data(repo: &dyn FullRepository) -> RepositoryResult<CourseId> {
    let course = repo
        .store_course(&Course {
            id: None,
            code: "CS-301".to_string(),
            title: "Distributed Systems".to_string(),
            credits: 6,
            year: 2025,
            semester: SemesterPeriod::Autumn,
        })
        .await?;
    let course_id = course
        .id
        .ok_or("stored course is missing an id")?;

    let modules = [
        ("Foundations and System Models", 2),
        ("Time, Clocks and Ordering", 3),
        ("Consensus and Replication", 4),
        ("Case Studies", 2),
    ];
    for (sequence, (title, duration_weeks)) in modules.iter().enumerate() {
        repo.store_module(&CourseModule {
            id: None,
            course_id,
            sequence: sequence as i32 + 1,
            title: title.to_string(),
            duration_weeks: *duration_weeks,
        })
        .await?;
    }

    for student in 1..=12i64 {
        repo.record_enrollment(&Enrollment {
            course_id,
            student_id: StudentId::new(student),
            active: true,
        })
        .await?;
    }

    log::info!("seeded demo course {} ({})", course_id, course.code);
    Ok(course_id)
}
