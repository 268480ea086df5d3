//! Repository trait definitions.
//!
//! The engine never talks to a database directly; it goes through these
//! traits so storage backends can be swapped and tests can run against the
//! in-memory implementation. Traits are split per concern and combined by
//! [`FullRepository`].

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::api::{CourseId, FacultyId, LectureId, StudentId};
use crate::models::{Course, CourseModule, Enrollment, Lecture, LectureStatus, NewLecture};

/// Courses and their module lists, owned by the course-management subsystem.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Fetch a course by id.
    async fn get_course(&self, id: CourseId) -> RepositoryResult<Course>;

    /// Insert or update a course; returns the stored record with its id.
    async fn store_course(&self, course: &Course) -> RepositoryResult<Course>;

    /// Modules of a course ordered by sequence number.
    async fn list_modules(&self, course_id: CourseId) -> RepositoryResult<Vec<CourseModule>>;

    /// Insert or update a module; returns the stored record with its id.
    async fn store_module(&self, module: &CourseModule) -> RepositoryResult<CourseModule>;
}

/// Student-to-course memberships, owned by the enrollment subsystem.
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Active students enrolled in a course.
    async fn students_in_course(&self, course_id: CourseId) -> RepositoryResult<Vec<StudentId>>;

    /// Record (or reactivate) an enrollment.
    async fn record_enrollment(&self, enrollment: &Enrollment) -> RepositoryResult<()>;
}

/// The persisted table of concrete lecture sessions.
#[async_trait]
pub trait LectureRepository: Send + Sync {
    /// Fetch a lecture by id.
    async fn get_lecture(&self, id: LectureId) -> RepositoryResult<Lecture>;

    /// All non-cancelled lectures on a calendar date, across every course.
    async fn lectures_on_date(&self, date: NaiveDate) -> RepositoryResult<Vec<Lecture>>;

    /// All lectures of a course (any status), ordered by date then start time.
    async fn lectures_for_course(&self, course_id: CourseId) -> RepositoryResult<Vec<Lecture>>;

    /// Non-cancelled lectures taught by an instructor on a date.
    async fn lectures_for_instructor(
        &self,
        faculty_id: FacultyId,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<Lecture>>;

    /// Insert a single lecture row.
    async fn create_lecture(&self, lecture: &NewLecture) -> RepositoryResult<Lecture>;

    /// Insert a batch of lecture rows atomically: either every row is created
    /// or none are.
    async fn create_lectures(&self, lectures: &[NewLecture]) -> RepositoryResult<Vec<Lecture>>;

    /// Replace the mutable fields of an existing lecture.
    async fn update_lecture(&self, lecture: &Lecture) -> RepositoryResult<Lecture>;

    /// Transition a lecture's status. Cancellation goes through here; rows
    /// are never deleted.
    async fn set_lecture_status(
        &self,
        id: LectureId,
        status: LectureStatus,
    ) -> RepositoryResult<Lecture>;
}

/// Combined repository interface used by the service layer and HTTP state.
#[async_trait]
pub trait FullRepository:
    CourseRepository + EnrollmentRepository + LectureRepository
{
    /// Verify the backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;
}
