//! Course, module and enrollment records.
//!
//! These are owned by the surrounding course-management and enrollment
//! subsystems; the engine reads them to derive the teaching calendar and the
//! student-cohort conflict rule.

use serde::{Deserialize, Serialize};

use super::calendar::{semester_start, SemesterPeriod};
use crate::api::{CourseId, ModuleId, StudentId};

/// A course as seen by the scheduling engine.
///
/// Read-only here except for the semester fields used to compute the
/// teaching calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: Option<CourseId>,
    pub code: String,
    pub title: String,
    pub credits: i32,
    /// Calendar year the semester belongs to.
    pub year: i32,
    /// Semester period resolved to a concrete start month.
    pub semester: SemesterPeriod,
}

impl Course {
    /// First calendar day of this course's semester.
    pub fn semester_start(&self) -> chrono::NaiveDate {
        semester_start(self.year, self.semester)
    }
}

/// A teaching module within a course.
///
/// Modules are immutable inputs to scheduling; the sequence number defines
/// teaching order and the duration constrains the schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseModule {
    pub id: Option<ModuleId>,
    pub course_id: CourseId,
    /// 1..N teaching order within the course.
    pub sequence: i32,
    pub title: String,
    /// Duration in whole weeks.
    pub duration_weeks: i32,
}

/// Student-to-course membership.
///
/// Used only to derive which students would be double-booked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub course_id: CourseId,
    pub student_id: StudentId,
    /// Inactive enrollments (withdrawn students) do not block scheduling.
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_semester_start() {
        let course = Course {
            id: Some(CourseId::new(1)),
            code: "INF-2100".to_string(),
            title: "Algorithms".to_string(),
            credits: 10,
            year: 2026,
            semester: SemesterPeriod::Autumn,
        };
        assert_eq!(
            course.semester_start(),
            chrono::NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
        );
    }

    #[test]
    fn test_module_serde() {
        let module = CourseModule {
            id: Some(ModuleId::new(3)),
            course_id: CourseId::new(1),
            sequence: 2,
            title: "Graph algorithms".to_string(),
            duration_weeks: 3,
        };
        let json = serde_json::to_string(&module).unwrap();
        let back: CourseModule = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sequence, 2);
        assert_eq!(back.duration_weeks, 3);
    }
}
