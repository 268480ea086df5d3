use chrono::{NaiveDate, NaiveTime};
use diesel::prelude::*;
use std::str::FromStr;

use super::schema::{course_modules, courses, enrollments, lectures};
use crate::api::{CourseId, FacultyId, LectureId, ModuleId, StudentId};
use crate::db::repository::RepositoryError;
use crate::models::{
    Course, CourseModule, DeliveryMode, Enrollment, Lecture, LectureStatus, NewLecture,
    SemesterPeriod,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CourseRow {
    pub course_id: i64,
    pub code: String,
    pub title: String,
    pub credits: i32,
    pub year: i32,
    pub semester: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = courses)]
pub struct NewCourseRow {
    pub code: String,
    pub title: String,
    pub credits: i32,
    pub year: i32,
    pub semester: String,
}

impl TryFrom<CourseRow> for Course {
    type Error = RepositoryError;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        let semester = SemesterPeriod::from_str(&row.semester)
            .map_err(|e| RepositoryError::internal(format!("Corrupt semester column: {}", e)))?;
        Ok(Course {
            id: Some(CourseId::new(row.course_id)),
            code: row.code,
            title: row.title,
            credits: row.credits,
            year: row.year,
            semester,
        })
    }
}

impl From<&Course> for NewCourseRow {
    fn from(course: &Course) -> Self {
        Self {
            code: course.code.clone(),
            title: course.title.clone(),
            credits: course.credits,
            year: course.year,
            semester: course.semester.to_string(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = course_modules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CourseModuleRow {
    pub module_id: i64,
    pub course_id: i64,
    pub sequence: i32,
    pub title: String,
    pub duration_weeks: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = course_modules)]
pub struct NewCourseModuleRow {
    pub course_id: i64,
    pub sequence: i32,
    pub title: String,
    pub duration_weeks: i32,
}

impl From<CourseModuleRow> for CourseModule {
    fn from(row: CourseModuleRow) -> Self {
        CourseModule {
            id: Some(ModuleId::new(row.module_id)),
            course_id: CourseId::new(row.course_id),
            sequence: row.sequence,
            title: row.title,
            duration_weeks: row.duration_weeks,
        }
    }
}

impl From<&CourseModule> for NewCourseModuleRow {
    fn from(module: &CourseModule) -> Self {
        Self {
            course_id: module.course_id.value(),
            sequence: module.sequence,
            title: module.title.clone(),
            duration_weeks: module.duration_weeks,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = enrollments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EnrollmentRow {
    pub course_id: i64,
    pub student_id: i64,
    pub active: bool,
}

impl From<EnrollmentRow> for Enrollment {
    fn from(row: EnrollmentRow) -> Self {
        Enrollment {
            course_id: CourseId::new(row.course_id),
            student_id: StudentId::new(row.student_id),
            active: row.active,
        }
    }
}

impl From<&Enrollment> for EnrollmentRow {
    fn from(enrollment: &Enrollment) -> Self {
        Self {
            course_id: enrollment.course_id.value(),
            student_id: enrollment.student_id.value(),
            active: enrollment.active,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = lectures)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LectureRow {
    pub lecture_id: i64,
    pub course_id: i64,
    pub module_id: Option<i64>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub mode: String,
    pub location: Option<String>,
    pub meeting_link: Option<String>,
    pub topic: String,
    pub faculty_id: i64,
    pub week_number: i32,
    pub status: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = lectures)]
pub struct NewLectureRow {
    pub course_id: i64,
    pub module_id: Option<i64>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub mode: String,
    pub location: Option<String>,
    pub meeting_link: Option<String>,
    pub topic: String,
    pub faculty_id: i64,
    pub week_number: i32,
    pub status: String,
}

impl TryFrom<LectureRow> for Lecture {
    type Error = RepositoryError;

    fn try_from(row: LectureRow) -> Result<Self, Self::Error> {
        let mode = DeliveryMode::from_str(&row.mode)
            .map_err(|e| RepositoryError::internal(format!("Corrupt mode column: {}", e)))?;
        let status = LectureStatus::from_str(&row.status)
            .map_err(|e| RepositoryError::internal(format!("Corrupt status column: {}", e)))?;
        Ok(Lecture {
            id: LectureId::new(row.lecture_id),
            course_id: CourseId::new(row.course_id),
            module_id: row.module_id.map(ModuleId::new),
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            mode,
            location: row.location,
            meeting_link: row.meeting_link,
            topic: row.topic,
            faculty_id: FacultyId::new(row.faculty_id),
            week_number: row.week_number,
            status,
        })
    }
}

impl From<&NewLecture> for NewLectureRow {
    fn from(lecture: &NewLecture) -> Self {
        Self {
            course_id: lecture.course_id.value(),
            module_id: lecture.module_id.map(|m| m.value()),
            date: lecture.date,
            start_time: lecture.start_time,
            end_time: lecture.end_time,
            mode: lecture.mode.to_string(),
            location: lecture.location.clone(),
            meeting_link: lecture.meeting_link.clone(),
            topic: lecture.topic.clone(),
            faculty_id: lecture.faculty_id.value(),
            week_number: lecture.week_number,
            status: LectureStatus::Scheduled.to_string(),
        }
    }
}
