//! In-memory repository implementation for unit testing and local
//! development.
//!
//! All state lives behind a single `parking_lot::RwLock`, which also gives
//! batch lecture creation its all-or-nothing behavior: the batch is validated
//! and inserted under one write guard, so a failing row leaves the store
//! untouched.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;

use crate::api::{CourseId, FacultyId, LectureId, ModuleId, StudentId};
use crate::db::repository::{
    CourseRepository, EnrollmentRepository, ErrorContext, FullRepository, LectureRepository,
    RepositoryError, RepositoryResult,
};
use crate::models::{Course, CourseModule, Enrollment, Lecture, LectureStatus, NewLecture};

#[derive(Default)]
struct Inner {
    courses: HashMap<i64, Course>,
    modules: HashMap<i64, CourseModule>,
    enrollments: Vec<Enrollment>,
    lectures: BTreeMap<i64, Lecture>,
    next_course_id: i64,
    next_module_id: i64,
    next_lecture_id: i64,
}

impl Inner {
    fn alloc_course_id(&mut self) -> i64 {
        self.next_course_id += 1;
        self.next_course_id
    }

    fn alloc_module_id(&mut self) -> i64 {
        self.next_module_id += 1;
        self.next_module_id
    }

    fn alloc_lecture_id(&mut self) -> i64 {
        self.next_lecture_id += 1;
        self.next_lecture_id
    }

    /// Shared validation for lecture rows before insertion.
    fn validate_new_lecture(&self, lecture: &NewLecture) -> RepositoryResult<()> {
        if !self.courses.contains_key(&lecture.course_id.value()) {
            return Err(RepositoryError::not_found_with_context(
                format!("Course {} not found", lecture.course_id),
                ErrorContext::new("create_lectures")
                    .with_entity("course")
                    .with_entity_id(lecture.course_id),
            ));
        }
        if lecture.end_time <= lecture.start_time {
            return Err(RepositoryError::validation_with_context(
                format!(
                    "Lecture end time {} is not after start time {}",
                    lecture.end_time, lecture.start_time
                ),
                ErrorContext::new("create_lectures").with_entity("lecture"),
            ));
        }
        Ok(())
    }

    fn insert_lecture(&mut self, lecture: &NewLecture) -> Lecture {
        let id = self.alloc_lecture_id();
        let stored = Lecture {
            id: LectureId::new(id),
            course_id: lecture.course_id,
            module_id: lecture.module_id,
            date: lecture.date,
            start_time: lecture.start_time,
            end_time: lecture.end_time,
            mode: lecture.mode,
            location: lecture.location.clone(),
            meeting_link: lecture.meeting_link.clone(),
            topic: lecture.topic.clone(),
            faculty_id: lecture.faculty_id,
            week_number: lecture.week_number,
            status: LectureStatus::Scheduled,
        };
        self.lectures.insert(id, stored.clone());
        stored
    }
}

/// In-memory implementation of [`FullRepository`].
#[derive(Default)]
pub struct LocalRepository {
    inner: RwLock<Inner>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CourseRepository for LocalRepository {
    async fn get_course(&self, id: CourseId) -> RepositoryResult<Course> {
        let inner = self.inner.read();
        inner.courses.get(&id.value()).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Course {} not found", id),
                ErrorContext::new("get_course")
                    .with_entity("course")
                    .with_entity_id(id),
            )
        })
    }

    async fn store_course(&self, course: &Course) -> RepositoryResult<Course> {
        let mut inner = self.inner.write();
        let id = match course.id {
            Some(id) => id.value(),
            None => inner.alloc_course_id(),
        };
        let mut stored = course.clone();
        stored.id = Some(CourseId::new(id));
        inner.courses.insert(id, stored.clone());
        log::debug!("stored course {} ({})", id, stored.code);
        Ok(stored)
    }

    async fn list_modules(&self, course_id: CourseId) -> RepositoryResult<Vec<CourseModule>> {
        let inner = self.inner.read();
        let mut modules: Vec<CourseModule> = inner
            .modules
            .values()
            .filter(|m| m.course_id == course_id)
            .cloned()
            .collect();
        modules.sort_by_key(|m| m.sequence);
        Ok(modules)
    }

    async fn store_module(&self, module: &CourseModule) -> RepositoryResult<CourseModule> {
        let mut inner = self.inner.write();
        if !inner.courses.contains_key(&module.course_id.value()) {
            return Err(RepositoryError::not_found_with_context(
                format!("Course {} not found", module.course_id),
                ErrorContext::new("store_module")
                    .with_entity("course")
                    .with_entity_id(module.course_id),
            ));
        }
        let id = match module.id {
            Some(id) => id.value(),
            None => inner.alloc_module_id(),
        };
        let mut stored = module.clone();
        stored.id = Some(ModuleId::new(id));
        inner.modules.insert(id, stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl EnrollmentRepository for LocalRepository {
    async fn students_in_course(&self, course_id: CourseId) -> RepositoryResult<Vec<StudentId>> {
        let inner = self.inner.read();
        Ok(inner
            .enrollments
            .iter()
            .filter(|e| e.course_id == course_id && e.active)
            .map(|e| e.student_id)
            .collect())
    }

    async fn record_enrollment(&self, enrollment: &Enrollment) -> RepositoryResult<()> {
        let mut inner = self.inner.write();
        if !inner.courses.contains_key(&enrollment.course_id.value()) {
            return Err(RepositoryError::not_found_with_context(
                format!("Course {} not found", enrollment.course_id),
                ErrorContext::new("record_enrollment")
                    .with_entity("course")
                    .with_entity_id(enrollment.course_id),
            ));
        }
        if let Some(existing) = inner
            .enrollments
            .iter_mut()
            .find(|e| e.course_id == enrollment.course_id && e.student_id == enrollment.student_id)
        {
            existing.active = enrollment.active;
        } else {
            inner.enrollments.push(enrollment.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl LectureRepository for LocalRepository {
    async fn get_lecture(&self, id: LectureId) -> RepositoryResult<Lecture> {
        let inner = self.inner.read();
        inner.lectures.get(&id.value()).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Lecture {} not found", id),
                ErrorContext::new("get_lecture")
                    .with_entity("lecture")
                    .with_entity_id(id),
            )
        })
    }

    async fn lectures_on_date(&self, date: NaiveDate) -> RepositoryResult<Vec<Lecture>> {
        let inner = self.inner.read();
        let mut lectures: Vec<Lecture> = inner
            .lectures
            .values()
            .filter(|l| l.date == date && l.is_active())
            .cloned()
            .collect();
        lectures.sort_by_key(|l| l.start_time);
        Ok(lectures)
    }

    async fn lectures_for_course(&self, course_id: CourseId) -> RepositoryResult<Vec<Lecture>> {
        let inner = self.inner.read();
        let mut lectures: Vec<Lecture> = inner
            .lectures
            .values()
            .filter(|l| l.course_id == course_id)
            .cloned()
            .collect();
        lectures.sort_by_key(|l| (l.date, l.start_time));
        Ok(lectures)
    }

    async fn lectures_for_instructor(
        &self,
        faculty_id: FacultyId,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<Lecture>> {
        let inner = self.inner.read();
        let mut lectures: Vec<Lecture> = inner
            .lectures
            .values()
            .filter(|l| l.faculty_id == faculty_id && l.date == date && l.is_active())
            .cloned()
            .collect();
        lectures.sort_by_key(|l| l.start_time);
        Ok(lectures)
    }

    async fn create_lecture(&self, lecture: &NewLecture) -> RepositoryResult<Lecture> {
        let mut inner = self.inner.write();
        inner.validate_new_lecture(lecture)?;
        let stored = inner.insert_lecture(lecture);
        log::debug!("created lecture {} on {}", stored.id, stored.date);
        Ok(stored)
    }

    async fn create_lectures(&self, lectures: &[NewLecture]) -> RepositoryResult<Vec<Lecture>> {
        let mut inner = self.inner.write();
        // Validate the full batch before touching the store so a bad row
        // rolls the whole confirmation back.
        for lecture in lectures {
            inner.validate_new_lecture(lecture)?;
        }
        let stored: Vec<Lecture> = lectures
            .iter()
            .map(|lecture| inner.insert_lecture(lecture))
            .collect();
        log::debug!("created {} lectures in one batch", stored.len());
        Ok(stored)
    }

    async fn update_lecture(&self, lecture: &Lecture) -> RepositoryResult<Lecture> {
        let mut inner = self.inner.write();
        let id = lecture.id.value();
        if !inner.lectures.contains_key(&id) {
            return Err(RepositoryError::not_found_with_context(
                format!("Lecture {} not found", lecture.id),
                ErrorContext::new("update_lecture")
                    .with_entity("lecture")
                    .with_entity_id(lecture.id),
            ));
        }
        inner.lectures.insert(id, lecture.clone());
        Ok(lecture.clone())
    }

    async fn set_lecture_status(
        &self,
        id: LectureId,
        status: LectureStatus,
    ) -> RepositoryResult<Lecture> {
        let mut inner = self.inner.write();
        let lecture = inner.lectures.get_mut(&id.value()).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Lecture {} not found", id),
                ErrorContext::new("set_lecture_status")
                    .with_entity("lecture")
                    .with_entity_id(id),
            )
        })?;
        lecture.status = status;
        Ok(lecture.clone())
    }
}

#[async_trait]
impl FullRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}
