//! Conflict report data types.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::api::{CourseId, LectureId};
use crate::models::time::hhmm;

/// Rule that a proposed placement violates.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Instructor double-booking.
    Instructor,
    /// Room double-booking (physical lectures sharing a location).
    Room,
    /// Student-cohort overlap between two courses sharing enrolled students.
    Student,
    /// Placement falls in the examination period (weeks 14-16).
    ExamPeriod,
    /// Placement date is in the past.
    PastDate,
    /// Placement date is a Saturday or Sunday.
    Weekend,
}

impl ConflictKind {
    /// Severity associated with this rule.
    pub fn severity(&self) -> ConflictSeverity {
        match self {
            ConflictKind::Instructor
            | ConflictKind::Room
            | ConflictKind::Student
            | ConflictKind::ExamPeriod => ConflictSeverity::Error,
            ConflictKind::PastDate | ConflictKind::Weekend => ConflictSeverity::Warning,
        }
    }
}

/// Whether a conflict blocks saving or is merely advisory.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictSeverity {
    /// Must be resolved or force-overridden before a lecture can be saved.
    Error,
    /// Advisory; does not by itself prevent saving.
    Warning,
}

/// A single rule violation for a proposed placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub severity: ConflictSeverity,
    pub message: String,
    /// The existing lecture this placement collides with, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lecture_id: Option<LectureId>,
    /// The course owning the colliding lecture, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<CourseId>,
    /// Distinct students double-booked by this collision (student kind only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_students: Option<usize>,
}

impl Conflict {
    /// Build a conflict with the severity implied by its kind.
    pub fn new(kind: ConflictKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            message: message.into(),
            lecture_id: None,
            course_id: None,
            affected_students: None,
        }
    }

    pub fn with_lecture(mut self, id: LectureId) -> Self {
        self.lecture_id = Some(id);
        self
    }

    pub fn with_course(mut self, id: CourseId) -> Self {
        self.course_id = Some(id);
        self
    }

    pub fn with_affected_students(mut self, count: usize) -> Self {
        self.affected_students = Some(count);
        self
    }

    pub fn is_blocking(&self) -> bool {
        self.severity == ConflictSeverity::Error
    }
}

/// Ordered list of conflicts for one proposed placement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConflictReport {
    pub conflicts: Vec<Conflict>,
}

impl ConflictReport {
    pub fn new(conflicts: Vec<Conflict>) -> Self {
        Self { conflicts }
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Count of error-severity conflicts.
    pub fn blocking_count(&self) -> usize {
        self.conflicts.iter().filter(|c| c.is_blocking()).count()
    }

    /// Count of warning-severity conflicts.
    pub fn warning_count(&self) -> usize {
        self.conflicts.iter().filter(|c| !c.is_blocking()).count()
    }
}

/// An open same-day slot offered as an alternative to a conflicting one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotSuggestion {
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub label: String,
}

/// Conflict-check route function name constant
pub const CHECK_CONFLICTS: &str = "check_conflicts";
