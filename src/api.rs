//! Public API surface for the scheduling engine.
//!
//! This file consolidates the identifier newtypes and re-exports the DTO
//! types for the HTTP API. All types derive Serialize/Deserialize for JSON
//! serialization.

pub use crate::routes::autoschedule::ConfirmOutcome;
pub use crate::routes::autoschedule::ModuleLoad;
pub use crate::routes::autoschedule::PlannedLecture;
pub use crate::routes::autoschedule::SchedulePlan;
pub use crate::routes::autoschedule::UnresolvedReason;
pub use crate::routes::autoschedule::UnresolvedSlot;
pub use crate::routes::conflicts::Conflict;
pub use crate::routes::conflicts::ConflictKind;
pub use crate::routes::conflicts::ConflictReport;
pub use crate::routes::conflicts::ConflictSeverity;
pub use crate::routes::conflicts::SlotSuggestion;

use serde::{Deserialize, Serialize};

/// Course identifier (database primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CourseId(pub i64);

/// Course module identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleId(pub i64);

/// Lecture identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LectureId(pub i64);

/// Faculty member (instructor) identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FacultyId(pub i64);

/// Student identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudentId(pub i64);

impl CourseId {
    pub fn new(value: i64) -> Self {
        CourseId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl ModuleId {
    pub fn new(value: i64) -> Self {
        ModuleId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl LectureId {
    pub fn new(value: i64) -> Self {
        LectureId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl FacultyId {
    pub fn new(value: i64) -> Self {
        FacultyId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl StudentId {
    pub fn new(value: i64) -> Self {
        StudentId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for CourseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for LectureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for FacultyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for StudentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<CourseId> for i64 {
    fn from(id: CourseId) -> Self {
        id.0
    }
}
impl From<ModuleId> for i64 {
    fn from(id: ModuleId) -> Self {
        id.0
    }
}
impl From<LectureId> for i64 {
    fn from(id: LectureId) -> Self {
        id.0
    }
}
impl From<FacultyId> for i64 {
    fn from(id: FacultyId) -> Self {
        id.0
    }
}
impl From<StudentId> for i64 {
    fn from(id: StudentId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_newtype_roundtrip() {
        let id = CourseId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(format!("{}", id), "42");
    }

    #[test]
    fn test_id_serde() {
        let id = LectureId::new(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        let back: LectureId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
