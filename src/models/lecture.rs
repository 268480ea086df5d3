//! Lecture records and placement inputs.
//!
//! The `Lecture` is the central mutable entity the engine protects from
//! conflicts. Lectures are never hard-deleted; cancellation is a status
//! transition that preserves any attendance already recorded against them.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::time::hhmm;
use crate::api::{CourseId, FacultyId, LectureId, ModuleId};

/// How a lecture session is delivered.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Requires a location.
    Physical,
    /// Requires a meeting link.
    Online,
}

impl std::fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryMode::Physical => write!(f, "physical"),
            DeliveryMode::Online => write!(f, "online"),
        }
    }
}

impl std::str::FromStr for DeliveryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "physical" => Ok(DeliveryMode::Physical),
            "online" => Ok(DeliveryMode::Online),
            _ => Err(format!("Unknown delivery mode: {}", s)),
        }
    }
}

/// Lifecycle status of a lecture.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LectureStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl std::fmt::Display for LectureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LectureStatus::Scheduled => write!(f, "scheduled"),
            LectureStatus::Completed => write!(f, "completed"),
            LectureStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for LectureStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scheduled" => Ok(LectureStatus::Scheduled),
            "completed" => Ok(LectureStatus::Completed),
            "cancelled" => Ok(LectureStatus::Cancelled),
            _ => Err(format!("Unknown lecture status: {}", s)),
        }
    }
}

/// A concrete scheduled lecture session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lecture {
    pub id: LectureId,
    pub course_id: CourseId,
    pub module_id: Option<ModuleId>,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub mode: DeliveryMode,
    /// Required iff `mode` is physical.
    pub location: Option<String>,
    /// Required iff `mode` is online.
    pub meeting_link: Option<String>,
    pub topic: String,
    pub faculty_id: FacultyId,
    /// Week number within the course semester, computed at write time.
    pub week_number: i32,
    pub status: LectureStatus,
}

impl Lecture {
    /// Whether this lecture still occupies its calendar slot.
    pub fn is_active(&self) -> bool {
        self.status != LectureStatus::Cancelled
    }
}

/// A lecture row pending insertion (no id assigned yet).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLecture {
    pub course_id: CourseId,
    pub module_id: Option<ModuleId>,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub mode: DeliveryMode,
    pub location: Option<String>,
    pub meeting_link: Option<String>,
    pub topic: String,
    pub faculty_id: FacultyId,
    pub week_number: i32,
}

/// A proposed placement to be checked for conflicts.
///
/// This is the conflict detector's input: not yet a lecture, just a
/// (date, time window, instructor, course, optional room) tuple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LecturePlacement {
    pub course_id: CourseId,
    pub faculty_id: FacultyId,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    #[serde(default)]
    pub mode: Option<DeliveryMode>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Half-open interval overlap test shared by every conflict dimension.
///
/// Two windows `[a_start, a_end)` and `[b_start, b_end)` overlap iff
/// `a_start < b_end && a_end > b_start`.
pub fn overlaps(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    a_start < b_end && a_end > b_start
}

impl LecturePlacement {
    /// Whether this placement overlaps the given lecture's time window on the
    /// same date. Cancelled lectures never overlap anything.
    pub fn overlaps_lecture(&self, lecture: &Lecture) -> bool {
        lecture.is_active()
            && lecture.date == self.date
            && overlaps(
                self.start_time,
                self.end_time,
                lecture.start_time,
                lecture.end_time,
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::time::parse_hhmm;

    fn t(s: &str) -> NaiveTime {
        parse_hhmm(s).unwrap()
    }

    #[test]
    fn test_overlap_predicate() {
        // identical windows
        assert!(overlaps(t("10:00"), t("13:00"), t("10:00"), t("13:00")));
        // partial overlap
        assert!(overlaps(t("10:00"), t("13:00"), t("12:00"), t("15:00")));
        // containment
        assert!(overlaps(t("09:00"), t("19:00"), t("10:00"), t("13:00")));
        // back-to-back windows do not overlap (half-open intervals)
        assert!(!overlaps(t("07:00"), t("10:00"), t("10:00"), t("13:00")));
        assert!(!overlaps(t("13:00"), t("16:00"), t("10:00"), t("13:00")));
        // disjoint
        assert!(!overlaps(t("07:00"), t("10:00"), t("16:00"), t("19:00")));
    }

    fn sample_lecture(status: LectureStatus) -> Lecture {
        Lecture {
            id: LectureId::new(1),
            course_id: CourseId::new(10),
            module_id: None,
            date: NaiveDate::from_ymd_opt(2026, 9, 7).unwrap(),
            start_time: t("10:00"),
            end_time: t("13:00"),
            mode: DeliveryMode::Physical,
            location: Some("R1".to_string()),
            meeting_link: None,
            topic: "Intro".to_string(),
            faculty_id: FacultyId::new(5),
            week_number: 1,
            status,
        }
    }

    #[test]
    fn test_placement_overlap_skips_cancelled() {
        let placement = LecturePlacement {
            course_id: CourseId::new(11),
            faculty_id: FacultyId::new(5),
            date: NaiveDate::from_ymd_opt(2026, 9, 7).unwrap(),
            start_time: t("11:00"),
            end_time: t("14:00"),
            mode: Some(DeliveryMode::Physical),
            location: Some("R1".to_string()),
        };
        assert!(placement.overlaps_lecture(&sample_lecture(LectureStatus::Scheduled)));
        assert!(!placement.overlaps_lecture(&sample_lecture(LectureStatus::Cancelled)));
    }

    #[test]
    fn test_lecture_serde_hhmm() {
        let lecture = sample_lecture(LectureStatus::Scheduled);
        let json = serde_json::to_value(&lecture).unwrap();
        assert_eq!(json["start_time"], "10:00");
        assert_eq!(json["end_time"], "13:00");
        assert_eq!(json["mode"], "physical");
        assert_eq!(json["status"], "scheduled");
    }
}
