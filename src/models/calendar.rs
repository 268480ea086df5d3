//! Semester calendar model.
//!
//! Pure functions mapping a (year, semester period) pair to a concrete start
//! date and mapping any date to a 1-based week number within that semester.
//! Weeks 1-13 are teaching weeks; weeks 14-16 are the examination period.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Number of teaching weeks in a semester.
pub const TEACHING_WEEKS: i32 = 13;

/// First week of the examination period.
pub const EXAM_WEEK_START: i32 = 14;

/// Last week of the examination period.
pub const EXAM_WEEK_END: i32 = 16;

/// Semester period within a calendar year.
///
/// Three periods per year, each spanning four calendar months.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemesterPeriod {
    /// January through April.
    Spring,
    /// May through August.
    Summer,
    /// September through December.
    Autumn,
}

impl SemesterPeriod {
    /// First calendar month of the period (1-based).
    pub fn start_month(&self) -> u32 {
        match self {
            SemesterPeriod::Spring => 1,
            SemesterPeriod::Summer => 5,
            SemesterPeriod::Autumn => 9,
        }
    }

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SemesterPeriod::Spring => "spring",
            SemesterPeriod::Summer => "summer",
            SemesterPeriod::Autumn => "autumn",
        }
    }
}

impl FromStr for SemesterPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spring" => Ok(SemesterPeriod::Spring),
            "summer" => Ok(SemesterPeriod::Summer),
            "autumn" | "fall" => Ok(SemesterPeriod::Autumn),
            _ => Err(format!("Unknown semester period: {}", s)),
        }
    }
}

impl std::fmt::Display for SemesterPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// First calendar day of the given semester.
///
/// The month boundaries are fixed configuration; an invalid (year, month)
/// combination cannot occur for the supported periods.
pub fn semester_start(year: i32, period: SemesterPeriod) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, period.start_month(), 1)
        .unwrap_or_else(|| panic!("invalid semester start {}-{}", year, period.start_month()))
}

/// 1-based week number of `date` within the semester starting at `start`.
///
/// Computed as `floor((date - start) / 7 days) + 1` with no upper clamp;
/// dates before the semester start yield week numbers <= 0. Callers use the
/// raw value to classify teaching vs. exam weeks.
pub fn week_number(date: NaiveDate, start: NaiveDate) -> i32 {
    // chrono's representable date range keeps the week count far inside i32.
    ((date - start).num_days().div_euclid(7) + 1) as i32
}

/// True for weeks 14-16 inclusive (the examination period).
pub fn is_exam_week(week: i32) -> bool {
    (EXAM_WEEK_START..=EXAM_WEEK_END).contains(&week)
}

/// True for weeks 1-13 inclusive (the regular teaching period).
pub fn is_teaching_week(week: i32) -> bool {
    (1..=TEACHING_WEEKS).contains(&week)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_semester_start_dates() {
        assert_eq!(
            semester_start(2026, SemesterPeriod::Spring),
            date(2026, 1, 1)
        );
        assert_eq!(
            semester_start(2026, SemesterPeriod::Summer),
            date(2026, 5, 1)
        );
        assert_eq!(
            semester_start(2026, SemesterPeriod::Autumn),
            date(2026, 9, 1)
        );
    }

    #[test]
    fn test_week_number_first_week() {
        let start = date(2026, 1, 1);
        assert_eq!(week_number(start, start), 1);
        assert_eq!(week_number(date(2026, 1, 7), start), 1);
        assert_eq!(week_number(date(2026, 1, 8), start), 2);
    }

    #[test]
    fn test_week_number_no_upper_clamp() {
        let start = date(2026, 1, 1);
        // 15 full weeks after start lands in week 16
        assert_eq!(week_number(start + chrono::Days::new(15 * 7), start), 16);
        assert_eq!(week_number(start + chrono::Days::new(20 * 7), start), 21);
    }

    #[test]
    fn test_week_number_before_start_floors() {
        let start = date(2026, 5, 1);
        assert_eq!(week_number(date(2026, 4, 30), start), 0);
        assert_eq!(week_number(date(2026, 4, 24), start), 0);
        assert_eq!(week_number(date(2026, 4, 23), start), -1);
    }

    #[test]
    fn test_exam_and_teaching_classification() {
        for week in 1..=13 {
            assert!(is_teaching_week(week), "week {} should teach", week);
            assert!(!is_exam_week(week));
        }
        for week in 14..=16 {
            assert!(is_exam_week(week), "week {} should be exams", week);
            assert!(!is_teaching_week(week));
        }
        assert!(!is_teaching_week(0));
        assert!(!is_teaching_week(14));
        assert!(!is_exam_week(17));
    }

    #[test]
    fn test_period_parsing() {
        assert_eq!(
            "spring".parse::<SemesterPeriod>().unwrap(),
            SemesterPeriod::Spring
        );
        assert_eq!(
            "Fall".parse::<SemesterPeriod>().unwrap(),
            SemesterPeriod::Autumn
        );
        assert!("winter".parse::<SemesterPeriod>().is_err());
    }

    #[test]
    fn test_period_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&SemesterPeriod::Autumn).unwrap(),
            "\"autumn\""
        );
        let p: SemesterPeriod = serde_json::from_str("\"summer\"").unwrap();
        assert_eq!(p, SemesterPeriod::Summer);
    }
}
