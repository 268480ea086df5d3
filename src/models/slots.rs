//! Slot catalog: the fixed inventory of bookable lecture time windows.
//!
//! Four three-hour windows per day and the five weekdays Monday-Friday are
//! the only schedulable combinations. This is configuration shared by the
//! auto-scheduler and the alternative-slot suggester, not derived state.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::time::{format_hhmm, hhmm};

/// A bookable three-hour time window.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl TimeSlot {
    /// Human-readable label, e.g. `"10:00-13:00"`.
    pub fn label(&self) -> String {
        format!("{}-{}", format_hhmm(self.start), format_hhmm(self.end))
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Weekdays eligible for lecture placement, in catalog order.
pub const TEACHING_WEEKDAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

// Fixed catalog windows as (start hour, end hour).
const SLOT_HOURS: [(u32, u32); 4] = [(7, 10), (10, 13), (13, 16), (16, 19)];

fn hour(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).expect("catalog hour is a valid wall-clock time")
}

/// The fixed ordered slot catalog: 07:00-10:00, 10:00-13:00, 13:00-16:00,
/// 16:00-19:00.
pub fn time_slots() -> Vec<TimeSlot> {
    SLOT_HOURS
        .iter()
        .map(|&(start, end)| TimeSlot {
            start: hour(start),
            end: hour(end),
        })
        .collect()
}

/// Look up the catalog slot starting at `start`, if any.
pub fn slot_starting_at(start: NaiveTime) -> Option<TimeSlot> {
    time_slots().into_iter().find(|slot| slot.start == start)
}

/// Parse a weekday name ("monday" or "mon", case-insensitive).
pub fn parse_weekday(s: &str) -> Result<Weekday, String> {
    match s.to_lowercase().as_str() {
        "monday" | "mon" => Ok(Weekday::Mon),
        "tuesday" | "tue" => Ok(Weekday::Tue),
        "wednesday" | "wed" => Ok(Weekday::Wed),
        "thursday" | "thu" => Ok(Weekday::Thu),
        "friday" | "fri" => Ok(Weekday::Fri),
        "saturday" | "sat" => Ok(Weekday::Sat),
        "sunday" | "sun" => Ok(Weekday::Sun),
        _ => Err(format!("Unknown weekday: {}", s)),
    }
}

/// Lowercase full name for a weekday, the inverse of [`parse_weekday`].
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_and_shape() {
        let slots = time_slots();
        assert_eq!(slots.len(), 4);
        assert_eq!(slots[0].label(), "07:00-10:00");
        assert_eq!(slots[1].label(), "10:00-13:00");
        assert_eq!(slots[2].label(), "13:00-16:00");
        assert_eq!(slots[3].label(), "16:00-19:00");
        // Every window is exactly three hours
        for slot in &slots {
            assert_eq!((slot.end - slot.start).num_hours(), 3);
        }
    }

    #[test]
    fn test_slot_starting_at() {
        let slot = slot_starting_at(hour(10)).unwrap();
        assert_eq!(slot.label(), "10:00-13:00");
        assert!(slot_starting_at(hour(11)).is_none());
    }

    #[test]
    fn test_teaching_weekdays() {
        assert_eq!(TEACHING_WEEKDAYS.len(), 5);
        assert!(!TEACHING_WEEKDAYS.contains(&Weekday::Sat));
        assert!(!TEACHING_WEEKDAYS.contains(&Weekday::Sun));
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("Monday").unwrap(), Weekday::Mon);
        assert_eq!(parse_weekday("fri").unwrap(), Weekday::Fri);
        assert!(parse_weekday("someday").is_err());
        assert_eq!(weekday_name(parse_weekday("wednesday").unwrap()), "wednesday");
    }

    #[test]
    fn test_slot_serde() {
        let slot = time_slots()[1];
        let json = serde_json::to_string(&slot).unwrap();
        assert_eq!(json, "{\"start\":\"10:00\",\"end\":\"13:00\"}");
        let back: TimeSlot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, slot);
    }
}
