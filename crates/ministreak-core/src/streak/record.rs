//! The streak record: single source of truth for streak numbers and dates.
//!
//! Dates are UTC calendar dates. `None` stands for "never", which maps to an
//! empty string in persistence.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Persisted date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One of the two independent daily actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubTask {
    A,
    B,
}

impl SubTask {
    pub const ALL: [SubTask; 2] = [SubTask::A, SubTask::B];

    pub fn index(self) -> usize {
        match self {
            SubTask::A => 0,
            SubTask::B => 1,
        }
    }
}

impl std::str::FromStr for SubTask {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" => Ok(SubTask::A),
            "b" => Ok(SubTask::B),
            other => Err(format!("unknown sub-task '{other}' (expected 'a' or 'b')")),
        }
    }
}

/// Mutable streak state, owned by the session and lent to each service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRecord {
    /// Consecutive completed days.
    pub current_streak: u32,
    /// High-water mark of `current_streak`.
    pub best_streak: u32,
    /// Remaining forgiveness credits.
    pub freeze_count: u32,
    /// Accumulated experience, credited once per completed day.
    pub lifetime_xp: u32,
    /// Last date the rollover check observed.
    pub last_seen: Option<NaiveDate>,
    pub last_sub_task_a: Option<NaiveDate>,
    pub last_sub_task_b: Option<NaiveDate>,
    /// Last date the combined daily goal was counted.
    pub last_completion: Option<NaiveDate>,
    /// Last date a reminder was shown.
    pub last_announcement: Option<NaiveDate>,
}

impl StreakRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sub_task_date(&self, task: SubTask) -> Option<NaiveDate> {
        match task {
            SubTask::A => self.last_sub_task_a,
            SubTask::B => self.last_sub_task_b,
        }
    }

    pub fn set_sub_task_date(&mut self, task: SubTask, date: Option<NaiveDate>) {
        match task {
            SubTask::A => self.last_sub_task_a = date,
            SubTask::B => self.last_sub_task_b = date,
        }
    }

    pub fn sub_task_done_on(&self, task: SubTask, day: NaiveDate) -> bool {
        self.sub_task_date(task) == Some(day)
    }

    /// Both sub-tasks stamped with `day`.
    pub fn both_done_on(&self, day: NaiveDate) -> bool {
        SubTask::ALL.iter().all(|t| self.sub_task_done_on(*t, day))
    }

    /// Neither sub-task stamped with `day`.
    pub fn none_done_on(&self, day: NaiveDate) -> bool {
        !SubTask::ALL.iter().any(|t| self.sub_task_done_on(*t, day))
    }

    /// Count the goal for `day`: bump the streak and raise the high-water mark.
    pub(crate) fn credit_completion(&mut self, day: NaiveDate, xp: u32) {
        self.current_streak = self.current_streak.saturating_add(1);
        self.best_streak = self.best_streak.max(self.current_streak);
        self.lifetime_xp = self.lifetime_xp.saturating_add(xp);
        self.last_completion = Some(day);
    }

    /// Restore `best_streak >= current_streak` after loading external data.
    pub fn normalize(&mut self) {
        self.best_streak = self.best_streak.max(self.current_streak);
    }
}

/// Parse a stored `YYYY-MM-DD` string. Empty or malformed input is `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::debug!(value = raw, error = %e, "ignoring malformed stored date");
            None
        }
    }
}

/// Format a date for storage; `None` becomes the empty string.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn default_record_is_empty() {
        let r = StreakRecord::new();
        assert_eq!(r.current_streak, 0);
        assert_eq!(r.best_streak, 0);
        assert_eq!(r.freeze_count, 0);
        assert!(r.last_seen.is_none());
        assert!(r.last_completion.is_none());
    }

    #[test]
    fn parse_date_accepts_iso_and_rejects_garbage() {
        assert_eq!(parse_date("2025-03-04"), Some(day(4)));
        assert_eq!(parse_date(" 2025-03-04 "), Some(day(4)));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2025-13-40"), None);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn format_date_uses_empty_string_for_none() {
        assert_eq!(format_date(None), "");
        assert_eq!(format_date(Some(day(9))), "2025-03-09");
    }

    #[test]
    fn both_done_requires_same_day() {
        let mut r = StreakRecord::new();
        r.last_sub_task_a = Some(day(1));
        r.last_sub_task_b = Some(day(2));
        assert!(!r.both_done_on(day(2)));
        assert!(!r.none_done_on(day(2)));
        r.last_sub_task_a = Some(day(2));
        assert!(r.both_done_on(day(2)));
        assert!(r.none_done_on(day(3)));
    }

    #[test]
    fn normalize_lifts_best_streak() {
        let mut r = StreakRecord {
            current_streak: 7,
            best_streak: 3,
            ..Default::default()
        };
        r.normalize();
        assert_eq!(r.best_streak, 7);
    }

    #[test]
    fn sub_task_parses_case_insensitively() {
        assert_eq!("A".parse::<SubTask>().unwrap(), SubTask::A);
        assert_eq!("b".parse::<SubTask>().unwrap(), SubTask::B);
        assert!("c".parse::<SubTask>().is_err());
    }
}
