use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::streak::{Announcement, RolloverVerdict, SubTask};

/// Every state change in a streak session produces an Event.
/// Hosts use them to drive sounds, toasts and panels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// First observation of a fresh record.
    DaySeeded { today: NaiveDate },
    /// A UTC midnight passed since the last observation.
    DayRolledOver {
        previous: NaiveDate,
        today: NaiveDate,
        verdict: RolloverVerdict,
        current_streak: u32,
        freeze_count: u32,
    },
    /// A sub-task was stamped as done.
    SubTaskMarked { task: SubTask, today: NaiveDate },
    /// The first of the two sub-tasks was done today.
    Halfway { task: SubTask, today: NaiveDate },
    /// Both sub-tasks done; the streak was credited.
    DayCompleted {
        today: NaiveDate,
        current_streak: u32,
        best_streak: u32,
    },
    /// The daily reminder gate ran.
    Reminder {
        today: NaiveDate,
        announcement: Announcement,
    },
    /// A host message was recognized as a sub-task.
    MessageMatched { task: SubTask },
    /// The record could not be written.
    SaveFailed { message: String },
}
