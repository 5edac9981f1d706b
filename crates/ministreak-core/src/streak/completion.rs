//! Sub-task completion tracking.
//!
//! Stamps each sub-task with the day it was done and counts the daily goal
//! once both are stamped with the same day. `last_completion` is the
//! idempotence guard: marking again on an already-counted day is a no-op for
//! the streak.

use chrono::NaiveDate;

use super::record::{StreakRecord, SubTask};

/// Experience credited per counted day when nothing else is configured.
pub const DEFAULT_XP_PER_COMPLETION: u32 = 100;

#[derive(Debug, Clone)]
pub struct CompletionTracker {
    xp_per_completion: u32,
}

impl CompletionTracker {
    pub fn new() -> Self {
        Self {
            xp_per_completion: DEFAULT_XP_PER_COMPLETION,
        }
    }

    pub fn with_xp(xp_per_completion: u32) -> Self {
        Self { xp_per_completion }
    }

    pub fn mark_sub_task_a(&self, record: &mut StreakRecord, today: NaiveDate) -> bool {
        self.mark(record, SubTask::A, today)
    }

    pub fn mark_sub_task_b(&self, record: &mut StreakRecord, today: NaiveDate) -> bool {
        self.mark(record, SubTask::B, today)
    }

    /// Stamp `task` as done `today`, then count the day if both are done.
    ///
    /// Returns `true` when this call incremented the streak.
    pub fn mark(&self, record: &mut StreakRecord, task: SubTask, today: NaiveDate) -> bool {
        record.set_sub_task_date(task, Some(today));
        self.maybe_finish_today(record, today)
    }

    fn maybe_finish_today(&self, record: &mut StreakRecord, today: NaiveDate) -> bool {
        if !record.both_done_on(today) {
            return false;
        }
        if record.last_completion == Some(today) {
            tracing::debug!(%today, "daily goal already counted");
            return false;
        }

        record.credit_completion(today, self.xp_per_completion);
        tracing::info!(
            %today,
            current_streak = record.current_streak,
            best_streak = record.best_streak,
            "daily goal complete"
        );
        true
    }
}

impl Default for CompletionTracker {
    fn default() -> Self {
        Self::new()
    }
}
