//! UTC day-rollover detection.
//!
//! Evaluated on every tick. The state machine is driven by the pair
//! (`last_seen`, today):
//!
//! ```text
//! Uninitialized --(any tick)--> Seeded
//! Seeded --(same day)--> Seeded                      (no-op)
//! Seeded --(day changed)--> evaluate yesterday --> Seeded
//! ```
//!
//! Only "yesterday relative to today" is evaluated. A gap of several days
//! (the tick source was paused) collapses into one decision, so at most one
//! freeze is consumed per rollover.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::record::StreakRecord;

/// What a rollover decided about the previous day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RolloverVerdict {
    /// Yesterday was fully completed.
    Completed,
    /// Yesterday was missed and a freeze credit covered it.
    Frozen,
    /// Yesterday was missed with no freeze left; streak reset.
    Reset,
}

/// Result of a single rollover check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RolloverOutcome {
    /// First observation; `last_seen` was empty.
    Seeded { today: NaiveDate },
    /// Still the same UTC day.
    SameDay,
    /// At least one UTC midnight passed since `previous`.
    Rolled {
        previous: NaiveDate,
        today: NaiveDate,
        verdict: RolloverVerdict,
    },
}

impl RolloverOutcome {
    /// `last_seen` changed as a result of this check.
    pub fn rolled(&self) -> bool {
        matches!(self, RolloverOutcome::Rolled { .. })
    }

    /// The missed day was forgiven by a freeze credit.
    pub fn used_freeze(&self) -> bool {
        matches!(
            self,
            RolloverOutcome::Rolled {
                verdict: RolloverVerdict::Frozen,
                ..
            }
        )
    }

    /// The streak was reset to zero.
    pub fn reset(&self) -> bool {
        matches!(
            self,
            RolloverOutcome::Rolled {
                verdict: RolloverVerdict::Reset,
                ..
            }
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RolloverGuard;

impl RolloverGuard {
    pub fn new() -> Self {
        Self
    }

    /// Detect a UTC day change since the last observation and apply the
    /// miss/freeze/reset policy.
    pub fn check(&self, record: &mut StreakRecord, today: NaiveDate) -> RolloverOutcome {
        let previous = match record.last_seen {
            None => {
                record.last_seen = Some(today);
                tracing::debug!(%today, "seeded last seen date");
                return RolloverOutcome::Seeded { today };
            }
            Some(seen) if seen == today => return RolloverOutcome::SameDay,
            Some(seen) => seen,
        };

        let verdict = match today.pred_opt() {
            Some(yesterday) if record.both_done_on(yesterday) => RolloverVerdict::Completed,
            _ => apply_miss(record),
        };
        record.last_seen = Some(today);

        tracing::info!(
            %previous,
            %today,
            ?verdict,
            current_streak = record.current_streak,
            freeze_count = record.freeze_count,
            "UTC day rolled over"
        );

        RolloverOutcome::Rolled {
            previous,
            today,
            verdict,
        }
    }
}

fn apply_miss(record: &mut StreakRecord) -> RolloverVerdict {
    if record.freeze_count > 0 {
        record.freeze_count -= 1;
        RolloverVerdict::Frozen
    } else {
        record.current_streak = 0;
        RolloverVerdict::Reset
    }
}
