//! Once-per-UTC-day reminder.
//!
//! Separate from the completion guard: `last_announcement` records the day a
//! reminder was considered, whether or not a message was actually shown.

use std::cell::{Cell, RefCell};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::record::StreakRecord;
use crate::error::NotifyError;

pub const START_STREAK_MESSAGE: &str = "Complete today's mini tasks to start a streak.";
pub const KEEP_STREAK_MESSAGE: &str = "Complete today's mini tasks to keep up your streak.";

/// Host-provided sink for short user-facing messages.
///
/// Implementations may fail; callers in this crate never propagate the error.
pub trait Notifier {
    fn notify(&self, message: &str) -> Result<(), NotifyError>;
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, message: &str) -> Result<(), NotifyError> {
        (**self).notify(message)
    }
}

/// Discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _message: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Keeps delivered messages in memory. Can be switched to fail every call.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    messages: RefCell<Vec<String>>,
    attempts: Cell<usize>,
    failing: Cell<bool>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    /// Messages successfully delivered so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    /// Every call to `notify`, including failed ones.
    pub fn attempts(&self) -> usize {
        self.attempts.get()
    }

    pub fn clear(&self) {
        self.messages.borrow_mut().clear();
        self.attempts.set(0);
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, message: &str) -> Result<(), NotifyError> {
        self.attempts.set(self.attempts.get() + 1);
        if self.failing.get() {
            return Err(NotifyError::DeliveryFailed("sink unavailable".into()));
        }
        self.messages.borrow_mut().push(message.to_string());
        Ok(())
    }
}

/// Deliver `message`, logging and discarding any failure.
pub fn notify_quietly(notifier: &dyn Notifier, message: &str) -> bool {
    match notifier.notify(message) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(error = %e, message, "notification dropped");
            false
        }
    }
}

/// What `maybe_announce` did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Announcement {
    /// A reminder was already handled today.
    AlreadyAnnounced,
    /// Today's goal is already met; stamped without notifying.
    Suppressed,
    /// Reminders are switched off; stamped without notifying.
    Disabled,
    /// A reminder was handed to the sink.
    Sent { message: String, delivered: bool },
}

#[derive(Debug, Clone)]
pub struct AnnouncementGate {
    enabled: bool,
}

impl AnnouncementGate {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    pub fn with_enabled(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Pick the reminder wording for the current streak.
    pub fn reminder_text(record: &StreakRecord) -> &'static str {
        if record.current_streak > 0 {
            KEEP_STREAK_MESSAGE
        } else {
            START_STREAK_MESSAGE
        }
    }

    /// Show at most one reminder per UTC day.
    pub fn maybe_announce(
        &self,
        record: &mut StreakRecord,
        notifier: &dyn Notifier,
        today: NaiveDate,
    ) -> Announcement {
        if record.last_announcement == Some(today) {
            return Announcement::AlreadyAnnounced;
        }

        if record.both_done_on(today) || record.last_completion == Some(today) {
            record.last_announcement = Some(today);
            tracing::debug!(%today, "reminder suppressed, goal already met");
            return Announcement::Suppressed;
        }

        if !self.enabled {
            record.last_announcement = Some(today);
            return Announcement::Disabled;
        }

        let message = Self::reminder_text(record);
        let delivered = notify_quietly(notifier, message);
        record.last_announcement = Some(today);
        tracing::info!(%today, delivered, "daily reminder sent");

        Announcement::Sent {
            message: message.to_string(),
            delivered,
        }
    }
}

impl Default for AnnouncementGate {
    fn default() -> Self {
        Self::new()
    }
}
