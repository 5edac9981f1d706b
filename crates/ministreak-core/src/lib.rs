//! # MiniStreak Core Library
//!
//! Daily-streak tracking for two independent daily sub-tasks. The streak
//! grows by at most one per UTC calendar day, a missed day either spends a
//! freeze credit or resets the streak, and reminders are de-duplicated per
//! day.
//!
//! ## Architecture
//!
//! - **Streak services**: [`CompletionTracker`], [`RolloverGuard`] and
//!   [`AnnouncementGate`] each mutate a borrowed [`StreakRecord`] for an
//!   explicitly passed `today`
//! - **Session**: [`StreakSession`] owns the record, sequences the services
//!   for every tick and event, writes through to storage and refreshes
//!   observers. It has no internal thread; the host drives it.
//! - **Storage**: namespaced key/value persistence (SQLite or in-memory) and
//!   TOML-based configuration
//! - **Detection**: classifies host messages into sub-task completions
//!
//! ## Key Components
//!
//! - [`StreakSession`]: Orchestrates the streak state machine
//! - [`KeyValueStore`]: Persistence contract
//! - [`Notifier`]: Notification sink contract
//! - [`Config`]: Application configuration management

pub mod decorate;
pub mod detect;
pub mod error;
pub mod events;
pub mod session;
pub mod storage;
pub mod streak;

pub use detect::{DetectionRules, MatchRule};
pub use error::{ConfigError, CoreError, NotifyError, StorageError};
pub use events::Event;
pub use session::{SessionOptions, StreakObserver, StreakSession};
pub use storage::{Config, Database, KeyValueStore, MemoryStore, StreakStorage};
pub use streak::{
    Announcement, AnnouncementGate, Clock, CompletionTracker, FixedClock, MemoryNotifier,
    Notifier, NullNotifier, RolloverGuard, RolloverOutcome, RolloverVerdict, StreakRecord,
    SubTask, SystemClock,
};
