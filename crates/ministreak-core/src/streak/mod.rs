mod announce;
mod clock;
mod completion;
mod record;
mod rollover;

pub use announce::{
    notify_quietly, Announcement, AnnouncementGate, MemoryNotifier, Notifier, NullNotifier,
    KEEP_STREAK_MESSAGE, START_STREAK_MESSAGE,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use completion::{CompletionTracker, DEFAULT_XP_PER_COMPLETION};
pub use record::{format_date, parse_date, StreakRecord, SubTask, DATE_FORMAT};
pub use rollover::{RolloverGuard, RolloverOutcome, RolloverVerdict};
