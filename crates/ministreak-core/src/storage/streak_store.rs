//! Maps a [`StreakRecord`] onto the namespaced key set.

use crate::error::StorageError;
use crate::streak::{format_date, parse_date, StreakRecord};

use super::kv::KeyValueStore;

/// Persisted key names.
pub mod keys {
    pub const CURRENT_STREAK: &str = "currentStreak";
    pub const BEST_STREAK: &str = "bestStreak";
    pub const FREEZE_COUNT: &str = "freezeCount";
    pub const LIFETIME_XP: &str = "lifetimeXp";
    pub const LAST_SEEN: &str = "lastSeenDateUTC";
    pub const LAST_SUB_TASK_A: &str = "lastSubTaskADateUTC";
    pub const LAST_SUB_TASK_B: &str = "lastSubTaskBDateUTC";
    pub const LAST_COMPLETION: &str = "lastCompletionDateUTC";
    pub const LAST_ANNOUNCEMENT: &str = "lastAnnouncementDateUTC";
}

/// Loads and saves the streak record through a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct StreakStorage {
    /// Freeze credits granted when no count has ever been stored.
    initial_freeze_count: u32,
}

impl StreakStorage {
    pub fn new(initial_freeze_count: u32) -> Self {
        Self {
            initial_freeze_count,
        }
    }

    /// Hydrate a record. Missing or unreadable values fall back to defaults.
    pub fn load(&self, store: &dyn KeyValueStore) -> StreakRecord {
        let int = |key: &str, default: u32| clamp_u32(store.get_int(key, i64::from(default)));
        let date = |key: &str| parse_date(&store.get_string(key, ""));

        let mut record = StreakRecord {
            current_streak: int(keys::CURRENT_STREAK, 0),
            best_streak: int(keys::BEST_STREAK, 0),
            freeze_count: int(keys::FREEZE_COUNT, self.initial_freeze_count),
            lifetime_xp: int(keys::LIFETIME_XP, 0),
            last_seen: date(keys::LAST_SEEN),
            last_sub_task_a: date(keys::LAST_SUB_TASK_A),
            last_sub_task_b: date(keys::LAST_SUB_TASK_B),
            last_completion: date(keys::LAST_COMPLETION),
            last_announcement: date(keys::LAST_ANNOUNCEMENT),
        };
        record.normalize();
        record
    }

    /// Write every field. All writes are attempted; the first error is returned.
    pub fn save(&self, store: &dyn KeyValueStore, record: &StreakRecord) -> Result<(), StorageError> {
        let results = [
            store.set_int(keys::CURRENT_STREAK, i64::from(record.current_streak)),
            store.set_int(keys::BEST_STREAK, i64::from(record.best_streak)),
            store.set_int(keys::FREEZE_COUNT, i64::from(record.freeze_count)),
            store.set_int(keys::LIFETIME_XP, i64::from(record.lifetime_xp)),
            store.set_string(keys::LAST_SEEN, &format_date(record.last_seen)),
            store.set_string(keys::LAST_SUB_TASK_A, &format_date(record.last_sub_task_a)),
            store.set_string(keys::LAST_SUB_TASK_B, &format_date(record.last_sub_task_b)),
            store.set_string(keys::LAST_COMPLETION, &format_date(record.last_completion)),
            store.set_string(keys::LAST_ANNOUNCEMENT, &format_date(record.last_announcement)),
        ];
        results.into_iter().collect()
    }
}

impl Default for StreakStorage {
    fn default() -> Self {
        Self::new(1)
    }
}

fn clamp_u32(v: i64) -> u32 {
    u32::try_from(v.max(0)).unwrap_or(u32::MAX)
}
