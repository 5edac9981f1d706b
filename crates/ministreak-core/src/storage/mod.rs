pub mod config;
pub mod database;
mod kv;
mod streak_store;

pub use config::Config;
pub use database::Database;
pub use kv::{scoped_key, KeyValueStore, MemoryStore, NAMESPACE};
pub use streak_store::{keys, StreakStorage};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns the data directory, creating it if needed.
///
/// `MINISTREAK_DATA_DIR` wins when set. Otherwise `~/.config/ministreak[-dev]/`
/// based on `MINISTREAK_ENV` (set it to `dev` for a development directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("MINISTREAK_DATA_DIR") {
        Some(explicit) if !explicit.is_empty() => PathBuf::from(explicit),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("MINISTREAK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("ministreak-dev")
            } else {
                base_dir.join("ministreak")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
