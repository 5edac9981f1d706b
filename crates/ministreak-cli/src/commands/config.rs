//! `ministreak config`: read and edit `config.toml` in the data directory.
//!
//! Keys are dot paths into the TOML tables, for example
//! `notifications.daily_reminder` or `detection.sub_task_a`.

use clap::Subcommand;
use ministreak_core::Config;

const SECTIONS: [&str; 5] = ["streak", "notifications", "display", "tick", "detection"];

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting
    #[command(after_help = "Example: ministreak config get display.streak_color")]
    Get {
        /// Dot-path key, e.g. "streak.initial_freeze_count" or "tick.interval_ms"
        key: String,
    },
    /// Change one setting and save it
    #[command(after_help = "Examples:\n  \
        ministreak config set notifications.halfway false\n  \
        ministreak config set display.streak_color 00ff00\n  \
        ministreak config set detection.label_a \"Bird run\"")]
    Set {
        /// Dot-path key
        key: String,
        /// "true"/"false", a whole number, or text; detection rules take JSON
        value: String,
    },
    /// Print the settings as TOML, optionally a single section
    #[command(visible_alias = "list")]
    Show {
        /// One of: streak, notifications, display, tick, detection
        section: Option<String>,
    },
    /// Restore default settings (the saved streak is left alone)
    Reset,
    /// Print the config file location
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config
                .get(&key)
                .ok_or_else(|| format!("unknown key: {key}"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            tracing::info!(%key, "config updated");
            println!("{key} = {}", config.get(&key).unwrap_or(value));
        }
        ConfigAction::Show { section } => {
            let config = Config::load()?;
            println!("{}", render_toml(&config, section.as_deref())?);
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("restored defaults in {}", Config::path()?.display());
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
        }
    }
    Ok(())
}

fn render_toml(config: &Config, section: Option<&str>) -> Result<String, Box<dyn std::error::Error>> {
    let Some(section) = section else {
        return Ok(toml::to_string_pretty(config)?);
    };

    let root = toml::Value::try_from(config)?;
    let table = root
        .get(section)
        .filter(|_| SECTIONS.contains(&section))
        .ok_or_else(|| {
            format!(
                "unknown section: {section} (expected one of {})",
                SECTIONS.join(", ")
            )
        })?;
    Ok(toml::to_string_pretty(table)?)
}
