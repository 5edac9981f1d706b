use std::io::BufRead;
use std::sync::mpsc;
use std::time::Duration;

use chrono::NaiveDate;
use clap::Subcommand;
use serde::Serialize;

use ministreak_core::decorate::decorate_name;
use ministreak_core::streak::format_date;
use ministreak_core::{
    Clock, Config, Database, Event, Notifier, NotifyError, SessionOptions, StreakRecord,
    StreakSession, SubTask, SystemClock,
};

#[derive(Subcommand)]
pub enum StreakAction {
    /// Print the current streak record as JSON
    Status,
    /// Run one tick (rollover check, reminder, persist)
    Tick,
    /// Signal a resumed session (shows the daily reminder if due)
    Resume,
    /// Mark a sub-task as done today
    Mark {
        /// Sub-task to mark: "a" or "b"
        task: SubTask,
    },
    /// Feed a host message through the detection rules
    Message {
        /// Raw message text, markup tags allowed
        text: String,
    },
    /// Print a name decorated with the current streak
    Decorate {
        /// Player name
        name: String,
    },
    /// Tick periodically; stdin lines are treated as host messages
    Watch {
        /// Tick interval in milliseconds (defaults to tick.interval_ms)
        #[arg(long)]
        interval_ms: Option<u64>,
        /// Stop after this many ticks
        #[arg(long)]
        ticks: Option<u64>,
    },
    /// Debug: clear progress and force a day roll
    ForceRoll,
}

/// Wall clock unless `--today` pins the date.
enum CliClock {
    System,
    Fixed(NaiveDate),
}

impl Clock for CliClock {
    fn today(&self) -> NaiveDate {
        match self {
            CliClock::System => SystemClock.today(),
            CliClock::Fixed(date) => *date,
        }
    }
}

/// Prints notifications to stderr.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) -> Result<(), NotifyError> {
        eprintln!("notify: {message}");
        Ok(())
    }
}

type CliSession = StreakSession<Database, CliClock, ConsoleNotifier>;

#[derive(Serialize)]
struct SubTaskView {
    label: String,
    last_done: String,
    done_today: bool,
}

#[derive(Serialize)]
struct StatusView {
    today: String,
    current_streak: u32,
    best_streak: u32,
    freeze_count: u32,
    lifetime_xp: u32,
    last_seen: String,
    last_completion: String,
    last_announcement: String,
    completed_today: bool,
    sub_task_a: SubTaskView,
    sub_task_b: SubTaskView,
}

impl StatusView {
    fn new(record: &StreakRecord, config: &Config, today: NaiveDate) -> Self {
        let sub_task = |task: SubTask, label: &str| SubTaskView {
            label: label.to_string(),
            last_done: format_date(record.sub_task_date(task)),
            done_today: record.sub_task_done_on(task, today),
        };
        Self {
            today: format_date(Some(today)),
            current_streak: record.current_streak,
            best_streak: record.best_streak,
            freeze_count: record.freeze_count,
            lifetime_xp: record.lifetime_xp,
            last_seen: format_date(record.last_seen),
            last_completion: format_date(record.last_completion),
            last_announcement: format_date(record.last_announcement),
            completed_today: record.last_completion == Some(today),
            sub_task_a: sub_task(SubTask::A, &config.detection.label_a),
            sub_task_b: sub_task(SubTask::B, &config.detection.label_b),
        }
    }
}

#[derive(Serialize)]
struct Report {
    events: Vec<Event>,
    status: StatusView,
}

fn open_session(config: &Config, today: Option<NaiveDate>) -> Result<CliSession, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let clock = today.map_or(CliClock::System, CliClock::Fixed);
    Ok(StreakSession::new(
        db,
        clock,
        ConsoleNotifier,
        SessionOptions::from_config(config),
    ))
}

fn print_report(
    session: &CliSession,
    config: &Config,
    today: NaiveDate,
    events: Vec<Event>,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = Report {
        events,
        status: StatusView::new(session.record(), config, today),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub fn run(action: StreakAction, today: Option<NaiveDate>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut session = open_session(&config, today)?;
    let clock = today.map_or(CliClock::System, CliClock::Fixed);

    // Every command starts by hydrating and observing the day.
    let mut events = session.start();

    match action {
        StreakAction::Status => {}
        StreakAction::Tick => events.extend(session.tick()),
        StreakAction::Resume => events.extend(session.resume()),
        StreakAction::Mark { task } => events.extend(session.mark(task)),
        StreakAction::Message { text } => {
            let matched = session.handle_message(&text);
            if matched.is_empty() {
                tracing::info!(text = %text, "message did not match any sub-task");
            }
            events.extend(matched);
        }
        StreakAction::Decorate { name } => {
            events.extend(session.finish());
            warn_save_failures(&events);
            println!(
                "{}",
                decorate_name(&name, session.current_streak(), &config.display.streak_color)
            );
            return Ok(());
        }
        StreakAction::Watch { interval_ms, ticks } => {
            let interval = Duration::from_millis(interval_ms.unwrap_or(config.tick.interval_ms));
            return watch(session, interval, ticks, events);
        }
        StreakAction::ForceRoll => events.extend(session.force_rollover()),
    }

    events.extend(session.finish());
    print_report(&session, &config, clock.today(), events)
}

/// Log persistence failures from events that are not printed. Returns how
/// many were found.
fn warn_save_failures(events: &[Event]) -> usize {
    let mut failures = 0;
    for event in events {
        if let Event::SaveFailed { message } = event {
            tracing::warn!(error = %message, "streak record was not saved");
            failures += 1;
        }
    }
    failures
}

fn print_events(events: &[Event]) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        println!("{}", serde_json::to_string(event)?);
    }
    Ok(())
}

fn watch(
    mut session: CliSession,
    interval: Duration,
    ticks: Option<u64>,
    startup: Vec<Event>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, rx) = mpsc::channel::<String>();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut last_streak = session.current_streak();
    session.add_observer(Box::new(move |record: &StreakRecord| {
        if record.current_streak != last_streak {
            tracing::info!(
                from = last_streak,
                to = record.current_streak,
                "streak changed"
            );
            last_streak = record.current_streak;
        }
    }));

    print_events(&startup)?;
    tracing::info!(interval_ms = interval.as_millis() as u64, "watching");

    let mut count = 0u64;
    while ticks.map_or(true, |limit| count < limit) {
        while let Ok(line) = rx.try_recv() {
            if let Some(task) = session.enqueue_message(&line) {
                tracing::info!(?task, "queued sub-task from message");
            }
        }

        print_events(&session.tick())?;
        count += 1;

        if ticks.map_or(true, |limit| count < limit) {
            std::thread::sleep(interval);
        }
    }

    print_events(&session.finish())?;
    Ok(())
}
