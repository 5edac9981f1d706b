//! Streak session: the single owner of the [`StreakRecord`].
//!
//! The host calls into the session from its tick and event callbacks, one at
//! a time. Each entry point samples the clock once, runs the services in a
//! fixed order, writes the record through to the store and then refreshes
//! observers.
//!
//! ## Tick order
//!
//! ```text
//! rollover -> reminder (only if rolled) -> queued marks -> persist -> observers
//! ```

use chrono::NaiveDate;

use crate::detect::DetectionRules;
use crate::events::Event;
use crate::storage::{Config, KeyValueStore, StreakStorage};
use crate::streak::{
    notify_quietly, AnnouncementGate, Clock, CompletionTracker, Notifier, RolloverGuard,
    RolloverOutcome, StreakRecord, SubTask,
};

pub const HALFWAY_MESSAGE: &str = "Halfway done (1/2)!";

/// Date the debug rollover rewinds `last_seen` to.
const FORCED_ROLL_SEEN: (i32, u32, u32) = (1900, 1, 1);

/// Message shown when the daily goal is credited.
pub fn day_complete_message(streak: u32) -> String {
    let day_word = if streak == 1 { "day" } else { "days" };
    format!("Daily Mini Complete! Your current streak is {streak} {day_word}!")
}

/// Downstream consumer of the latest record (panels, text decorators).
///
/// Called after every entry point; must tolerate redundant refreshes.
pub trait StreakObserver {
    fn streak_changed(&mut self, record: &StreakRecord);
}

impl<F: FnMut(&StreakRecord)> StreakObserver for F {
    fn streak_changed(&mut self, record: &StreakRecord) {
        self(record)
    }
}

/// Tunables for a session, usually taken from [`Config`].
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub initial_freeze_count: u32,
    pub xp_per_completion: u32,
    pub halfway_notice: bool,
    pub day_complete_notice: bool,
    pub daily_reminder: bool,
    pub rules: DetectionRules,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            initial_freeze_count: config.streak.initial_freeze_count,
            xp_per_completion: config.streak.xp_per_completion,
            halfway_notice: config.notifications.halfway_enabled(),
            day_complete_notice: config.notifications.day_complete_enabled(),
            daily_reminder: config.notifications.daily_reminder_enabled(),
            rules: config.detection.rules(),
        }
    }
}

pub struct StreakSession<S, C, N> {
    record: StreakRecord,
    store: S,
    clock: C,
    notifier: N,
    storage: StreakStorage,
    tracker: CompletionTracker,
    guard: RolloverGuard,
    gate: AnnouncementGate,
    rules: DetectionRules,
    halfway_notice: bool,
    day_complete_notice: bool,
    observers: Vec<Box<dyn StreakObserver>>,
    queued: Vec<SubTask>,
    /// Sub-tasks already applied since the last tick.
    marked_this_tick: [bool; 2],
    last_rollover: Option<RolloverOutcome>,
}

impl<S, C, N> StreakSession<S, C, N>
where
    S: KeyValueStore,
    C: Clock,
    N: Notifier,
{
    /// Create a session over an empty record. Call [`start`](Self::start)
    /// to hydrate it.
    pub fn new(store: S, clock: C, notifier: N, options: SessionOptions) -> Self {
        Self {
            record: StreakRecord::new(),
            store,
            clock,
            notifier,
            storage: StreakStorage::new(options.initial_freeze_count),
            tracker: CompletionTracker::with_xp(options.xp_per_completion),
            guard: RolloverGuard::new(),
            gate: AnnouncementGate::with_enabled(options.daily_reminder),
            rules: options.rules,
            halfway_notice: options.halfway_notice,
            day_complete_notice: options.day_complete_notice,
            observers: Vec::new(),
            queued: Vec::new(),
            marked_this_tick: [false; 2],
            last_rollover: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn record(&self) -> &StreakRecord {
        &self.record
    }

    pub fn current_streak(&self) -> u32 {
        self.record.current_streak
    }

    /// Outcome of the most recent rollover that changed days.
    pub fn last_rollover(&self) -> Option<RolloverOutcome> {
        self.last_rollover
    }

    /// Whether the most recent rollover spent a freeze credit.
    pub fn last_rollover_used_freeze(&self) -> bool {
        self.last_rollover.is_some_and(|o| o.used_freeze())
    }

    pub fn queued(&self) -> &[SubTask] {
        &self.queued
    }

    pub fn add_observer(&mut self, observer: Box<dyn StreakObserver>) {
        self.observers.push(observer);
    }

    // ── Entry points ─────────────────────────────────────────────────

    /// Hydrate from the store, run an initial rollover check (with its
    /// reminder), persist.
    pub fn start(&mut self) -> Vec<Event> {
        self.record = self.storage.load(&self.store);
        tracing::debug!(
            current_streak = self.record.current_streak,
            freeze_count = self.record.freeze_count,
            "streak record hydrated"
        );

        let today = self.clock.today();
        let mut events = Vec::new();
        if self.roll(today, &mut events) {
            self.announce(today, &mut events);
        }
        self.commit(&mut events);
        events
    }

    /// Periodic tick.
    pub fn tick(&mut self) -> Vec<Event> {
        let today = self.clock.today();
        let mut events = Vec::new();

        if self.roll(today, &mut events) {
            self.announce(today, &mut events);
        }

        for task in std::mem::take(&mut self.queued) {
            self.apply_mark(task, today, &mut events);
        }
        self.marked_this_tick = [false; 2];

        self.commit(&mut events);
        events
    }

    /// Host session resumed (login). Shows the daily reminder if due.
    pub fn resume(&mut self) -> Vec<Event> {
        let today = self.clock.today();
        let mut events = Vec::new();
        self.announce(today, &mut events);
        self.commit(&mut events);
        events
    }

    /// A sub-task completion reported by the host. Applied immediately.
    pub fn mark(&mut self, task: SubTask) -> Vec<Event> {
        if self.marked_this_tick[task.index()] {
            tracing::debug!(?task, "duplicate mark within tick ignored");
            return Vec::new();
        }

        let today = self.clock.today();
        let mut events = Vec::new();
        let rolled = self.roll(today, &mut events);
        self.apply_mark(task, today, &mut events);
        if rolled {
            self.announce(today, &mut events);
        }
        self.commit(&mut events);
        events
    }

    /// Defer a completion to the next tick.
    pub fn enqueue(&mut self, task: SubTask) {
        if !self.queued.contains(&task) {
            self.queued.push(task);
        }
    }

    /// Classify a host message and mark the matching sub-task.
    pub fn handle_message(&mut self, message: &str) -> Vec<Event> {
        let Some(task) = self.rules.classify(message) else {
            return Vec::new();
        };
        let mut events = vec![Event::MessageMatched { task }];
        events.extend(self.mark(task));
        events
    }

    /// Classify a host message and defer the matching mark to the next tick.
    pub fn enqueue_message(&mut self, message: &str) -> Option<SubTask> {
        let task = self.rules.classify(message)?;
        self.enqueue(task);
        Some(task)
    }

    /// Debug helper: wipe today's progress and force a day roll.
    ///
    /// Freeze credits are left untouched.
    pub fn force_rollover(&mut self) -> Vec<Event> {
        let freeze_count = self.record.freeze_count;
        self.record.freeze_count = 0;
        self.record.current_streak = 0;
        self.record.last_seen = NaiveDate::from_ymd_opt(
            FORCED_ROLL_SEEN.0,
            FORCED_ROLL_SEEN.1,
            FORCED_ROLL_SEEN.2,
        );
        self.record.last_sub_task_a = None;
        self.record.last_sub_task_b = None;
        self.record.last_completion = None;
        self.record.last_announcement = None;

        let today = self.clock.today();
        let mut events = Vec::new();
        self.roll(today, &mut events);
        self.record.freeze_count = freeze_count;
        for event in &mut events {
            if let Event::DayRolledOver {
                freeze_count: reported,
                ..
            } = event
            {
                *reported = freeze_count;
            }
        }
        self.marked_this_tick = [false; 2];

        self.commit(&mut events);
        events
    }

    /// Flush the record at session end.
    pub fn finish(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        self.persist(&mut events);
        events
    }

    // ── Internals ────────────────────────────────────────────────────

    /// Returns true when the day rolled over.
    fn roll(&mut self, today: NaiveDate, events: &mut Vec<Event>) -> bool {
        let outcome = self.guard.check(&mut self.record, today);
        match outcome {
            RolloverOutcome::Seeded { today } => {
                events.push(Event::DaySeeded { today });
                false
            }
            RolloverOutcome::SameDay => false,
            RolloverOutcome::Rolled {
                previous,
                today,
                verdict,
            } => {
                self.last_rollover = Some(outcome);
                events.push(Event::DayRolledOver {
                    previous,
                    today,
                    verdict,
                    current_streak: self.record.current_streak,
                    freeze_count: self.record.freeze_count,
                });
                true
            }
        }
    }

    fn announce(&mut self, today: NaiveDate, events: &mut Vec<Event>) {
        let announcement = self
            .gate
            .maybe_announce(&mut self.record, &self.notifier, today);
        events.push(Event::Reminder {
            today,
            announcement,
        });
    }

    fn apply_mark(&mut self, task: SubTask, today: NaiveDate, events: &mut Vec<Event>) {
        let first_today = self.record.none_done_on(today);
        let previous_completion = self.record.last_completion;

        self.tracker.mark(&mut self.record, task, today);
        self.marked_this_tick[task.index()] = true;
        events.push(Event::SubTaskMarked { task, today });

        if first_today {
            events.push(Event::Halfway { task, today });
            if self.halfway_notice {
                notify_quietly(&self.notifier, HALFWAY_MESSAGE);
            }
        }

        if self.record.last_completion != previous_completion {
            events.push(Event::DayCompleted {
                today,
                current_streak: self.record.current_streak,
                best_streak: self.record.best_streak,
            });
            if self.day_complete_notice {
                notify_quietly(
                    &self.notifier,
                    &day_complete_message(self.record.current_streak),
                );
            }
        }
    }

    fn persist(&mut self, events: &mut Vec<Event>) {
        if let Err(e) = self.storage.save(&self.store, &self.record) {
            tracing::warn!(error = %e, "failed to persist streak record");
            events.push(Event::SaveFailed {
                message: e.to_string(),
            });
        }
    }

    fn commit(&mut self, events: &mut Vec<Event>) {
        self.persist(events);
        for observer in &mut self.observers {
            observer.streak_changed(&self.record);
        }
    }
}
