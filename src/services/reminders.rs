//! Reminder planning on top of an external notification transport.
//!
//! The transport is a collaborator behind the `Notifier` trait: schedule a
//! (title, body) pair some minutes out, get back an opaque handle, cancel
//! by handle. This module decides *what* to schedule from the user's
//! reminder settings: per-rule times, a weekday for the weekly rules, an
//! offset before the bedtime target, and suppression inside the
//! quiet-hours window (which may wrap midnight).

use std::str::FromStr;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Local, NaiveTime, Weekday};

use crate::models::document::{QuietHours, ReminderConfig, Settings};
use crate::models::week::Rule;
use crate::utils::dates::parse_time_string;

/// Opaque handle to one scheduled notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NotificationHandle(pub u64);

/// External notification transport.
pub trait Notifier: Send + Sync {
    fn schedule(&self, title: &str, body: &str, delay_minutes: u32) -> NotificationHandle;
    fn cancel(&self, handle: NotificationHandle);
}

/// Fallback transport that only logs. Useful when no platform notifier is
/// wired up.
#[derive(Default)]
pub struct LogNotifier {
    next_handle: Mutex<u64>,
}

impl Notifier for LogNotifier {
    fn schedule(&self, title: &str, body: &str, delay_minutes: u32) -> NotificationHandle {
        let mut next = self.next_handle.lock().expect("notifier lock poisoned");
        *next += 1;
        tracing::info!(
            "Reminder in {}m: {} ({})",
            delay_minutes,
            title,
            body
        );
        NotificationHandle(*next)
    }

    fn cancel(&self, handle: NotificationHandle) {
        tracing::debug!("Cancelled reminder {:?}", handle);
    }
}

/// Title and body for each rule's reminder.
pub fn reminder_message(rule: Rule) -> (&'static str, &'static str) {
    match rule {
        Rule::Bedtime => (
            "Time to wind down",
            "Your bedtime is approaching. Start your evening routine.",
        ),
        Rule::PlanFridays => (
            "Time for weekly planning",
            "Take a few minutes to plan your week ahead.",
        ),
        Rule::MoveBy3pm => (
            "Have you moved today?",
            "Try to get some movement in before 3pm!",
        ),
        Rule::Habits => (
            "Keep your streak going",
            "Have you worked on your habits today?",
        ),
        Rule::BackupSlot => (
            "Your backup slot is tomorrow",
            "Remember you have buffer time built in.",
        ),
        Rule::Adventures => (
            "Plan your adventures",
            "What will your big and little adventures be this week?",
        ),
        Rule::NightForYou => (
            "Tonight is YOUR night!",
            "Enjoy your personal time this evening.",
        ),
        Rule::BatchTasks => (
            "Batching time!",
            "Time to knock out those small tasks together.",
        ),
        Rule::EffortfulFirst => (
            "Effortful before effortless",
            "Do something meaningful before defaulting to screens.",
        ),
    }
}

/// Whether a time of day falls inside the quiet-hours window. A window
/// whose end is before its start wraps past midnight (22:00-07:00).
pub fn in_quiet_hours(time: NaiveTime, quiet: &QuietHours) -> bool {
    let Some(start) = parse_naive_time(&quiet.start) else {
        return false;
    };
    let Some(end) = parse_naive_time(&quiet.end) else {
        return false;
    };

    if start <= end {
        time >= start && time < end
    } else {
        time >= start || time < end
    }
}

fn parse_naive_time(raw: &str) -> Option<NaiveTime> {
    let (hours, minutes) = parse_time_string(raw)?;
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// Minutes from `now` until the next occurrence of `time`, optionally
/// pinned to a weekday. An occurrence at or before `now` rolls over to the
/// next day (or next week).
fn minutes_until(now: DateTime<Local>, day: Option<Weekday>, time: NaiveTime) -> i64 {
    use chrono::Datelike;

    let days_ahead = match day {
        Some(weekday) => {
            let today = now.weekday().num_days_from_monday() as i64;
            let target = weekday.num_days_from_monday() as i64;
            let mut ahead = (target - today).rem_euclid(7);
            if ahead == 0 && time <= now.time() {
                ahead = 7;
            }
            ahead
        }
        None => {
            if time > now.time() {
                0
            } else {
                1
            }
        }
    };

    let target = (now.date_naive() + Duration::days(days_ahead)).and_time(time);
    (target - now.naive_local()).num_minutes()
}

/// Plans and tracks scheduled reminders for one user.
pub struct ReminderScheduler {
    notifier: Arc<dyn Notifier>,
    scheduled: Mutex<Vec<(Rule, NotificationHandle)>>,
}

impl ReminderScheduler {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            scheduled: Mutex::new(Vec::new()),
        }
    }

    /// Schedule every enabled reminder relative to `now`. The bedtime
    /// reminder fires `offsetMinutes` before `bedtime_target`. Reminders
    /// whose firing time lands inside quiet hours are skipped, except the
    /// bedtime wind-down itself. Returns how many notifications were
    /// handed to the transport.
    pub fn schedule_all(
        &self,
        settings: &Settings,
        bedtime_target: &str,
        now: DateTime<Local>,
    ) -> usize {
        let mut count = 0;
        for (rule, config) in &settings.reminders {
            if !config.enabled {
                continue;
            }
            for delay in self.firing_delays(*rule, config, bedtime_target, now) {
                let fire_time = add_minutes(now, delay);
                if *rule != Rule::Bedtime && in_quiet_hours(fire_time, &settings.quiet_hours) {
                    continue;
                }
                let (title, body) = reminder_message(*rule);
                let handle = self.notifier.schedule(title, body, delay as u32);
                self.scheduled
                    .lock()
                    .expect("scheduler lock poisoned")
                    .push((*rule, handle));
                count += 1;
            }
        }
        count
    }

    fn firing_delays(
        &self,
        rule: Rule,
        config: &ReminderConfig,
        bedtime_target: &str,
        now: DateTime<Local>,
    ) -> Vec<i64> {
        // Bedtime is offset-based; everything else fires at fixed times.
        if rule == Rule::Bedtime {
            let Some(target) = parse_naive_time(bedtime_target) else {
                return Vec::new();
            };
            let offset = config.offset_minutes.unwrap_or(0) as i64;
            let delay = minutes_until(now, None, target) - offset;
            if delay > 0 {
                return vec![delay];
            }
            return Vec::new();
        }

        let day = config
            .day
            .as_deref()
            .and_then(|name| Weekday::from_str(name).ok());

        let mut times: Vec<NaiveTime> = Vec::new();
        if let Some(time) = config.time.as_deref().and_then(parse_naive_time) {
            times.push(time);
        }
        if let Some(extra) = &config.times {
            times.extend(extra.iter().filter_map(|t| parse_naive_time(t)));
        }

        times
            .into_iter()
            .map(|time| minutes_until(now, day, time))
            .filter(|delay| *delay > 0)
            .collect()
    }

    pub fn cancel_all(&self) {
        let mut scheduled = self.scheduled.lock().expect("scheduler lock poisoned");
        for (_, handle) in scheduled.drain(..) {
            self.notifier.cancel(handle);
        }
    }

    pub fn scheduled_count(&self) -> usize {
        self.scheduled.lock().expect("scheduler lock poisoned").len()
    }
}

fn add_minutes(now: DateTime<Local>, minutes: i64) -> NaiveTime {
    (now.naive_local() + Duration::minutes(minutes)).time()
}
