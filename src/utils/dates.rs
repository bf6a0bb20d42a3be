//! Week-key and date-key derivation plus the date helpers the rest of the
//! core consumes.
//!
//! Week keys follow ISO-8601 week numbering: weeks start on Monday and the
//! year component is the ISO week-year, not the calendar year. Around New
//! Year those two disagree (Jan 1 can belong to the last week of the
//! previous ISO year), so everything here goes through `iso_week()`.

use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};

/// ISO week key for a date, e.g. "2026-W06".
pub fn week_key(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

/// Week key for today in local time.
pub fn week_key_now() -> String {
    week_key(Local::now().date_naive())
}

/// Calendar date key, e.g. "2026-02-04".
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Date key for today in local time. Day boundaries are local midnight.
pub fn date_key_now() -> String {
    date_key(Local::now().date_naive())
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Mon).first_day()
}

/// Sunday of the week containing `date`.
pub fn week_end(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Mon).last_day()
}

/// The seven days of the week containing `date`, Monday first.
pub fn week_days(date: NaiveDate) -> Vec<NaiveDate> {
    let start = week_start(date);
    (0..7).map(|i| start + Duration::days(i)).collect()
}

pub fn next_week(date: NaiveDate) -> NaiveDate {
    date + Duration::weeks(1)
}

pub fn previous_week(date: NaiveDate) -> NaiveDate {
    date - Duration::weeks(1)
}

/// Short day name ("Mon") or full day name ("Monday").
pub fn day_name(date: NaiveDate, short: bool) -> String {
    if short {
        date.format("%a").to_string()
    } else {
        date.format("%A").to_string()
    }
}

/// Human-readable week range, e.g. "Feb 2 - 8, 2026".
pub fn week_range_display(date: NaiveDate) -> String {
    let start = week_start(date);
    let end = week_end(date);

    let start_month = start.format("%b").to_string();
    let end_month = end.format("%b").to_string();
    let year = end.format("%Y");

    if start_month == end_month {
        format!("{} {} - {}, {}", start_month, start.day(), end.day(), year)
    } else {
        format!(
            "{} {} - {} {}, {}",
            start_month,
            start.day(),
            end_month,
            end.day(),
            year
        )
    }
}

/// Format a minute total for display, e.g. 125 -> "2h 5m".
pub fn format_minutes(minutes: u32) -> String {
    if minutes == 0 {
        return "—".to_string();
    }

    let hours = minutes / 60;
    let mins = minutes % 60;

    match (hours, mins) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// Format elapsed seconds for a timer display, e.g. 125 -> "02:05".
pub fn format_timer_display(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Parse an "HH:MM" string into hours and minutes.
pub fn parse_time_string(time: &str) -> Option<(u32, u32)> {
    let (h, m) = time.split_once(':')?;
    let hours: u32 = h.parse().ok()?;
    let minutes: u32 = m.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some((hours, minutes))
}

/// Format hours and minutes as "HH:MM".
pub fn format_time_string(hours: u32, minutes: u32) -> String {
    format!("{:02}:{:02}", hours, minutes)
}
