//! Date parsing, due-date classification and recurrence arithmetic.
//!
//! Everything in here is a pure function of its inputs: callers pass the
//! current instant explicitly, so the menu can use the local clock while
//! tests pin it to a fixed date. All timestamps are naive local times.

use chrono::{
    DateTime, Datelike, Days, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike,
    Weekday,
};

use crate::fields::Interval;
use crate::task::Task;

/// Accepted absolute formats, tried in order. The flag marks formats that
/// carry a time of day. Ambiguous numeric dates resolve as month-first
/// because the `%m/%d` variants come before `%d/%m`.
const FORMATS: &[(&str, bool)] = &[
    ("%Y-%m-%d %H:%M", true),
    ("%Y-%m-%d", false),
    ("%m/%d/%Y", false),
    ("%m/%d/%Y %H:%M", true),
    ("%d/%m/%Y", false),
    ("%d/%m/%Y %H:%M", true),
    ("%m-%d-%Y", false),
    ("%m-%d-%Y %H:%M", true),
    ("%d-%m-%Y", false),
    ("%d-%m-%Y %H:%M", true),
];

/// Where a due date sits relative to now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    Overdue,
    Today,
    Upcoming,
}

fn midnight(d: NaiveDate) -> NaiveDateTime {
    d.and_time(NaiveTime::MIN)
}

/// Parse human-readable date input relative to the local clock.
///
/// Supports:
/// - "YYYY-MM-DD", "MM/DD/YYYY", "DD/MM/YYYY", "MM-DD-YYYY", "DD-MM-YYYY",
///   each optionally followed by " HH:MM"
/// - "today", "tomorrow", "yesterday"
/// - "in N days"
///
/// Relative forms resolve to midnight.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    parse_datetime_on(s, Local::now().date_naive())
}

/// `parse_datetime` with an explicit notion of today.
pub fn parse_datetime_on(s: &str, today: NaiveDate) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for &(fmt, has_time) in FORMATS {
        let parsed = if has_time {
            NaiveDateTime::parse_from_str(s, fmt).ok()
        } else {
            NaiveDate::parse_from_str(s, fmt).ok().map(midnight)
        };
        if parsed.is_some() {
            return parsed;
        }
    }

    let lower = s.to_lowercase();
    match lower.as_str() {
        "today" => return Some(midnight(today)),
        "tomorrow" => return today.checked_add_days(Days::new(1)).map(midnight),
        "yesterday" => return today.checked_sub_days(Days::new(1)).map(midnight),
        _ => {}
    }

    // "in N days" (the unit word is optional)
    let rest = lower.strip_prefix("in ")?;
    let mut words = rest.split_whitespace();
    let count = words.next()?;
    if !count.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let n: u64 = count.parse().ok()?;
    match (words.next(), words.next()) {
        (None, None) | (Some("day" | "days"), None) => {
            today.checked_add_days(Days::new(n)).map(midnight)
        }
        _ => None,
    }
}

/// Parse an ISO-8601 timestamp as produced by `NaiveDateTime`'s `Display`
/// or serde form, or a bare `YYYY-MM-DD`. A trailing `Z` or UTC offset is
/// accepted and dropped; the wall-clock reading is kept.
pub fn parse_iso(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(midnight)
}

/// Normalise stored or typed due-date text: ISO first, then the free-form
/// formats. `None` when nothing matches.
pub fn resolve_due_input(s: &str) -> Option<NaiveDateTime> {
    parse_iso(s).or_else(|| parse_datetime(s))
}

/// A due date whose clock reads exactly midnight is treated as a whole day.
fn is_date_only(dt: NaiveDateTime) -> bool {
    dt.hour() == 0 && dt.minute() == 0 && dt.second() == 0
}

/// True when the task's due date has passed.
///
/// Whole-day due dates become overdue the day after; timed ones as soon as
/// the time passes.
pub fn is_overdue(task: &Task, now: NaiveDateTime) -> bool {
    match task.due_date {
        None => false,
        Some(due) if is_date_only(due) => due.date() < now.date(),
        Some(due) => due < now,
    }
}

/// True when the task is due on the same calendar day as `now`.
pub fn is_due_today(task: &Task, now: NaiveDateTime) -> bool {
    task.due_date.is_some_and(|due| due.date() == now.date())
}

/// True when the task's due date is still ahead.
pub fn is_upcoming(task: &Task, now: NaiveDateTime) -> bool {
    match task.due_date {
        None => false,
        Some(due) if is_date_only(due) => due.date() > now.date(),
        Some(due) => due > now,
    }
}

/// Classify a due date for display. Overdue wins over today, so a timed
/// task due earlier today reports as overdue.
pub fn classify(task: &Task, now: NaiveDateTime) -> Option<DueStatus> {
    if is_overdue(task, now) {
        Some(DueStatus::Overdue)
    } else if is_due_today(task, now) {
        Some(DueStatus::Today)
    } else if is_upcoming(task, now) {
        Some(DueStatus::Upcoming)
    } else {
        None
    }
}

/// Sort key for due dates: undated tasks sort after every dated one.
pub fn due_sort_key(task: &Task) -> NaiveDateTime {
    task.due_date.unwrap_or(NaiveDateTime::MAX)
}

/// Compute the due date of the occurrence that follows `task`.
///
/// The anchor is the task's own due date, or `now` when it has none.
/// Returns `None` for non-recurring tasks and when the arithmetic would
/// leave chrono's representable range.
pub fn next_occurrence(task: &Task, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let rule = task.recurring.as_ref()?;
    let anchor = task.due_date.unwrap_or(now);
    let every = rule.every.max(1);

    match rule.interval {
        Interval::Daily | Interval::Custom => anchor.checked_add_days(Days::new(every.into())),
        Interval::Weekly if rule.days.is_empty() => {
            anchor.checked_add_days(Days::new(7 * u64::from(every)))
        }
        Interval::Weekly => next_weekday(anchor, &rule.days),
        Interval::Monthly => add_months(anchor, every),
        Interval::Yearly => add_years(anchor, every),
    }
}

/// The nearest date strictly after `from` that falls on one of `days`.
///
/// A target equal to `from`'s own weekday is a full week away. With no
/// targets the result is one week later.
pub fn next_weekday(from: NaiveDateTime, days: &[Weekday]) -> Option<NaiveDateTime> {
    let current = from.weekday().num_days_from_monday();
    let ahead = days
        .iter()
        .map(|d| {
            let target = d.num_days_from_monday();
            if target > current {
                target - current
            } else {
                7 - current + target
            }
        })
        .min()
        .unwrap_or(7);
    from.checked_add_days(Days::new(ahead.into()))
}

/// Add calendar months, clamping the day to the end of the target month
/// (Jan 31 + 1 month is Feb 28, or Feb 29 in a leap year).
pub fn add_months(from: NaiveDateTime, months: u32) -> Option<NaiveDateTime> {
    from.checked_add_months(Months::new(months))
}

/// Add calendar years. Feb 29 lands on Feb 28 when the target year is not
/// a leap year.
pub fn add_years(from: NaiveDateTime, years: u32) -> Option<NaiveDateTime> {
    add_months(from, years.checked_mul(12)?)
}
