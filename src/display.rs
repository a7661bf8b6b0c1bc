//! Formatting helpers for rendering tasks in the terminal.
//!
//! Everything here writes to a caller-supplied `Write` so the menu can be
//! driven against an in-memory buffer.

use std::io::{self, Write};

use chrono::NaiveDateTime;
use crossterm::style::{Color, Stylize};

use crate::fields::*;
use crate::task::{Recurrence, Task};
use crate::temporal::{classify, DueStatus};

const TITLE_WIDTH: usize = 25;
const DUE_WIDTH: usize = 24;

/// Completion marker shown in the status column.
pub fn status_marker(completed: bool) -> &'static str {
    if completed {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Due date as `YYYY-MM-DD`, plus ` HH:MM` when the task has a time of day.
pub fn format_due_date(due: NaiveDateTime) -> String {
    if due.time() == chrono::NaiveTime::MIN {
        due.format("%Y-%m-%d").to_string()
    } else {
        due.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// Due column text with its classification, e.g. `[OVERDUE: 2024-03-14]`.
pub fn format_due(task: &Task, now: NaiveDateTime) -> String {
    let Some(due) = task.due_date else {
        return String::new();
    };
    let date = format_due_date(due);
    match classify(task, now) {
        Some(DueStatus::Overdue) => format!("[OVERDUE: {date}]"),
        Some(DueStatus::Today) => format!("[TODAY: {date}]"),
        Some(DueStatus::Upcoming) => format!("[UPCOMING: {date}]"),
        None => date,
    }
}

fn due_color(task: &Task, now: NaiveDateTime) -> Option<Color> {
    match classify(task, now)? {
        DueStatus::Overdue => Some(Color::Red),
        DueStatus::Today => Some(Color::Yellow),
        DueStatus::Upcoming => Some(Color::Green),
    }
}

/// Human description of a recurrence pattern ("Weekly on Monday, Friday").
pub fn describe_recurrence(r: &Recurrence) -> String {
    let n = r.every;
    let mut out = match r.interval {
        Interval::Daily if n == 1 => "Daily".to_string(),
        Interval::Daily | Interval::Custom => format!("Every {n} days"),
        Interval::Weekly if n == 1 => "Weekly".to_string(),
        Interval::Weekly => format!("Every {n} weeks"),
        Interval::Monthly if n == 1 => "Monthly".to_string(),
        Interval::Monthly => format!("Every {n} months"),
        Interval::Yearly if n == 1 => "Yearly".to_string(),
        Interval::Yearly => format!("Every {n} years"),
    };
    if r.interval == Interval::Weekly && !r.days.is_empty() {
        let days: Vec<&str> = r.days.iter().map(|d| weekday_name(*d)).collect();
        out.push_str(" on ");
        out.push_str(&days.join(", "));
    }
    out
}

/// Truncate a title to the table's title column, marking the cut with `..`.
pub fn truncate_title(s: &str) -> String {
    if s.chars().count() <= TITLE_WIDTH {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(TITLE_WIDTH - 2).collect();
        out.push_str("..");
        out
    }
}

fn paint(text: String, color: Option<Color>, enabled: bool) -> String {
    match color {
        Some(c) if enabled => text.with(c).to_string(),
        _ => text,
    }
}

/// Print tasks as a table with due-date annotations.
pub fn write_table<W: Write>(
    out: &mut W,
    tasks: &[&Task],
    now: NaiveDateTime,
    color: bool,
) -> io::Result<()> {
    writeln!(
        out,
        "{:<4} | {:<7} | {:<4} | {:<DUE_WIDTH$} | {:<TITLE_WIDTH$} | Tags | Recurrence",
        "ID", "Status", "Pri", "Due Date", "Title"
    )?;
    writeln!(out, "{}", "-".repeat(120))?;
    for t in tasks {
        let status = format!("{:<7}", status_marker(t.completed));
        let status = paint(status, t.completed.then_some(Color::DarkGrey), color);
        let due = paint(format!("{:<DUE_WIDTH$}", format_due(t, now)), due_color(t, now), color);
        let recurrence = t.recurring.as_ref().map(describe_recurrence).unwrap_or_default();
        writeln!(
            out,
            "{:<4} | {} | {:<4} | {} | {:<TITLE_WIDTH$} | {} | {}",
            t.id,
            status,
            t.priority.indicator(),
            due,
            truncate_title(&t.title),
            t.tags.join(", "),
            recurrence
        )?;
        if !t.description.is_empty() {
            writeln!(out, "       Description: {}", t.description)?;
        }
    }
    Ok(())
}

/// Short one-line listing used when picking a task by id.
pub fn write_brief<W: Write>(out: &mut W, tasks: &[Task]) -> io::Result<()> {
    for t in tasks {
        let tags = if t.tags.is_empty() {
            String::new()
        } else {
            format!(" ({})", t.tags.join(", "))
        };
        writeln!(
            out,
            "ID: {} | {} | {} | Title: {}{}",
            t.id,
            status_marker(t.completed),
            t.priority.indicator(),
            t.title,
            tags
        )?;
    }
    Ok(())
}

/// Dump tasks as pretty-printed JSON.
pub fn write_json<W: Write>(out: &mut W, tasks: &[&Task]) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, tasks)?;
    writeln!(out)
}
