//! Task data structure and related functionality.
//!
//! This module defines the `Task` record held by the store, the recurrence
//! pattern attached to repeating tasks, and `TaskUpdate`, the partial field
//! set applied by an update.

use chrono::{NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::fields::*;

/// A single to-do item with scheduling and recurrence metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    pub due_date: Option<NaiveDateTime>,
    pub recurring: Option<Recurrence>,
}

impl Task {
    pub fn is_recurring(&self) -> bool {
        self.recurring.is_some()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

fn default_every() -> u32 {
    1
}

/// How a completed task spawns its successor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub interval: Interval,
    /// Multiplier applied to the interval; never zero.
    #[serde(default = "default_every")]
    pub every: u32,
    /// Target weekdays for weekly recurrences. Empty means "same weekday".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub days: Vec<Weekday>,
}

impl Recurrence {
    pub fn new(interval: Interval, every: u32) -> Self {
        Recurrence {
            interval,
            every: every.max(1),
            days: Vec::new(),
        }
    }

    pub fn daily() -> Self {
        Self::new(Interval::Daily, 1)
    }

    /// Weekly recurrence on the given weekdays.
    pub fn weekly_on(days: Vec<Weekday>) -> Self {
        Recurrence {
            days,
            ..Self::new(Interval::Weekly, 1)
        }
    }

    /// Parse a comma-separated list of weekday names, dropping unknown ones.
    pub fn parse_days(input: &str) -> Vec<Weekday> {
        let mut days = Vec::new();
        for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match parse_weekday(part) {
                Some(d) if !days.contains(&d) => days.push(d),
                Some(_) => {}
                None => log::warn!("ignoring unknown weekday {part:?}"),
            }
        }
        days
    }
}

/// Fields to change on an existing task. `None` leaves the field as it is.
///
/// Text fields for priority and due date go through the same normalisation
/// as task creation.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<String>,
    pub tags: Option<Vec<String>>,
    pub due_date: Option<String>,
    pub recurring: Option<Recurrence>,
    /// Remove the due date. Takes precedence over `due_date`.
    pub clear_due: bool,
    /// Remove the recurrence pattern. Takes precedence over `recurring`.
    pub clear_recurring: bool,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.completed.is_none()
            && self.priority.is_none()
            && self.tags.is_none()
            && self.due_date.is_none()
            && self.recurring.is_none()
            && !self.clear_due
            && !self.clear_recurring
    }
}
