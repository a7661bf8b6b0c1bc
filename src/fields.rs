//! Enumerations and field types for task management.
//!
//! This module defines the closed sets of values a task can carry (priority,
//! recurrence interval) and the options the store understands for sorting
//! and filtering. Free-text input is normalised into these enums here so the
//! rest of the crate never compares strings.

use std::fmt;

use chrono::Weekday;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Priority classification for task importance.
///
/// Variant order is the sort order: `High` sorts first.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Interpret user input such as `h`, `High`, `1` or `LOW`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" | "h" | "1" => Some(Priority::High),
            "medium" | "m" | "2" => Some(Priority::Medium),
            "low" | "l" | "3" => Some(Priority::Low),
            _ => None,
        }
    }

    /// Whether `s` names one of the three priorities.
    pub fn is_valid(s: &str) -> bool {
        Self::parse(s).is_some()
    }

    /// Normalise free text, falling back to `Medium` for anything unrecognised.
    pub fn normalize(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            log::warn!("unrecognised priority {s:?}, using Medium");
            Priority::Medium
        })
    }

    /// Short bracketed marker used in tables.
    pub fn indicator(self) -> &'static str {
        match self {
            Priority::High => "[H]",
            Priority::Medium => "[M]",
            Priority::Low => "[L]",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        })
    }
}

/// How often a recurring task comes back.
///
/// Names that are not recognised deserialize as `Daily`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Interval {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
    /// Every `n` days, where `n` is the recurrence's `every`.
    Custom,
}

impl Interval {
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "daily" => Interval::Daily,
            "weekly" => Interval::Weekly,
            "monthly" => Interval::Monthly,
            "yearly" => Interval::Yearly,
            "custom" => Interval::Custom,
            other => {
                log::warn!("unknown recurrence interval {other:?}, treating as daily");
                Interval::Daily
            }
        }
    }
}

impl From<String> for Interval {
    fn from(s: String) -> Self {
        Interval::from_name(&s)
    }
}

/// Parse a weekday name (`monday`, `Mon`, `FRIDAY`...).
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    s.trim().parse::<Weekday>().ok()
}

/// Full English name of a weekday, as shown in recurrence descriptions.
pub fn weekday_name(d: Weekday) -> &'static str {
    match d {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Available sorting options for task lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Priority,
    Title,
    Id,
    DueDate,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortKey::Priority => "priority",
            SortKey::Title => "title",
            SortKey::Id => "id",
            SortKey::DueDate => "due_date",
        })
    }
}

/// Completion-state filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Completed,
    Incomplete,
}
