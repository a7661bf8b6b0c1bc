//! Shared test infrastructure for todo integration tests.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use console_todo::{Recurrence, Task, TaskStore};

/// Store wrapper with terse helpers for building fixtures.
pub struct TestEnv {
    pub store: TaskStore,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            store: TaskStore::new(),
        }
    }

    /// Create and add a task with default fields.
    pub fn add(&mut self, title: &str) -> Task {
        self.add_full(title, "Medium", None, None)
    }

    /// Create and add a task with priority, due text and recurrence.
    pub fn add_full(
        &mut self,
        title: &str,
        priority: &str,
        due: Option<&str>,
        recurring: Option<Recurrence>,
    ) -> Task {
        let task = self.store.create(title, "", priority, Vec::new(), due, recurring);
        assert!(self.store.add(task.clone()), "failed to add {title}");
        task
    }
}

/// Midnight on the given date.
pub fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
    at(y, m, d, 0, 0)
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .expect("valid date")
        .and_hms_opt(h, min, 0)
        .expect("valid time")
}
