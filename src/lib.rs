//! # todo - Console Todo Tracker
//!
//! A single-user task tracker driven from a numbered text menu, with due
//! dates and recurring tasks.
//!
//! ## Key Features
//!
//! - **Flexible due dates**: `YYYY-MM-DD`, `MM/DD/YYYY`, `DD/MM/YYYY`, dashed
//!   variants, optional `HH:MM`, and `today` / `tomorrow` / `yesterday` /
//!   `in N days`
//! - **Due-date status**: every table marks tasks OVERDUE, TODAY or UPCOMING
//! - **Recurring tasks**: daily, weekly (optionally on chosen weekdays),
//!   monthly, yearly or every N days. Completing an occurrence creates the
//!   next one as a new task
//! - **Search, filter and sort** by status, priority, tag, due state and
//!   recurrence
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the interactive menu
//! todo
//!
//! # See how a date is read
//! todo parse-date "03/04/2024 09:30"
//!
//! # Preview the next three monthly occurrences from Jan 31
//! todo next --from 2024-01-31 --interval monthly
//! ```
//!
//! Tasks are kept in memory only and are gone when the session ends.

pub mod cli;
pub mod cmd;
pub mod display;
pub mod error;
pub mod fields;
pub mod menu;
pub mod store;
pub mod task;
pub mod temporal;

pub use fields::{Interval, Priority, SortKey, StatusFilter};
pub use store::{sort_tasks, TaskFilter, TaskStore, Toggled};
pub use task::{Recurrence, Task, TaskUpdate};
