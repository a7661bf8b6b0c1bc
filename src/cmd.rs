//! Command implementations for the CLI interface.
//!
//! The interactive menu is the main entry point; the other subcommands are
//! one-shot helpers that show how dates and recurrence rules are read
//! without starting a session.

use std::io::{self, Write};

use chrono::{Datelike, Local, NaiveDateTime};
use clap::Subcommand;
use clap_complete::{generate, Shell};
use eyre::{eyre, Result, WrapErr};

use crate::display::{self, describe_recurrence, format_due_date};
use crate::fields::*;
use crate::menu::Menu;
use crate::store::TaskStore;
use crate::task::{Recurrence, Task};
use crate::temporal::{self, classify, DueStatus};

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive menu (default).
    Menu,

    /// Show how a date string is interpreted.
    ParseDate {
        /// Date text, e.g. "2024-03-15 09:30", "03/04/2024", "tomorrow", "in 3 days".
        text: String,
    },

    /// Preview upcoming occurrences of a recurrence rule.
    Next {
        /// Anchor date in any accepted format. Defaults to now.
        #[arg(long)]
        from: Option<String>,
        /// Recurrence interval.
        #[arg(long, value_enum, default_value_t = Interval::Daily)]
        interval: Interval,
        /// Interval multiplier.
        #[arg(long, default_value_t = 1)]
        every: u32,
        /// Weekday for weekly rules. May be repeated and comma-separated.
        #[arg(long = "day")]
        days: Vec<String>,
        /// Number of occurrences to show.
        #[arg(long, default_value_t = 3)]
        count: usize,
        /// Print the generated tasks as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Run the interactive menu on stdin/stdout.
pub fn cmd_menu(color: bool) -> Result<()> {
    let stdin = io::stdin();
    let mut menu = Menu::new(TaskStore::new(), stdin.lock(), io::stdout()).with_color(color);
    menu.run().wrap_err("menu session failed")
}

/// Print the timestamp a date string resolves to and how it classifies now.
pub fn cmd_parse_date(text: &str) -> Result<()> {
    let due = temporal::resolve_due_input(text)
        .ok_or_else(|| eyre!("could not understand {text:?} as a date"))?;
    let now = Local::now().naive_local();
    let probe = Task {
        id: 0,
        title: String::new(),
        description: String::new(),
        completed: false,
        priority: Priority::default(),
        tags: Vec::new(),
        due_date: Some(due),
        recurring: None,
    };
    let class = match classify(&probe, now) {
        Some(DueStatus::Overdue) => "overdue",
        Some(DueStatus::Today) => "due today",
        Some(DueStatus::Upcoming) => "upcoming",
        None => "-",
    };
    println!("Input:     {text}");
    println!("Timestamp: {}", due.format("%Y-%m-%dT%H:%M:%S"));
    println!("Weekday:   {}", weekday_name(due.weekday()));
    println!("Status:    {class}");
    Ok(())
}

/// Materialise `count` occurrences of a rule by completing each one in a
/// scratch store, then print the resulting chain.
pub fn cmd_next(
    from: Option<String>,
    interval: Interval,
    every: u32,
    days: Vec<String>,
    count: usize,
    json: bool,
    color: bool,
) -> Result<()> {
    let now = Local::now().naive_local();
    let anchor: Option<NaiveDateTime> = match from.as_deref() {
        Some(s) => Some(
            temporal::resolve_due_input(s)
                .ok_or_else(|| eyre!("could not understand {s:?} as a date"))?,
        ),
        None => None,
    };

    let mut rule = Recurrence::new(interval, every);
    rule.days = Recurrence::parse_days(&days.join(","));
    if !rule.days.is_empty() && rule.interval != Interval::Weekly {
        log::warn!("--day only applies to weekly rules, ignoring");
        rule.days.clear();
    }
    let description = describe_recurrence(&rule);

    let mut store = TaskStore::new();
    let anchor_text = anchor.map(|a| a.format("%Y-%m-%dT%H:%M:%S").to_string());
    let first = store.create(
        &description,
        "",
        "Medium",
        Vec::new(),
        anchor_text.as_deref(),
        Some(rule),
    );
    let mut current = first.id;
    store.add(first);
    for _ in 0..count {
        match store.toggle_at(current, now).and_then(|t| t.spawned) {
            Some(next) => current = next,
            None => break,
        }
    }

    let occurrences: Vec<_> = store.list().iter().skip(1).collect();
    let mut out = io::stdout().lock();
    if json {
        display::write_json(&mut out, &occurrences)?;
        return Ok(());
    }
    let start = anchor.unwrap_or(now);
    writeln!(out, "{description}, starting {}", format_due_date(start))?;
    display::write_table(&mut out, &occurrences, now, color)?;
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_accepts_iso_and_free_form() {
        assert!(cmd_parse_date("2024-03-15T10:00").is_ok());
        assert!(cmd_parse_date("2024-03-15T10:00:00").is_ok());
        assert!(cmd_parse_date("03/15/2024 10:00").is_ok());
        assert!(cmd_parse_date("tomorrow").is_ok());
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(cmd_parse_date("someday").is_err());
        assert!(cmd_parse_date("in +3 days").is_err());
    }
}
