//! Interactive text menu.
//!
//! The menu owns the `TaskStore` for the lifetime of the session and maps
//! the numbered choices 1-12 onto store operations. Input and output are
//! generic so a whole session can be scripted in tests.

use std::io::{self, BufRead, ErrorKind, Write};

use chrono::{Local, NaiveDateTime};

use crate::display::{self, describe_recurrence, format_due_date};
use crate::error::InputError;
use crate::fields::*;
use crate::store::{normalize_tags, TaskFilter, TaskStore};
use crate::task::{Recurrence, Task, TaskUpdate};
use crate::temporal;

/// Main menu entries, in the order they are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Add,
    ViewAll,
    Update,
    Delete,
    Toggle,
    Search,
    Filter,
    Sort,
    Overdue,
    Upcoming,
    Recurring,
    Exit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 12] = [
        MenuAction::Add,
        MenuAction::ViewAll,
        MenuAction::Update,
        MenuAction::Delete,
        MenuAction::Toggle,
        MenuAction::Search,
        MenuAction::Filter,
        MenuAction::Sort,
        MenuAction::Overdue,
        MenuAction::Upcoming,
        MenuAction::Recurring,
        MenuAction::Exit,
    ];

    /// Map a typed menu number to its action.
    pub fn from_choice(s: &str) -> Option<Self> {
        let n: usize = s.trim().parse().ok()?;
        Self::ALL.get(n.checked_sub(1)?).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Add => "Add a new task",
            MenuAction::ViewAll => "View all tasks",
            MenuAction::Update => "Update a task",
            MenuAction::Delete => "Delete a task",
            MenuAction::Toggle => "Mark task as complete/incomplete",
            MenuAction::Search => "Search tasks",
            MenuAction::Filter => "Filter tasks",
            MenuAction::Sort => "Sort tasks",
            MenuAction::Overdue => "View overdue tasks",
            MenuAction::Upcoming => "View upcoming tasks",
            MenuAction::Recurring => "View recurring tasks",
            MenuAction::Exit => "Exit",
        }
    }
}

/// Interactive session over a task store.
pub struct Menu<R, W> {
    pub store: TaskStore,
    input: R,
    out: W,
    color: bool,
    clock: fn() -> NaiveDateTime,
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Print a heading and a task table, or `empty` when there is nothing to show.
fn print_tasks<W: Write>(
    out: &mut W,
    heading: &str,
    tasks: &[&Task],
    empty: &str,
    now: NaiveDateTime,
    color: bool,
) -> io::Result<()> {
    if tasks.is_empty() {
        writeln!(out, "{empty}")?;
        return Ok(());
    }
    writeln!(out, "\n{heading} ({} found):", tasks.len())?;
    display::write_table(out, tasks, now, color)
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(store: TaskStore, input: R, out: W) -> Self {
        Menu {
            store,
            input,
            out,
            color: false,
            clock: local_now,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Replace the clock used for due-date classification and recurrence.
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// Run until the user picks Exit or input runs out.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.out, "Welcome to the Console Todo Application!")?;
        loop {
            self.show_menu()?;
            let Some(choice) = self.read_line("Enter your choice (1-12): ")? else {
                log::debug!("input closed, leaving menu");
                break;
            };
            let Some(action) = MenuAction::from_choice(&choice) else {
                writeln!(self.out, "Invalid input. Please enter a number between 1 and 12.")?;
                continue;
            };
            if action == MenuAction::Exit {
                writeln!(self.out, "Goodbye!")?;
                break;
            }
            match self.dispatch(action) {
                Ok(()) => {}
                Err(InputError::Io(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
                Err(InputError::Io(e)) => return Err(e),
                Err(e) => writeln!(self.out, "Error: {e}")?,
            }
        }
        self.out.flush()
    }

    fn dispatch(&mut self, action: MenuAction) -> Result<(), InputError> {
        log::debug!("menu action {action:?}");
        match action {
            MenuAction::Add => self.add_task(),
            MenuAction::ViewAll => self.view_all(),
            MenuAction::Update => self.update_task(),
            MenuAction::Delete => self.delete_task(),
            MenuAction::Toggle => self.toggle_task(),
            MenuAction::Search => self.search_tasks(),
            MenuAction::Filter => self.filter_tasks(),
            MenuAction::Sort => self.sort_tasks(),
            MenuAction::Overdue => self.view_overdue(),
            MenuAction::Upcoming => self.view_upcoming(),
            MenuAction::Recurring => self.view_recurring(),
            MenuAction::Exit => Ok(()),
        }
    }

    fn show_menu(&mut self) -> io::Result<()> {
        writeln!(self.out, "\n{}", "=".repeat(40))?;
        writeln!(self.out, "Console Todo Application")?;
        writeln!(self.out, "{}", "=".repeat(40))?;
        for (i, action) in MenuAction::ALL.iter().enumerate() {
            writeln!(self.out, "{}. {}", i + 1, action.label())?;
        }
        writeln!(self.out, "{}", "-".repeat(40))
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        // Undecodable bytes become U+FFFD and fail validation like any typo.
        Ok(Some(String::from_utf8_lossy(&buf).trim().to_string()))
    }

    /// Read one answer; running out of input mid-action ends the session.
    fn ask(&mut self, prompt: &str) -> Result<String, InputError> {
        self.read_line(prompt)?
            .ok_or_else(|| io::Error::new(ErrorKind::UnexpectedEof, "input closed").into())
    }

    fn ask_id(&mut self, prompt: &str) -> Result<u64, InputError> {
        let raw = self.ask(prompt)?;
        let id: u64 = raw.parse().map_err(|_| InputError::InvalidId(raw.clone()))?;
        if self.store.get(id).is_none() {
            return Err(InputError::TaskNotFound(id));
        }
        Ok(id)
    }

    /// Print the short task list and read an existing id. `None` if the
    /// store is empty.
    fn pick_task(&mut self, verb: &str) -> Result<Option<u64>, InputError> {
        if self.store.is_empty() {
            writeln!(self.out, "No tasks found.")?;
            return Ok(None);
        }
        writeln!(self.out, "Current tasks:")?;
        display::write_brief(&mut self.out, self.store.list())?;
        self.ask_id(&format!("\nEnter the ID of the task to {verb}: ")).map(Some)
    }

    /// Recurrence sub-menu. `None` when the choice was not understood.
    fn ask_recurrence(&mut self) -> Result<Option<Recurrence>, InputError> {
        writeln!(self.out, "Select recurrence pattern:")?;
        writeln!(self.out, "1. Daily")?;
        writeln!(self.out, "2. Weekly")?;
        writeln!(self.out, "3. Monthly")?;
        writeln!(self.out, "4. Yearly")?;
        writeln!(self.out, "5. Custom (every X days)")?;
        let choice = self.ask("Enter choice (1-5): ")?;
        let rule = match choice.as_str() {
            "1" => Recurrence::daily(),
            "2" => {
                let days = self.ask(
                    "Enter days of the week (comma-separated, e.g., Monday, Wednesday): ",
                )?;
                Recurrence::weekly_on(Recurrence::parse_days(&days))
            }
            "3" => Recurrence::new(Interval::Monthly, 1),
            "4" => Recurrence::new(Interval::Yearly, 1),
            "5" => {
                let raw = self.ask("Repeat every how many days?: ")?;
                let every = match raw.parse::<u32>() {
                    Ok(n) if n >= 1 => n,
                    _ => {
                        writeln!(self.out, "Invalid number. Using default of 1 day.")?;
                        1
                    }
                };
                Recurrence::new(Interval::Custom, every)
            }
            _ => return Ok(None),
        };
        Ok(Some(rule))
    }

    /// Handle adding a new task.
    fn add_task(&mut self) -> Result<(), InputError> {
        writeln!(self.out, "\nAdding a new task...")?;
        let title = self.ask("Enter task title: ")?;
        if title.is_empty() {
            return Err(InputError::EmptyTitle);
        }
        let description = self.ask("Enter task description (optional, press Enter to skip): ")?;

        let mut priority =
            self.ask("Enter priority (High/H/1, Medium/M/2, Low/L/3) [default: Medium]: ")?;
        if priority.is_empty() {
            priority = Priority::Medium.to_string();
        } else if !Priority::is_valid(&priority) {
            writeln!(self.out, "Invalid priority. Using 'Medium' as default.")?;
            priority = Priority::Medium.to_string();
        }

        let tags =
            normalize_tags(&self.ask("Enter tags (comma-separated, press Enter to skip): ")?);

        let due_input = self.ask(
            "Enter due date (YYYY-MM-DD, MM/DD/YYYY, or relative terms like 'tomorrow', \
             press Enter to skip): ",
        )?;
        let due = if due_input.is_empty() {
            None
        } else if temporal::resolve_due_input(&due_input).is_none() {
            writeln!(self.out, "Invalid date format. Due date will be skipped.")?;
            None
        } else {
            Some(due_input.as_str())
        };

        let mut recurring = None;
        let repeat = self.ask("Should this task repeat? (y/N): ")?.to_lowercase();
        if repeat == "y" || repeat == "yes" {
            recurring = self.ask_recurrence()?;
            if recurring.is_none() {
                writeln!(self.out, "Invalid choice. Recurrence will be skipped.")?;
            }
        }

        let task = self.store.create(&title, &description, &priority, tags, due, recurring);
        let id = task.id;
        if !self.store.add(task) {
            writeln!(self.out, "Could not add task: ID {id} is already in use.")?;
            return Ok(());
        }
        writeln!(self.out, "Task '{title}' added successfully with ID {id}!")?;
        Ok(())
    }

    fn view_all(&mut self) -> Result<(), InputError> {
        let now = (self.clock)();
        let tasks: Vec<&Task> = self.store.list().iter().collect();
        print_tasks(&mut self.out, "All tasks", &tasks, "No tasks found.", now, self.color)?;
        Ok(())
    }

    /// Handle updating a task. Empty answers keep the current value.
    fn update_task(&mut self) -> Result<(), InputError> {
        writeln!(self.out, "\nUpdating a task...")?;
        let Some(id) = self.pick_task("update")? else {
            return Ok(());
        };
        let Some(current) = self.store.get(id).cloned() else {
            return Err(InputError::TaskNotFound(id));
        };
        let mut update = TaskUpdate::default();

        let title = self.ask(&format!(
            "Enter new title (current: '{}', press Enter to keep current): ",
            current.title
        ))?;
        if !title.is_empty() {
            update.title = Some(title);
        }

        let desc = self.ask(&format!(
            "Enter new description (current: '{}', press Enter to keep current): ",
            current.description
        ))?;
        if !desc.is_empty() {
            update.description = Some(desc);
        }

        let priority = self.ask(&format!(
            "Enter new priority (current: '{}', High/H/1, Medium/M/2, Low/L/3, \
             press Enter to keep current): ",
            current.priority
        ))?;
        if !priority.is_empty() {
            if Priority::is_valid(&priority) {
                update.priority = Some(priority);
            } else {
                writeln!(self.out, "Invalid priority. Keeping current priority.")?;
            }
        }

        let tags = self.ask(&format!(
            "Enter new tags (current: '{}', comma-separated, press Enter to keep current): ",
            current.tags.join(", ")
        ))?;
        if !tags.is_empty() {
            update.tags = Some(normalize_tags(&tags));
        }

        let current_due = current.due_date.map(format_due_date).unwrap_or_default();
        let due = self.ask(&format!(
            "Enter new due date (current: '{current_due}', 'none' to clear, \
             press Enter to keep current): "
        ))?;
        match due.to_lowercase().as_str() {
            "" => {}
            "none" | "clear" => update.clear_due = true,
            _ if temporal::resolve_due_input(&due).is_some() => update.due_date = Some(due),
            _ => writeln!(self.out, "Invalid date format. Keeping current due date.")?,
        }

        let current_rule = current
            .recurring
            .as_ref()
            .map(describe_recurrence)
            .unwrap_or_else(|| "None".to_string());
        let answer = self
            .ask(&format!("Update recurrence? (current: {current_rule}, y/N/clear): "))?
            .to_lowercase();
        match answer.as_str() {
            "y" | "yes" => match self.ask_recurrence()? {
                Some(rule) => update.recurring = Some(rule),
                None => writeln!(self.out, "Invalid choice. Keeping current recurrence.")?,
            },
            "clear" => update.clear_recurring = true,
            _ => {}
        }

        if update.is_empty() {
            writeln!(self.out, "Nothing to change.")?;
        } else if self.store.update(id, update) {
            writeln!(self.out, "Task with ID {id} updated successfully!")?;
        }
        Ok(())
    }

    /// Handle deleting a task after confirmation.
    fn delete_task(&mut self) -> Result<(), InputError> {
        writeln!(self.out, "\nDeleting a task...")?;
        let Some(id) = self.pick_task("delete")? else {
            return Ok(());
        };
        let title = self.store.get(id).map(|t| t.title.clone()).unwrap_or_default();
        let confirm =
            self.ask(&format!("Are you sure you want to delete task '{title}'? (y/N): "))?;
        if !confirm.eq_ignore_ascii_case("y") {
            writeln!(self.out, "Task deletion cancelled.")?;
            return Ok(());
        }
        if self.store.delete(id) {
            writeln!(self.out, "Task with ID {id} deleted successfully!")?;
        }
        Ok(())
    }

    /// Handle toggling a task's completion status.
    fn toggle_task(&mut self) -> Result<(), InputError> {
        writeln!(self.out, "\nToggling task status...")?;
        let Some(id) = self.pick_task("toggle")? else {
            return Ok(());
        };
        let now = (self.clock)();
        let Some(result) = self.store.toggle_at(id, now) else {
            return Err(InputError::TaskNotFound(id));
        };
        writeln!(self.out, "Task {id} is now {}.", display::status_marker(result.completed))?;
        if let Some(next_id) = result.spawned {
            let due = self
                .store
                .get(next_id)
                .and_then(|t| t.due_date)
                .map(format_due_date)
                .unwrap_or_default();
            writeln!(self.out, "Next occurrence created with ID {next_id}, due {due}.")?;
        }
        Ok(())
    }

    fn search_tasks(&mut self) -> Result<(), InputError> {
        let keyword = self.ask("Enter keyword to search in title or description: ")?;
        if keyword.is_empty() {
            return Err(InputError::EmptyKeyword);
        }
        let now = (self.clock)();
        let found = self.store.search(&keyword);
        let empty = format!("No tasks found containing '{keyword}'.");
        print_tasks(&mut self.out, "Matching tasks", &found, &empty, now, self.color)?;
        Ok(())
    }

    /// Ask a three-way question (only / not / all) for a boolean filter.
    fn ask_tristate(&mut self, what: &str) -> Result<Option<Option<bool>>, InputError> {
        writeln!(self.out, "1. {what} only")?;
        writeln!(self.out, "2. Not {} only", what.to_lowercase())?;
        writeln!(self.out, "3. All tasks")?;
        let choice = self.ask("Choose filter (1-3): ")?;
        Ok(match choice.as_str() {
            "1" => Some(Some(true)),
            "2" => Some(Some(false)),
            "3" => Some(None),
            _ => None,
        })
    }

    fn filter_tasks(&mut self) -> Result<(), InputError> {
        writeln!(self.out, "\nFilter options:")?;
        writeln!(self.out, "1. Filter by status")?;
        writeln!(self.out, "2. Filter by priority")?;
        writeln!(self.out, "3. Filter by tag")?;
        writeln!(self.out, "4. Filter by overdue status")?;
        writeln!(self.out, "5. Filter by upcoming status")?;
        writeln!(self.out, "6. Filter by recurring status")?;
        writeln!(self.out, "7. Back to main menu")?;
        let choice = self.ask("Choose filter option (1-7): ")?;

        let mut filter = TaskFilter::default();
        match choice.as_str() {
            "1" => {
                writeln!(self.out, "1. Completed only")?;
                writeln!(self.out, "2. Incomplete only")?;
                writeln!(self.out, "3. All tasks")?;
                let c = self.ask("Choose status filter (1-3): ")?;
                filter.status = match c.as_str() {
                    "1" => Some(StatusFilter::Completed),
                    "2" => Some(StatusFilter::Incomplete),
                    "3" => None,
                    _ => return Err(InputError::InvalidChoice(c)),
                };
            }
            "2" => {
                let c = self.ask("Choose priority filter (1 High, 2 Medium, 3 Low): ")?;
                match c.as_str() {
                    "1" | "2" | "3" => filter.priority = Priority::parse(&c),
                    _ => return Err(InputError::InvalidChoice(c)),
                }
            }
            "3" => {
                let tag = self.ask("Enter tag to filter by: ")?;
                if tag.is_empty() {
                    return Err(InputError::EmptyTag);
                }
                filter.tag = Some(tag);
            }
            "4" | "5" | "6" => {
                let what = match choice.as_str() {
                    "4" => "Overdue",
                    "5" => "Upcoming",
                    _ => "Recurring",
                };
                let Some(want) = self.ask_tristate(what)? else {
                    return Err(InputError::InvalidChoice(choice));
                };
                match what {
                    "Overdue" => filter.overdue = want,
                    "Upcoming" => filter.upcoming = want,
                    _ => filter.recurring = want,
                }
            }
            "7" => return Ok(()),
            _ => return Err(InputError::InvalidChoice(choice)),
        }

        let now = (self.clock)();
        let tasks = self.store.filter_tasks(&filter, now);
        print_tasks(
            &mut self.out,
            "Filtered tasks",
            &tasks,
            "No tasks found matching the filter criteria.",
            now,
            self.color,
        )?;
        Ok(())
    }

    fn sort_tasks(&mut self) -> Result<(), InputError> {
        writeln!(self.out, "\nSort options:")?;
        writeln!(self.out, "1. Sort by priority (High first)")?;
        writeln!(self.out, "2. Sort alphabetically by title")?;
        writeln!(self.out, "3. Sort by creation order (ID)")?;
        writeln!(self.out, "4. Sort by due date")?;
        writeln!(self.out, "5. Back to main menu")?;
        let choice = self.ask("Choose sort option (1-5): ")?;
        let key = match choice.as_str() {
            "1" => SortKey::Priority,
            "2" => SortKey::Title,
            "3" => SortKey::Id,
            "4" => SortKey::DueDate,
            "5" => return Ok(()),
            _ => return Err(InputError::InvalidChoice(choice)),
        };
        let now = (self.clock)();
        let tasks = self.store.sorted(key);
        let heading = format!("Sorted tasks - by {key}");
        print_tasks(&mut self.out, &heading, &tasks, "No tasks found.", now, self.color)?;
        Ok(())
    }

    fn view_overdue(&mut self) -> Result<(), InputError> {
        let now = (self.clock)();
        let tasks = self.store.overdue(now);
        print_tasks(
            &mut self.out,
            "Overdue tasks",
            &tasks,
            "No overdue tasks found.",
            now,
            self.color,
        )?;
        Ok(())
    }

    fn view_upcoming(&mut self) -> Result<(), InputError> {
        let now = (self.clock)();
        let tasks = self.store.upcoming(now);
        print_tasks(
            &mut self.out,
            "Upcoming tasks",
            &tasks,
            "No upcoming tasks found.",
            now,
            self.color,
        )?;
        Ok(())
    }

    fn view_recurring(&mut self) -> Result<(), InputError> {
        let now = (self.clock)();
        let tasks = self.store.recurring();
        print_tasks(
            &mut self.out,
            "Recurring tasks",
            &tasks,
            "No recurring tasks found.",
            now,
            self.color,
        )?;
        Ok(())
    }
}
