//! In-memory task store.
//!
//! `TaskStore` owns the ordered task collection and the id counter. Every
//! operation reports failure as a `false`/`None` return so the caller can
//! decide whether to re-prompt, substitute a default or ignore it.

use chrono::{Local, NaiveDateTime};

use crate::fields::*;
use crate::task::{Recurrence, Task, TaskUpdate};
use crate::temporal::{self, due_sort_key, is_overdue, is_upcoming};

/// Ordered task collection with a monotonic id counter.
///
/// Ids are never handed out twice, even after the task holding one is
/// deleted. Mutating operations need `&mut self`; a multi-client front end
/// would have to wrap the store in a single lock.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    last_id: u64,
}

/// Criteria for `TaskStore::filter_tasks`. Unset fields match everything;
/// set fields must all match.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<StatusFilter>,
    pub priority: Option<Priority>,
    pub tag: Option<String>,
    pub overdue: Option<bool>,
    pub upcoming: Option<bool>,
    pub recurring: Option<bool>,
}

/// Outcome of toggling a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggled {
    /// Completion state after the toggle.
    pub completed: bool,
    /// Id of the next occurrence, when one was spawned.
    pub spawned: Option<u64>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a task with a freshly reserved id. The task is not stored
    /// until it is passed to `add`.
    ///
    /// Priority text is normalised (unknown values become `Medium`) and due
    /// text is parsed as ISO-8601 or any format `parse_datetime` accepts;
    /// unparseable due text leaves the task undated.
    pub fn create(
        &mut self,
        title: &str,
        description: &str,
        priority: &str,
        tags: Vec<String>,
        due_date: Option<&str>,
        recurring: Option<Recurrence>,
    ) -> Task {
        let due = due_date.and_then(|s| {
            let parsed = temporal::resolve_due_input(s);
            if parsed.is_none() {
                log::warn!("could not parse due date {s:?}, leaving task undated");
            }
            parsed
        });
        self.build(
            title.trim().to_string(),
            description.trim().to_string(),
            Priority::normalize(priority),
            tags,
            due,
            recurring,
        )
    }

    fn build(
        &mut self,
        title: String,
        description: String,
        priority: Priority,
        tags: Vec<String>,
        due_date: Option<NaiveDateTime>,
        recurring: Option<Recurrence>,
    ) -> Task {
        self.last_id += 1;
        Task {
            id: self.last_id,
            title,
            description,
            completed: false,
            priority,
            tags,
            due_date,
            recurring,
        }
    }

    /// Append a task. Refuses a task whose id is already present.
    pub fn add(&mut self, task: Task) -> bool {
        if self.get(task.id).is_some() {
            log::warn!("refusing to add task {}: id already in use", task.id);
            return false;
        }
        // Keep the counter ahead of ids built outside `create`.
        self.last_id = self.last_id.max(task.id);
        log::debug!("added task {} {:?}", task.id, task.title);
        self.tasks.push(task);
        true
    }

    /// All tasks in insertion order.
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Get a task by ID.
    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Apply the fields set in `update`. Returns `false` if `id` is absent.
    ///
    /// Invalid values fall back to the task's current value: a blank title,
    /// an unrecognised priority and unparseable due text are all ignored.
    pub fn update(&mut self, id: u64, update: TaskUpdate) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };

        if let Some(title) = update.title {
            let title = title.trim();
            if title.is_empty() {
                log::warn!("ignoring blank title for task {id}");
            } else {
                task.title = title.to_string();
            }
        }
        if let Some(desc) = update.description {
            task.description = desc.trim().to_string();
        }
        if let Some(completed) = update.completed {
            task.completed = completed;
        }
        if let Some(p) = update.priority {
            match Priority::parse(&p) {
                Some(p) => task.priority = p,
                None => log::warn!("ignoring unrecognised priority {p:?} for task {id}"),
            }
        }
        if let Some(tags) = update.tags {
            task.tags = tags;
        }
        if update.clear_due {
            task.due_date = None;
        } else if let Some(text) = update.due_date {
            match temporal::resolve_due_input(&text) {
                Some(due) => task.due_date = Some(due),
                None => log::warn!("could not parse due date {text:?}, keeping previous"),
            }
        }
        if update.clear_recurring {
            task.recurring = None;
        } else if let Some(r) = update.recurring {
            task.recurring = Some(r);
        }

        log::debug!("updated task {id}");
        true
    }

    /// Remove a task permanently. Returns `false` if `id` is absent.
    pub fn delete(&mut self, id: u64) -> bool {
        match self.position(id) {
            Some(idx) => {
                self.tasks.remove(idx);
                log::debug!("deleted task {id}");
                true
            }
            None => false,
        }
    }

    /// Flip a task's completion flag against the local clock.
    pub fn toggle(&mut self, id: u64) -> bool {
        self.toggle_at(id, Local::now().naive_local()).is_some()
    }

    /// Flip a task's completion flag.
    ///
    /// A recurring task first spawns its next occurrence as a new, incomplete
    /// task. This happens on every toggle of a recurring task, whichever way
    /// the flag moves, so toggling the same task twice yields two successors.
    pub fn toggle_at(&mut self, id: u64, now: NaiveDateTime) -> Option<Toggled> {
        let idx = self.position(id)?;

        let mut spawned = None;
        if self.tasks[idx].is_recurring() {
            match temporal::next_occurrence(&self.tasks[idx], now) {
                Some(due) => {
                    let src = self.tasks[idx].clone();
                    let next = self.build(
                        src.title,
                        src.description,
                        src.priority,
                        src.tags,
                        Some(due),
                        src.recurring,
                    );
                    log::debug!("task {id} spawned occurrence {} due {due}", next.id);
                    spawned = Some(next.id);
                    self.tasks.push(next);
                }
                None => log::warn!("task {id}: next occurrence is out of range, not spawning"),
            }
        }

        let task = &mut self.tasks[idx];
        task.completed = !task.completed;
        log::debug!("task {id} completed={}", task.completed);
        Some(Toggled {
            completed: task.completed,
            spawned,
        })
    }

    /// Tasks matching every criterion set in `filter`, in insertion order.
    pub fn filter_tasks(&self, filter: &TaskFilter, now: NaiveDateTime) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| match filter.status {
                Some(StatusFilter::Completed) => t.completed,
                Some(StatusFilter::Incomplete) => !t.completed,
                None => true,
            })
            .filter(|t| filter.priority.map_or(true, |p| t.priority == p))
            .filter(|t| filter.tag.as_deref().map_or(true, |tag| t.has_tag(tag)))
            .filter(|t| filter.overdue.map_or(true, |want| is_overdue(t, now) == want))
            .filter(|t| filter.upcoming.map_or(true, |want| is_upcoming(t, now) == want))
            .filter(|t| filter.recurring.map_or(true, |want| t.is_recurring() == want))
            .collect()
    }

    /// Case-insensitive substring search over titles and descriptions.
    /// An empty keyword matches nothing.
    pub fn search(&self, keyword: &str) -> Vec<&Task> {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return Vec::new();
        }
        self.tasks
            .iter()
            .filter(|t| {
                t.title.to_lowercase().contains(&keyword)
                    || t.description.to_lowercase().contains(&keyword)
            })
            .collect()
    }

    /// All tasks ordered by `key`.
    pub fn sorted(&self, key: SortKey) -> Vec<&Task> {
        sort_tasks(self.tasks.iter(), key)
    }

    pub fn overdue(&self, now: NaiveDateTime) -> Vec<&Task> {
        self.tasks.iter().filter(|t| is_overdue(t, now)).collect()
    }

    pub fn upcoming(&self, now: NaiveDateTime) -> Vec<&Task> {
        self.tasks.iter().filter(|t| is_upcoming(t, now)).collect()
    }

    pub fn recurring(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.is_recurring()).collect()
    }
}

/// Order tasks by `key`. The sort is stable, so ties keep their input order.
pub fn sort_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>, key: SortKey) -> Vec<&'a Task> {
    let mut out: Vec<&Task> = tasks.into_iter().collect();
    match key {
        SortKey::Priority => out.sort_by_key(|t| t.priority),
        SortKey::Title => out.sort_by_cached_key(|t| t.title.to_lowercase()),
        SortKey::Id => out.sort_by_key(|t| t.id),
        SortKey::DueDate => out.sort_by_key(|t| due_sort_key(t)),
    }
    out
}

/// Split comma-separated tag input, trimming each tag and dropping empties.
pub fn normalize_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn add(store: &mut TaskStore, title: &str, priority: &str, due: Option<&str>) -> u64 {
        let task = store.create(title, "", priority, Vec::new(), due, None);
        let id = task.id;
        assert!(store.add(task));
        id
    }

    #[test]
    fn test_create_normalises_priority() {
        let mut store = TaskStore::new();
        for (input, want) in [
            ("h", Priority::High),
            ("H", Priority::High),
            ("1", Priority::High),
            ("m", Priority::Medium),
            ("LOW", Priority::Low),
            ("3", Priority::Low),
            ("bogus", Priority::Medium),
        ] {
            let task = store.create("t", "", input, Vec::new(), None, None);
            assert_eq!(task.priority, want, "{input}");
        }
    }

    #[test]
    fn test_add_then_get_returns_created() {
        let mut store = TaskStore::new();
        let task = store.create(
            "Write report",
            "quarterly numbers",
            "High",
            vec!["work".into(), "q3".into()],
            Some("2024-03-15 09:30"),
            Some(Recurrence::new(Interval::Monthly, 1)),
        );
        let copy = task.clone();
        assert!(store.add(task));
        assert_eq!(store.get(copy.id), Some(&copy));
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_create_with_unparseable_due_is_undated() {
        let mut store = TaskStore::new();
        let task = store.create("t", "", "Medium", Vec::new(), Some("someday"), None);
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn test_create_accepts_iso_due() {
        let mut store = TaskStore::new();
        let task = store.create("t", "", "Medium", Vec::new(), Some("2024-03-15T10:30:00"), None);
        assert_eq!(task.due_date, Some(at(2024, 3, 15) + chrono::Duration::minutes(630)));
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let mut store = TaskStore::new();
        let a = add(&mut store, "a", "M", None);
        let b = add(&mut store, "b", "M", None);
        assert!(store.delete(b));
        let c = add(&mut store, "c", "M", None);
        assert_eq!((a, b, c), (1, 2, 3));
        assert!(store.delete(a));
        assert_eq!(store.create("d", "", "M", Vec::new(), None, None).id, 4);
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        let mut store = TaskStore::new();
        let task = store.create("a", "", "M", Vec::new(), None, None);
        assert!(store.add(task.clone()));
        assert!(!store.add(task));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_foreign_task_advances_counter() {
        let mut store = TaskStore::new();
        let mut task = store.create("a", "", "M", Vec::new(), None, None);
        task.id = 10;
        assert!(store.add(task));
        assert_eq!(store.create("b", "", "M", Vec::new(), None, None).id, 11);
    }

    #[test]
    fn test_delete_then_get_is_absent() {
        let mut store = TaskStore::new();
        let id = add(&mut store, "a", "M", None);
        assert!(store.delete(id));
        assert!(store.get(id).is_none());
        assert!(!store.delete(id));
    }

    #[test]
    fn test_missing_ids_report_false() {
        let mut store = TaskStore::new();
        assert!(store.get(7).is_none());
        assert!(!store.update(7, TaskUpdate::default()));
        assert!(!store.delete(7));
        assert!(!store.toggle(7));
    }

    #[test]
    fn test_empty_update_is_noop() {
        let mut store = TaskStore::new();
        let task = store.create(
            "a",
            "d",
            "L",
            vec!["x".into()],
            Some("2024-01-02"),
            Some(Recurrence::daily()),
        );
        let before = task.clone();
        store.add(task);
        assert!(store.update(before.id, TaskUpdate::default()));
        assert_eq!(store.get(before.id), Some(&before));
    }

    #[test]
    fn test_update_applies_only_given_fields() {
        let mut store = TaskStore::new();
        let id = add(&mut store, "old", "M", Some("2024-01-02"));
        let update = TaskUpdate {
            title: Some("new".into()),
            priority: Some("h".into()),
            ..Default::default()
        };
        assert!(store.update(id, update));
        let task = store.get(id).unwrap();
        assert_eq!(task.title, "new");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due_date, Some(at(2024, 1, 2)));
    }

    #[test]
    fn test_update_invalid_values_keep_previous() {
        let mut store = TaskStore::new();
        let id = add(&mut store, "keep", "L", Some("2024-01-02"));
        let update = TaskUpdate {
            title: Some("   ".into()),
            priority: Some("urgent".into()),
            due_date: Some("not a date".into()),
            ..Default::default()
        };
        assert!(store.update(id, update));
        let task = store.get(id).unwrap();
        assert_eq!(task.title, "keep");
        assert_eq!(task.priority, Priority::Low);
        assert_eq!(task.due_date, Some(at(2024, 1, 2)));
    }

    #[test]
    fn test_update_clears_due_and_recurrence() {
        let mut store = TaskStore::new();
        let task =
            store.create("a", "", "M", Vec::new(), Some("2024-01-02"), Some(Recurrence::daily()));
        let id = task.id;
        store.add(task);
        let update = TaskUpdate {
            due_date: Some("2025-01-01".into()),
            clear_due: true,
            clear_recurring: true,
            ..Default::default()
        };
        assert!(store.update(id, update));
        let task = store.get(id).unwrap();
        assert_eq!(task.due_date, None);
        assert_eq!(task.recurring, None);
    }

    #[test]
    fn test_toggle_plain_task_flips() {
        let mut store = TaskStore::new();
        let id = add(&mut store, "a", "M", None);
        let now = at(2024, 1, 1);
        assert_eq!(store.toggle_at(id, now), Some(Toggled { completed: true, spawned: None }));
        assert_eq!(store.toggle_at(id, now), Some(Toggled { completed: false, spawned: None }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_toggle_recurring_spawns_next_occurrence() {
        let mut store = TaskStore::new();
        let now = at(2024, 6, 10);
        let tomorrow = (now.date() + Days::new(1)).format("%Y-%m-%d").to_string();
        let task = store.create(
            "Water plants",
            "balcony",
            "L",
            vec!["home".into()],
            Some(&tomorrow),
            Some(Recurrence::daily()),
        );
        let id = task.id;
        store.add(task);

        let result = store.toggle_at(id, now).unwrap();
        assert_eq!(store.len(), 2);
        assert!(result.completed);

        let original = store.get(id).unwrap().clone();
        let next = store.get(result.spawned.unwrap()).unwrap();
        assert!(original.completed);
        assert!(!next.completed);
        assert_ne!(next.id, original.id);
        assert_eq!(next.due_date, Some(at(2024, 6, 12)));
        assert_eq!(next.title, original.title);
        assert_eq!(next.description, original.description);
        assert_eq!(next.priority, original.priority);
        assert_eq!(next.tags, original.tags);
        assert_eq!(next.recurring, original.recurring);
    }

    #[test]
    fn test_toggle_recurring_twice_spawns_twice() {
        let mut store = TaskStore::new();
        let task =
            store.create("a", "", "M", Vec::new(), Some("2024-01-01"), Some(Recurrence::daily()));
        let id = task.id;
        store.add(task);
        let now = at(2024, 1, 1);
        store.toggle_at(id, now);
        let second = store.toggle_at(id, now).unwrap();
        assert!(!second.completed);
        assert!(second.spawned.is_some());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_pay_bills_scenario() {
        let mut store = TaskStore::new();
        let task = store.create("Pay bills", "", "H", Vec::new(), Some("yesterday"), None);
        let id = task.id;
        store.add(task);
        let now = Local::now().naive_local();
        let task = store.get(id).unwrap();
        assert_eq!(task.priority, Priority::High);
        assert!(temporal::is_overdue(task, now));
        assert!(!temporal::is_upcoming(task, now));
    }

    #[test]
    fn test_filter_by_status_preserves_order() {
        let mut store = TaskStore::new();
        let ids: Vec<u64> = (0..5).map(|i| add(&mut store, &format!("t{i}"), "M", None)).collect();
        store.toggle(ids[3]);
        store.toggle(ids[1]);
        let filter = TaskFilter {
            status: Some(StatusFilter::Completed),
            ..Default::default()
        };
        let done: Vec<u64> =
            store.filter_tasks(&filter, at(2024, 1, 1)).iter().map(|t| t.id).collect();
        assert_eq!(done, vec![ids[1], ids[3]]);

        let filter = TaskFilter {
            status: Some(StatusFilter::Incomplete),
            ..Default::default()
        };
        assert_eq!(store.filter_tasks(&filter, at(2024, 1, 1)).len(), 3);
    }

    #[test]
    fn test_filter_combines_criteria() {
        let mut store = TaskStore::new();
        let now = at(2024, 3, 15);
        let t = store.create("late", "", "H", vec!["work".into()], Some("2024-03-01"), None);
        store.add(t);
        let t = store.create(
            "soon",
            "",
            "H",
            vec!["work".into()],
            Some("2024-04-01"),
            Some(Recurrence::daily()),
        );
        store.add(t);
        let t = store.create("home", "", "L", vec!["home".into()], Some("2024-03-01"), None);
        store.add(t);

        let titles = |f: &TaskFilter| -> Vec<String> {
            store.filter_tasks(f, now).iter().map(|t| t.title.clone()).collect()
        };
        let work_overdue =
            TaskFilter { tag: Some("work".into()), overdue: Some(true), ..Default::default() };
        assert_eq!(titles(&work_overdue), vec!["late"]);
        let high_upcoming = TaskFilter {
            priority: Some(Priority::High),
            upcoming: Some(true),
            ..Default::default()
        };
        assert_eq!(titles(&high_upcoming), vec!["soon"]);
        assert_eq!(
            titles(&TaskFilter { recurring: Some(false), ..Default::default() }),
            vec!["late", "home"]
        );
        assert_eq!(
            titles(&TaskFilter { overdue: Some(false), ..Default::default() }),
            vec!["soon"]
        );
        assert_eq!(titles(&TaskFilter::default()).len(), 3);
    }

    #[test]
    fn test_sort_by_due_date_puts_undated_last() {
        let mut store = TaskStore::new();
        add(&mut store, "none1", "M", None);
        add(&mut store, "march", "M", Some("2024-03-01"));
        add(&mut store, "none2", "M", None);
        add(&mut store, "jan", "M", Some("01/15/2024"));
        add(&mut store, "feb-noon", "M", Some("2024-02-01 12:00"));
        let titles: Vec<&str> =
            store.sorted(SortKey::DueDate).iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["jan", "feb-noon", "march", "none1", "none2"]);
    }

    #[test]
    fn test_sort_by_priority_and_title() {
        let mut store = TaskStore::new();
        add(&mut store, "beta", "L", None);
        add(&mut store, "Alpha", "M", None);
        add(&mut store, "gamma", "H", None);
        add(&mut store, "delta", "M", None);
        let by_priority: Vec<&str> =
            store.sorted(SortKey::Priority).iter().map(|t| t.title.as_str()).collect();
        assert_eq!(by_priority, vec!["gamma", "Alpha", "delta", "beta"]);
        let by_title: Vec<&str> =
            store.sorted(SortKey::Title).iter().map(|t| t.title.as_str()).collect();
        assert_eq!(by_title, vec!["Alpha", "beta", "delta", "gamma"]);
        let by_id: Vec<u64> =
            sort_tasks(store.sorted(SortKey::Title), SortKey::Id).iter().map(|t| t.id).collect();
        assert_eq!(by_id, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_search() {
        let mut store = TaskStore::new();
        let t = store.create("Buy milk", "", "M", Vec::new(), None, None);
        store.add(t);
        let t = store.create("Call mom", "ask about MILK recipe", "M", Vec::new(), None, None);
        store.add(t);
        add(&mut store, "Other", "M", None);
        assert_eq!(store.search("milk").len(), 2);
        assert_eq!(store.search("CALL").len(), 1);
        assert!(store.search("").is_empty());
        assert!(store.search("zzz").is_empty());
    }

    #[test]
    fn test_views() {
        let mut store = TaskStore::new();
        let now = at(2024, 3, 15);
        add(&mut store, "past", "M", Some("2024-03-14"));
        add(&mut store, "today", "M", Some("2024-03-15"));
        add(&mut store, "future", "M", Some("2024-03-16"));
        let t = store.create("repeat", "", "M", Vec::new(), None, Some(Recurrence::daily()));
        store.add(t);
        assert_eq!(store.overdue(now).len(), 1);
        assert_eq!(store.upcoming(now).len(), 1);
        assert_eq!(store.recurring().len(), 1);
    }

    #[test]
    fn test_normalize_tags() {
        assert_eq!(normalize_tags(" work, urgent ,,home "), vec!["work", "urgent", "home"]);
        assert!(normalize_tags("").is_empty());
        assert!(normalize_tags(" , ").is_empty());
    }
}
