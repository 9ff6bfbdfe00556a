//! Filtered, sorted projections of the task collection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::task::Task;

/// Which tasks a listing shows
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }

    /// Title and hint shown when nothing matches
    pub fn empty_state(&self) -> (&'static str, &'static str) {
        match self {
            Filter::All => ("No tasks yet", "Add your first task with `todo add`"),
            Filter::Active => ("No active tasks", "All tasks have been completed!"),
            Filter::Completed => (
                "No completed tasks",
                "You haven't completed any tasks yet",
            ),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "completed" => Ok(Filter::Completed),
            other => Err(Error::InvalidArgument(format!(
                "unknown filter '{other}' (expected all|active|completed)"
            ))),
        }
    }
}

/// Task totals, always over the full collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    pub all: usize,
    pub active: usize,
    pub completed: usize,
}

impl TaskCounts {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|task| task.completed).count();
        Self {
            all: tasks.len(),
            active: tasks.len() - completed,
            completed,
        }
    }

    pub fn get(&self, filter: Filter) -> usize {
        match filter {
            Filter::All => self.all,
            Filter::Active => self.active,
            Filter::Completed => self.completed,
        }
    }
}

/// Tasks matching `filter`, incomplete first, newest first within a group
///
/// The sort is stable: ties keep their collection order.
pub fn visible_tasks(tasks: &[Task], filter: Filter) -> Vec<&Task> {
    let mut visible: Vec<&Task> = tasks.iter().filter(|task| filter.matches(task)).collect();
    visible.sort_by(|left, right| {
        left.completed
            .cmp(&right.completed)
            .then_with(|| right.created_at.cmp(&left.created_at))
    });
    visible
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, completed: bool, created_at: i64) -> Task {
        Task {
            id: id.to_string(),
            name: id.to_uppercase(),
            description: "d".to_string(),
            completed,
            created_at,
        }
    }

    fn ids(tasks: Vec<&Task>) -> Vec<&str> {
        tasks.into_iter().map(|task| task.id.as_str()).collect()
    }

    fn sample() -> Vec<Task> {
        vec![task("a", false, 10), task("b", true, 20), task("c", false, 30)]
    }

    #[test]
    fn all_orders_incomplete_then_newest() {
        let tasks = sample();
        assert_eq!(ids(visible_tasks(&tasks, Filter::All)), vec!["c", "a", "b"]);
    }

    #[test]
    fn active_and_completed_select_by_flag() {
        let tasks = sample();
        assert_eq!(ids(visible_tasks(&tasks, Filter::Active)), vec!["c", "a"]);
        assert_eq!(ids(visible_tasks(&tasks, Filter::Completed)), vec!["b"]);
    }

    #[test]
    fn ties_keep_collection_order() {
        let tasks = vec![
            task("x", false, 5),
            task("y", true, 5),
            task("z", false, 5),
            task("w", true, 5),
        ];
        assert_eq!(
            ids(visible_tasks(&tasks, Filter::All)),
            vec!["x", "z", "y", "w"]
        );
    }

    #[test]
    fn empty_collection_yields_empty_view() {
        assert!(visible_tasks(&[], Filter::All).is_empty());
    }

    #[test]
    fn counts_ignore_filter() {
        let counts = TaskCounts::from_tasks(&sample());
        assert_eq!(
            counts,
            TaskCounts {
                all: 3,
                active: 2,
                completed: 1
            }
        );
        assert_eq!(counts.get(Filter::Active), 2);
        assert_eq!(counts.get(Filter::Completed), 1);
    }

    #[test]
    fn filter_parses_and_displays() {
        assert_eq!("Active".parse::<Filter>().unwrap(), Filter::Active);
        assert_eq!(" completed ".parse::<Filter>().unwrap(), Filter::Completed);
        assert!(matches!(
            "done".parse::<Filter>(),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(Filter::default().to_string(), "all");
    }

    #[test]
    fn empty_state_differs_per_filter() {
        assert_eq!(Filter::All.empty_state().0, "No tasks yet");
        assert_eq!(Filter::Active.empty_state().1, "All tasks have been completed!");
        assert_eq!(Filter::Completed.empty_state().0, "No completed tasks");
    }
}
