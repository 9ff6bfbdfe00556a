//! Task records and the task store.
//!
//! The store owns the authoritative in-memory collection and writes the
//! full collection through its `Persistence` adapter after every accepted
//! mutation. Write failures never undo a mutation: they are logged and kept
//! as warnings, and the in-memory collection stays authoritative for the
//! rest of the session.

use std::collections::HashSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::{Error, Result};
use crate::storage::{KeyValueStore, Persistence};
use crate::view::TaskCounts;

/// A single to-do item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    /// Creation time, epoch milliseconds
    pub created_at: i64,
}

pub struct TaskStore<S> {
    persistence: Persistence<S>,
    tasks: Vec<Task>,
    last_id: Option<Ulid>,
    warnings: Vec<String>,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Open a store, loading the persisted collection once
    pub fn open(persistence: Persistence<S>) -> Self {
        let tasks = dedupe_ids(persistence.load());
        Self {
            persistence,
            tasks,
            last_id: None,
            warnings: Vec::new(),
        }
    }

    /// All tasks in collection order (most recently created first)
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn counts(&self) -> TaskCounts {
        TaskCounts::from_tasks(&self.tasks)
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn persistence_mut(&mut self) -> &mut Persistence<S> {
        &mut self.persistence
    }

    /// Drain warnings recorded by failed writes
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    /// Resolve a full id or a unique, case-insensitive id prefix
    pub fn resolve_id(&self, input: &str) -> Result<String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidArgument("task id cannot be empty".to_string()));
        }
        let needle = trimmed.to_ascii_lowercase();

        if let Some(task) = self
            .tasks
            .iter()
            .find(|task| task.id.eq_ignore_ascii_case(&needle))
        {
            return Ok(task.id.clone());
        }

        let mut matches: Vec<String> = self
            .tasks
            .iter()
            .filter(|task| task.id.to_ascii_lowercase().starts_with(&needle))
            .map(|task| task.id.clone())
            .collect();

        match matches.len() {
            0 => Err(Error::TaskNotFound(trimmed.to_string())),
            1 => Ok(matches.remove(0)),
            _ => {
                matches.sort();
                Err(Error::AmbiguousTaskId {
                    input: trimmed.to_string(),
                    matches,
                })
            }
        }
    }

    /// Create a task at the front of the collection
    ///
    /// Inputs are stored as given; callers validate first.
    pub fn create(&mut self, name: impl Into<String>, description: impl Into<String>) -> Task {
        let task = Task {
            id: self.generate_id(),
            name: name.into(),
            description: description.into(),
            completed: false,
            created_at: Utc::now().timestamp_millis(),
        };
        self.tasks.insert(0, task.clone());
        tracing::info!(id = %task.id, "task created");
        self.persist();
        task
    }

    /// Replace the name and description of a task
    pub fn update(
        &mut self,
        id: &str,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<()> {
        let task = self.find_mut(id)?;
        task.name = name.into();
        task.description = description.into();
        tracing::info!(id, "task updated");
        self.persist();
        Ok(())
    }

    /// Flip the completion flag, returning the new value
    pub fn toggle_complete(&mut self, id: &str) -> Result<bool> {
        let task = self.find_mut(id)?;
        task.completed = !task.completed;
        let completed = task.completed;
        tracing::info!(id, completed, "task toggled");
        self.persist();
        Ok(completed)
    }

    /// Remove a task permanently, returning it
    pub fn delete(&mut self, id: &str) -> Result<Task> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        let removed = self.tasks.remove(index);
        tracing::info!(id, "task deleted");
        self.persist();
        Ok(removed)
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))
    }

    fn persist(&mut self) {
        if let Err(err) = self.persistence.save(&self.tasks) {
            tracing::warn!(error = %err, "keeping changes in memory only");
            self.warnings.push(err.to_string());
        }
    }

    /// Generate a lowercase ULID unique within this store
    ///
    /// ULIDs are a millisecond timestamp plus 80 random bits. Generation is
    /// monotonic per store instance: when a fresh ULID does not sort after
    /// the previous one it is replaced by the previous one incremented. Two
    /// independently drawn ids in the same millisecond collide with
    /// probability 2^-80; an id already present is redrawn regardless.
    fn generate_id(&mut self) -> String {
        loop {
            let mut candidate = Ulid::new();
            if let Some(previous) = self.last_id {
                if candidate <= previous {
                    candidate = previous.increment().unwrap_or_else(Ulid::new);
                }
            }
            self.last_id = Some(candidate);

            let id = candidate.to_string().to_ascii_lowercase();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

/// Keep the first occurrence of each id
fn dedupe_ids(mut tasks: Vec<Task>) -> Vec<Task> {
    let before = tasks.len();
    let mut seen = HashSet::new();
    tasks.retain(|task| seen.insert(task.id.clone()));
    if tasks.len() != before {
        tracing::warn!(
            dropped = before - tasks.len(),
            "dropped tasks with duplicate ids"
        );
    }
    tasks
}
