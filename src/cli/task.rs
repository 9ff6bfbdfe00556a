//! todo task command implementations.

use std::io::{self, BufRead, IsTerminal, Write};

use serde::Serialize;

use crate::cli::Context;
use crate::error::{Error, Result};
use crate::lock::FileLock;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::storage::{FileStore, Persistence};
use crate::task::{Task, TaskStore};
use crate::validate::validate_task_input;
use crate::view::{visible_tasks, Filter, TaskCounts};

pub struct AddOptions {
    pub name: String,
    pub description: String,
}

pub struct EditOptions {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

pub struct ToggleOptions {
    pub id: String,
}

pub struct RmOptions {
    pub id: String,
    pub force: bool,
}

pub struct ListOptions {
    pub filter: Option<Filter>,
}

pub struct CountOptions {
    pub filter: Filter,
}

#[derive(Serialize)]
struct ToggleReport<'a> {
    task: &'a Task,
    completed: bool,
}

#[derive(Serialize)]
struct RmReport<'a> {
    deleted: bool,
    task: &'a Task,
}

#[derive(Serialize)]
struct ListReport<'a> {
    filter: Filter,
    counts: TaskCounts,
    tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
struct CountReport {
    filter: Filter,
    total: usize,
    counts: TaskCounts,
}

/// A store opened under the session lock
struct Session {
    store: TaskStore<FileStore>,
    _lock: FileLock,
}

fn file_store(ctx: &Context) -> FileStore {
    FileStore::new(&ctx.data_dir)
        .with_quota(Some(ctx.config.storage.quota_bytes))
        .with_lock_timeout(ctx.config.storage.lock_timeout_ms)
}

fn open_store(ctx: &Context) -> TaskStore<FileStore> {
    TaskStore::open(Persistence::new(
        file_store(ctx),
        ctx.config.storage.key.clone(),
    ))
}

/// Lock first, then load, so the load/mutate/save sequence is exclusive
fn open_session(ctx: &Context) -> Result<Session> {
    let lock = file_store(ctx).lock_session()?;
    Ok(Session {
        store: open_store(ctx),
        _lock: lock,
    })
}

fn output_options(ctx: &Context) -> OutputOptions {
    OutputOptions {
        json: ctx.json,
        quiet: ctx.quiet,
    }
}

fn push_warnings(human: &mut HumanOutput, store: &mut TaskStore<FileStore>) {
    for warning in store.take_warnings() {
        human.push_warning(format!("{warning} (change kept for this session only)"));
    }
}

fn describe_task(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    format!("[{mark}] {}: {} ({})", task.name, task.description, task.id)
}

fn push_task_summary(human: &mut HumanOutput, task: &Task) {
    human.push_summary("id", task.id.clone());
    human.push_summary("name", task.name.clone());
    human.push_summary("description", task.description.clone());
    human.push_summary(
        "status",
        if task.completed { "completed" } else { "active" },
    );
}

pub fn run_add(ctx: &Context, options: AddOptions) -> Result<()> {
    let input = validate_task_input(&options.name, &options.description)?;

    let mut session = open_session(ctx)?;
    let task = session.store.create(input.name, input.description);

    let mut human = HumanOutput::new("todo add: Task added");
    push_task_summary(&mut human, &task);
    push_warnings(&mut human, &mut session.store);
    human.push_next_step("todo list");

    emit_success(output_options(ctx), "add", &task, Some(&human))
}

pub fn run_edit(ctx: &Context, options: EditOptions) -> Result<()> {
    if options.name.is_none() && options.description.is_none() {
        return Err(Error::InvalidArgument(
            "nothing to change; pass --name and/or --description".to_string(),
        ));
    }

    let mut session = open_session(ctx)?;
    let id = session.store.resolve_id(&options.id)?;
    let (current_name, current_description) = match session.store.get(&id) {
        Some(task) => (task.name.clone(), task.description.clone()),
        None => return Err(Error::TaskNotFound(id)),
    };

    let name = options.name.unwrap_or(current_name);
    let description = options.description.unwrap_or(current_description);
    let input = validate_task_input(&name, &description)?;

    session.store.update(&id, input.name, input.description)?;
    let task = session
        .store
        .get(&id)
        .cloned()
        .ok_or_else(|| Error::TaskNotFound(id.clone()))?;

    let mut human = HumanOutput::new("todo edit: Task updated");
    push_task_summary(&mut human, &task);
    push_warnings(&mut human, &mut session.store);

    emit_success(output_options(ctx), "edit", &task, Some(&human))
}

pub fn run_toggle(ctx: &Context, options: ToggleOptions) -> Result<()> {
    let mut session = open_session(ctx)?;
    let id = session.store.resolve_id(&options.id)?;
    let completed = session.store.toggle_complete(&id)?;
    let task = session
        .store
        .get(&id)
        .cloned()
        .ok_or_else(|| Error::TaskNotFound(id.clone()))?;

    let state = if completed { "completed" } else { "active" };
    let mut human = HumanOutput::new(format!("todo toggle: {} marked {state}", task.name));
    human.push_summary("id", task.id.clone());
    push_warnings(&mut human, &mut session.store);

    let report = ToggleReport {
        task: &task,
        completed,
    };
    emit_success(output_options(ctx), "toggle", &report, Some(&human))
}

pub fn run_rm(ctx: &Context, options: RmOptions) -> Result<()> {
    let mut target = options.id;

    // Prompt before taking the session lock.
    if !options.force {
        let store = open_store(ctx);
        let id = store.resolve_id(&target)?;
        let task = store
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::TaskNotFound(id.clone()))?;

        if !confirm_delete(&task.name)? {
            let mut human = HumanOutput::new("todo rm: cancelled");
            human.push_summary("id", task.id.clone());
            human.push_summary("name", task.name.clone());
            let report = RmReport {
                deleted: false,
                task: &task,
            };
            return emit_success(output_options(ctx), "rm", &report, Some(&human));
        }
        target = id;
    }

    let mut session = open_session(ctx)?;
    let id = session.store.resolve_id(&target)?;
    let removed = session.store.delete(&id)?;

    let mut human = HumanOutput::new("todo rm: Task deleted");
    human.push_summary("id", removed.id.clone());
    human.push_summary("name", removed.name.clone());
    push_warnings(&mut human, &mut session.store);

    let report = RmReport {
        deleted: true,
        task: &removed,
    };
    emit_success(output_options(ctx), "rm", &report, Some(&human))
}

/// Ask on the terminal before deleting; without one, require `--force`
fn confirm_delete(name: &str) -> Result<bool> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return Err(Error::InvalidArgument(format!(
            "refusing to delete \"{name}\" without confirmation; pass --force"
        )));
    }
    read_confirmation(&mut stdin.lock(), &mut io::stderr(), name)
}

fn read_confirmation(
    input: &mut impl BufRead,
    output: &mut impl Write,
    name: &str,
) -> Result<bool> {
    write!(output, "Delete \"{name}\"? [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

pub fn run_list(ctx: &Context, options: ListOptions) -> Result<()> {
    let store = open_store(ctx);
    let filter = options.filter.unwrap_or(ctx.config.view.default_filter);
    let counts = store.counts();
    let tasks = visible_tasks(store.tasks(), filter);

    let mut human = HumanOutput::new(format!(
        "{} active, {} completed",
        counts.active, counts.completed
    ));
    human.push_summary("filter", filter.as_str());
    human.push_summary("all", counts.all.to_string());
    human.push_summary("active", counts.active.to_string());
    human.push_summary("completed", counts.completed.to_string());

    if tasks.is_empty() {
        let (title, hint) = filter.empty_state();
        human.push_detail(format!("{title}. {hint}"));
    }
    for task in &tasks {
        human.push_detail(describe_task(task));
    }

    let report = ListReport {
        filter,
        counts,
        tasks,
    };
    emit_success(output_options(ctx), "list", &report, Some(&human))
}

pub fn run_count(ctx: &Context, options: CountOptions) -> Result<()> {
    let store = open_store(ctx);
    let counts = store.counts();
    let total = counts.get(options.filter);

    let human = HumanOutput::new(total.to_string());
    let report = CountReport {
        filter: options.filter,
        total,
        counts,
    };
    emit_success(output_options(ctx), "count", &report, Some(&human))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_marks_completion() {
        let mut task = Task {
            id: "01j0".to_string(),
            name: "Buy milk".to_string(),
            description: "2 liters".to_string(),
            completed: false,
            created_at: 1,
        };
        assert_eq!(describe_task(&task), "[ ] Buy milk: 2 liters (01j0)");
        task.completed = true;
        assert_eq!(describe_task(&task), "[x] Buy milk: 2 liters (01j0)");
    }

    fn answer(input: &str) -> (bool, String) {
        let mut reader = io::Cursor::new(input.as_bytes().to_vec());
        let mut prompt = Vec::new();
        let confirmed = read_confirmation(&mut reader, &mut prompt, "Buy milk").unwrap();
        (confirmed, String::from_utf8(prompt).unwrap())
    }

    #[test]
    fn confirmation_prompt_names_the_task() {
        let (_, prompt) = answer("y\n");
        assert_eq!(prompt, "Delete \"Buy milk\"? [y/N] ");
    }

    #[test]
    fn confirmation_accepts_only_yes() {
        assert!(answer("y\n").0);
        assert!(answer(" YES \n").0);
        assert!(!answer("\n").0);
        assert!(!answer("n\n").0);
        assert!(!answer("yep\n").0);
        // EOF counts as no.
        assert!(!answer("").0);
    }
}
