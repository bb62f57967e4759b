//! Trace table for a small task scheduler
//!
//! Shows custom errors, a guard that completes remaining tasks on drop, and
//! iterator adapters over borrowed state.
//!
//! # Running the example
//!
//! ```bash
//! cargo run --example task_scheduler
//! ```

#[path = "support/mod.rs"]
mod support;

use std::fmt;
use tracebuster::prelude::*;

#[derive(Debug, thiserror::Error)]
enum TaskError {
    #[error("Task name cannot be empty")]
    EmptyName,
}

struct Task {
    name: String,
    priority: u8,
    completed: bool,
}

impl Task {
    fn new(name: &str, priority: u8) -> std::result::Result<Self, TaskError> {
        trace_line!(name, priority);
        if name.is_empty() {
            return Err(TaskError::EmptyName);
        }
        Ok(Self {
            name: name.to_string(),
            priority,
            completed: false,
        })
    }

    fn complete(&mut self) {
        self.completed = true;
        let name = self.name.as_str();
        trace_line!(name);
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(priority={})", self.name, self.priority)
    }
}

#[derive(Default)]
struct TaskScheduler {
    tasks: Vec<Task>,
}

impl TaskScheduler {
    fn add_task(&mut self, task: Task) {
        trace_line!(task);
        self.tasks.push(task);
        // Higher priority first, then by name.
        self.tasks
            .sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.name.cmp(&b.name)));
        trace_line!(tasks = self.tasks);
    }

    fn pending(&mut self) -> impl Iterator<Item = &mut Task> {
        self.tasks.iter_mut().filter(|task| !task.completed)
    }
}

/// Completes every remaining task when dropped.
struct SchedulerSession<'a> {
    scheduler: &'a mut TaskScheduler,
}

impl Drop for SchedulerSession<'_> {
    fn drop(&mut self) {
        let remaining = self.scheduler.pending().count();
        trace_line!(remaining);
        for task in self.scheduler.pending() {
            task.complete();
        }
    }
}

fn main() -> anyhow::Result<()> {
    support::init();

    let mut scheduler = TaskScheduler::default();

    let scope = collect_trace()?;

    match Task::new("", 0) {
        Err(e) => assert_eq!(e.to_string(), "Task name cannot be empty"),
        Ok(_) => anyhow::bail!("empty task name was accepted"),
    }

    let tasks = vec![
        Task::new("Write docs", 2)?,
        Task::new("Fix bugs", 3)?,
        Task::new("Add tests", 1)?,
    ];

    {
        let mut session = SchedulerSession {
            scheduler: &mut scheduler,
        };
        for task in tasks {
            session.scheduler.add_task(task);
        }
        for task in session.scheduler.pending() {
            if task.priority > 2 {
                task.complete();
            }
        }
    }

    let trace = scope.close()?;

    assert!(scheduler.tasks.iter().all(|task| task.completed));
    support::print_trace_table("Task Scheduler Trace", &trace, &["self"]);

    Ok(())
}
