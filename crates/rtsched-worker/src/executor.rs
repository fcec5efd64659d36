//! Task execution with optional panic capture.

use rtsched_core::{Priority, TaskId, TaskRecord};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error};

/// Result of running one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    /// The action returned normally
    Completed,
    /// The action panicked and the panic was contained
    Panicked { message: String },
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Completed)
    }
}

/// Runs task actions inline on the caller's thread.
#[derive(Debug, Clone, Copy)]
pub struct TaskExecutor {
    isolate_panics: bool,
}

impl TaskExecutor {
    pub fn new(isolate_panics: bool) -> Self {
        TaskExecutor { isolate_panics }
    }

    pub fn isolates_panics(&self) -> bool {
        self.isolate_panics
    }

    /// Execute a task, consuming it.
    ///
    /// When panics are not isolated a panicking action unwinds through this
    /// call and takes the caller down with it.
    pub fn execute(&self, task: TaskRecord) -> ExecutionResult {
        let id = task.id();
        let priority = task.priority();
        debug!(task_id = id, %priority, "executing task");

        if !self.isolate_panics {
            task.run();
            return ExecutionResult::Completed;
        }

        match panic::catch_unwind(AssertUnwindSafe(move || task.run())) {
            Ok(()) => ExecutionResult::Completed,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                log_panic(id, priority, &message);
                ExecutionResult::Panicked { message }
            }
        }
    }
}

impl Default for TaskExecutor {
    fn default() -> Self {
        Self::new(true)
    }
}

fn log_panic(id: TaskId, priority: Priority, message: &str) {
    error!(task_id = id, %priority, "task panicked: {}", message);
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
