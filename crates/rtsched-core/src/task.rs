//! Task records and the actions they carry.

use crate::priority::Priority;
use std::fmt;

/// Caller-assigned task identifier. Uniqueness is not enforced.
pub type TaskId = i64;

/// A unit of work run by the scheduler loop.
///
/// Actions are consumed by execution, so each one runs at most once.
pub trait Action: Send {
    fn execute(self: Box<Self>);
}

impl<F> Action for F
where
    F: FnOnce() + Send + 'static,
{
    fn execute(self: Box<Self>) {
        (*self)()
    }
}

/// A pending task: identifier, priority and the action to run.
pub struct TaskRecord {
    id: TaskId,
    priority: Priority,
    action: Box<dyn Action>,
}

impl TaskRecord {
    /// Create a record from any closure or [`Action`] implementation.
    pub fn new<A>(id: TaskId, priority: i64, action: A) -> Self
    where
        A: Action + 'static,
    {
        Self::from_boxed(id, priority, Box::new(action))
    }

    /// Create a record from an already boxed action.
    pub fn from_boxed(id: TaskId, priority: i64, action: Box<dyn Action>) -> Self {
        Self {
            id,
            priority: Priority::new(priority),
            action,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Run the action, consuming the record.
    pub fn run(self) {
        self.action.execute()
    }
}

impl fmt::Debug for TaskRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskRecord")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_task_creation() {
        let task = TaskRecord::new(7, -3, || {});
        assert_eq!(task.id(), 7);
        assert_eq!(task.priority(), Priority::new(-3));
    }

    #[test]
    fn test_run_executes_action_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = counter.clone();
        let task = TaskRecord::new(1, 1, move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        task.run();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    struct Flag(Arc<AtomicUsize>);

    impl Action for Flag {
        fn execute(self: Box<Self>) {
            self.0.store(42, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_custom_action() {
        let value = Arc::new(AtomicUsize::new(0));
        TaskRecord::new(1, 0, Flag(value.clone())).run();
        assert_eq!(value.load(Ordering::SeqCst), 42);
    }

    #[test]
    fn test_debug_omits_action() {
        let task = TaskRecord::new(3, 9, || {});
        let debug = format!("{:?}", task);
        assert!(debug.contains("id: 3"));
        assert!(debug.contains("priority: Priority(9)"));
    }
}
