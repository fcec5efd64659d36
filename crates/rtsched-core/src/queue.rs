//! Shared priority queue of pending tasks.

use crate::priority::{Priority, TieBreak};
use crate::task::{Action, TaskId, TaskRecord};
use parking_lot::Mutex;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::trace;

/// Heap entry: a record plus its position within its priority group.
struct QueuedTask {
    priority: Priority,
    order: u64,
    record: TaskRecord,
}

impl PartialEq for QueuedTask {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.order == other.order
    }
}

impl Eq for QueuedTask {}

impl PartialOrd for QueuedTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedTask {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: higher priority first, then higher order key
        self.priority
            .cmp(&other.priority)
            .then_with(|| self.order.cmp(&other.order))
    }
}

struct Inner {
    heap: BinaryHeap<QueuedTask>,
    next_seq: u64,
}

/// Thread-safe priority queue shared by any number of producers and a
/// single consumer.
///
/// Every operation takes one exclusive lock for its whole duration, so
/// inserts and removals are observed by all threads in a single total order.
pub struct TaskQueue {
    inner: Mutex<Inner>,
    tie_break: TieBreak,
}

impl TaskQueue {
    /// Create an empty queue using the default (newest-first) tie-break.
    pub fn new() -> Self {
        Self::with_tie_break(TieBreak::default())
    }

    /// Create an empty queue with an explicit tie-break rule.
    pub fn with_tie_break(tie_break: TieBreak) -> Self {
        TaskQueue {
            inner: Mutex::new(Inner {
                heap: BinaryHeap::new(),
                next_seq: 0,
            }),
            tie_break,
        }
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Build a record from its parts and insert it.
    pub fn enqueue<A>(&self, id: TaskId, action: A, priority: i64)
    where
        A: Action + 'static,
    {
        self.push(TaskRecord::new(id, priority, action));
    }

    /// Insert an already constructed record.
    pub fn push(&self, record: TaskRecord) {
        let id = record.id();
        let priority = record.priority();

        let mut inner = self.inner.lock();
        let seq = inner.next_seq;
        inner.next_seq += 1;

        let order = match self.tie_break {
            TieBreak::Lifo => seq,
            TieBreak::Fifo => u64::MAX - seq,
        };
        inner.heap.push(QueuedTask {
            priority,
            order,
            record,
        });

        trace!(task_id = id, %priority, depth = inner.heap.len(), "task enqueued");
    }

    /// Remove and return the highest-priority record, or `None` when there
    /// is nothing to run. An empty queue is the normal idle state.
    pub fn dequeue_max(&self) -> Option<TaskRecord> {
        let mut inner = self.inner.lock();
        let queued = inner.heap.pop()?;

        trace!(
            task_id = queued.record.id(),
            priority = %queued.priority,
            depth = inner.heap.len(),
            "task dequeued"
        );
        Some(queued.record)
    }

    /// Identity of the record the next `dequeue_max` would return.
    pub fn peek_max(&self) -> Option<(TaskId, Priority)> {
        let inner = self.inner.lock();
        inner.heap.peek().map(|q| (q.record.id(), q.priority))
    }

    pub fn len(&self) -> usize {
        self.inner.lock().heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("len", &self.len())
            .field("tie_break", &self.tie_break)
            .finish()
    }
}
