//! The scheduler loop: the single consumer of a [`TaskQueue`].
//!
//! The loop alternates between two states. While `Polling` it asks the queue
//! for its highest-priority task; if there is one it moves to `Executing`,
//! runs the action inline and returns to `Polling`. If the queue is empty it
//! sleeps for the configured idle delay and polls again. Tasks never run in
//! parallel and a running action is never interrupted, so a long or
//! non-terminating action holds up every task behind it.
//!
//! Without a [`ShutdownSignal`] trigger the loop runs forever.

use crate::config::SchedulerConfig;
use crate::error::{Result, WorkerError};
use crate::executor::{panic_message, ExecutionResult, TaskExecutor};
use crate::stats::{SchedulerStats, StatsSnapshot};
use parking_lot::{Mutex, RwLock};
use rtsched_core::{Priority, TaskId, TaskQueue};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::sync::Notify;
use tracing::{debug, error, info};

const LOOP_THREAD_NAME: &str = "rtsched-loop";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Looking for work, or idling between polls
    Polling,
    /// Running a task's action
    Executing,
    /// The loop has exited
    Stopped,
}

/// Outcome of a single poll of the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Executed {
        id: TaskId,
        priority: Priority,
        result: ExecutionResult,
    },
    Idle,
}

#[derive(Debug, Default)]
struct ShutdownInner {
    triggered: AtomicBool,
    notify: Notify,
}

/// Cloneable request for the loop to stop.
///
/// The loop checks the signal before every poll and wakes early from an
/// idle sleep. An action that is already running is allowed to finish, and
/// tasks still queued are left in the queue.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    inner: Arc<ShutdownInner>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        if !self.inner.triggered.swap(true, Ordering::SeqCst) {
            // notify_one stores a permit if the loop is not currently idle
            self.inner.notify.notify_one();
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.inner.triggered.load(Ordering::SeqCst)
    }

    async fn notified(&self) {
        self.inner.notify.notified().await
    }
}

pub struct Scheduler {
    queue: Arc<TaskQueue>,
    config: SchedulerConfig,
    executor: TaskExecutor,
    stats: Arc<SchedulerStats>,
    state: Arc<RwLock<SchedulerState>>,
    shutdown: ShutdownSignal,
    // Held from dequeue until the action returns
    consumer: Mutex<()>,
}

impl Scheduler {
    /// Create a scheduler draining `queue`.
    ///
    /// The queue's tie-break rule is fixed at construction, so a config
    /// asking for a different rule is rejected rather than ignored.
    pub fn new(queue: Arc<TaskQueue>, config: SchedulerConfig) -> Result<Self> {
        config.validate()?;
        if config.tie_break != queue.tie_break() {
            return Err(WorkerError::Config(format!(
                "tie_break is {} but the queue was built with {}",
                config.tie_break,
                queue.tie_break()
            )));
        }

        let executor = TaskExecutor::new(config.isolate_panics);

        Ok(Scheduler {
            queue,
            config,
            executor,
            stats: Arc::new(SchedulerStats::new()),
            state: Arc::new(RwLock::new(SchedulerState::Polling)),
            shutdown: ShutdownSignal::new(),
            consumer: Mutex::new(()),
        })
    }

    pub fn queue(&self) -> &Arc<TaskQueue> {
        &self.queue
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.read()
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Take the highest-priority task, if any, and run it to completion.
    /// Never sleeps. Concurrent callers are serialized, so at most one
    /// action runs at a time.
    pub fn poll_once(&self) -> PollOutcome {
        let _consumer = self.consumer.lock();
        let task = match self.queue.dequeue_max() {
            Some(task) => task,
            None => {
                self.stats.record_idle_poll();
                return PollOutcome::Idle;
            }
        };

        let id = task.id();
        let priority = task.priority();

        self.set_state(SchedulerState::Executing);
        let result = self.executor.execute(task);
        self.stats.record_executed(!result.is_success());
        self.set_state(SchedulerState::Polling);

        PollOutcome::Executed {
            id,
            priority,
            result,
        }
    }

    /// Run the loop until the shutdown signal is triggered.
    pub async fn run(&self) {
        let idle_delay = self.config.idle_delay();
        info!(
            idle_delay_ms = self.config.idle_delay_ms,
            tie_break = %self.queue.tie_break(),
            isolate_panics = self.executor.isolates_panics(),
            "scheduler loop started"
        );
        self.set_state(SchedulerState::Polling);

        while !self.shutdown.is_triggered() {
            if let PollOutcome::Idle = self.poll_once() {
                tokio::select! {
                    _ = tokio::time::sleep(idle_delay) => {}
                    _ = self.shutdown.notified() => {}
                }
            }
        }

        self.set_state(SchedulerState::Stopped);
        let stats = self.stats.snapshot();
        info!(
            executed = stats.executed,
            panicked = stats.panicked,
            idle_polls = stats.idle_polls,
            pending = self.queue.len(),
            "scheduler loop stopped"
        );
    }

    /// Run the loop on a dedicated thread with its own single-threaded
    /// runtime.
    pub fn spawn(self) -> Result<SchedulerHandle> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;

        let shutdown = self.shutdown.clone();
        let stats = self.stats.clone();
        let state = self.state.clone();

        let thread = std::thread::Builder::new()
            .name(LOOP_THREAD_NAME.to_string())
            .spawn(move || runtime.block_on(self.run()))?;

        Ok(SchedulerHandle {
            thread,
            shutdown,
            stats,
            state,
        })
    }

    fn set_state(&self, next: SchedulerState) {
        let mut state = self.state.write();
        let prev = *state;
        if prev != next {
            debug!(from = ?prev, to = ?next, "scheduler state transition");
            *state = next;
        }
    }
}

/// Handle to a loop started with [`Scheduler::spawn`].
pub struct SchedulerHandle {
    thread: JoinHandle<()>,
    shutdown: ShutdownSignal,
    stats: Arc<SchedulerStats>,
    state: Arc<RwLock<SchedulerState>>,
}

impl SchedulerHandle {
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.read()
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Signal the loop to stop and wait for it to exit.
    pub fn stop(self) -> Result<StatsSnapshot> {
        self.shutdown.trigger();
        self.join()
    }

    /// Wait for the loop thread to exit. Blocks forever if the loop is
    /// never signalled and never panics.
    pub fn join(self) -> Result<StatsSnapshot> {
        match self.thread.join() {
            Ok(()) => Ok(self.stats.snapshot()),
            Err(payload) => {
                *self.state.write() = SchedulerState::Stopped;
                let message = panic_message(payload.as_ref());
                error!("scheduler loop panicked: {}", message);
                Err(WorkerError::LoopPanicked(message))
            }
        }
    }
}
