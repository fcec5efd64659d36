//! rtsched worker
//!
//! The single-consumer scheduler loop that drains a shared
//! [`rtsched_core::TaskQueue`] in priority order.
//!
//! # Features
//! - One task at a time, run inline on the loop's own thread
//! - Fixed idle delay between polls of an empty queue
//! - Optional panic isolation for task actions
//! - Cooperative shutdown between tasks

pub mod config;
pub mod error;
pub mod executor;
pub mod scheduler;
pub mod stats;

pub use config::SchedulerConfig;
pub use error::{Result, WorkerError};
pub use executor::{ExecutionResult, TaskExecutor};
pub use scheduler::{PollOutcome, Scheduler, SchedulerHandle, SchedulerState, ShutdownSignal};
pub use stats::{SchedulerStats, StatsSnapshot};
