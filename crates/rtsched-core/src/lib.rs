//! rtsched core library
//!
//! Task records, priorities and the shared priority queue consumed by the
//! scheduler loop in `rtsched-worker`.

mod error;
mod priority;
mod queue;
mod task;

pub use error::SchedulerError;
pub use priority::{Priority, TieBreak};
pub use queue::TaskQueue;
pub use task::{Action, TaskId, TaskRecord};
