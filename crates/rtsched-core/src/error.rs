use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Invalid tie-break rule: {0} (expected \"lifo\" or \"fifo\")")]
    InvalidTieBreak(String),
}
