use crate::error::{Result, WorkerError};
use rtsched_core::TieBreak;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_IDLE_DELAY_MS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Fixed delay before re-polling an empty queue.
    pub idle_delay_ms: u64,
    /// Ordering among equal-priority tasks.
    pub tie_break: TieBreak,
    /// Catch panicking actions and keep the loop running.
    pub isolate_panics: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            idle_delay_ms: DEFAULT_IDLE_DELAY_MS,
            tie_break: TieBreak::default(),
            isolate_panics: true,
        }
    }
}

impl SchedulerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: SchedulerConfig = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.idle_delay_ms == 0 {
            return Err(WorkerError::Config(
                "idle_delay_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn idle_delay(&self) -> Duration {
        Duration::from_millis(self.idle_delay_ms)
    }
}
